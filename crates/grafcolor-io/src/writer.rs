//! Plain-text dumps of graphs and their matrices.
//!
//! Matrix dumps are labelled by vertex name and ordered by sorted name,
//! not by id, so they read naturally for hand-written inputs.

use std::io::{self, Write};

use grafcolor_graph::{AdjacencyMatrix, BitMatrix, Graph};
use grafcolor_types::VertexId;

/// Writes the canonical edge list as `u, v` id pairs, one per line.
///
/// The output is itself a valid graph file whose ids equal the names.
pub fn write_edge_list<W: Write>(graph: &Graph, out: &mut W) -> io::Result<()> {
    for (u, v) in graph.edges() {
        writeln!(out, "{u}, {v}")?;
    }
    Ok(())
}

/// Writes each vertex name followed by a line of its neighbor ids.
pub fn write_adjacency_list<W: Write>(graph: &Graph, out: &mut W) -> io::Result<()> {
    for name in graph.vertex_names() {
        writeln!(out, "{name}")?;
        let Some(id) = graph.id_of(name) else { continue };
        if let Ok(neighbors) = graph.neighbors(id) {
            let line: Vec<String> = neighbors.iter().map(u32::to_string).collect();
            writeln!(out, "{}", line.join(" | "))?;
        }
    }
    Ok(())
}

/// Sorted `(name, id)` pairs used as row and column labels.
fn labels(graph: &Graph) -> Vec<(&str, VertexId)> {
    graph
        .vertex_names()
        .into_iter()
        .filter_map(|name| graph.id_of(name).map(|id| (name, id)))
        .collect()
}

fn write_labelled<W, F>(graph: &Graph, out: &mut W, cell: F) -> io::Result<()>
where
    W: Write,
    F: Fn(usize, usize) -> u32,
{
    let labels = labels(graph);
    let header: Vec<&str> = labels.iter().map(|(name, _)| *name).collect();
    writeln!(out, "  {}", header.join(" "))?;

    for (name, row) in &labels {
        let cells: Vec<String> = labels
            .iter()
            .map(|(_, col)| cell(row.index(), col.index()).to_string())
            .collect();
        writeln!(out, "{name} {}", cells.join(" "))?;
    }
    Ok(())
}

/// Writes a dense adjacency matrix with name labels.
pub fn write_matrix<W: Write>(graph: &Graph, matrix: &AdjacencyMatrix, out: &mut W) -> io::Result<()> {
    write_labelled(graph, out, |i, j| matrix.get(i, j))
}

/// Writes a bit matrix as 0/1 cells with name labels.
pub fn write_bit_matrix<W: Write>(graph: &Graph, matrix: &BitMatrix, out: &mut W) -> io::Result<()> {
    write_labelled(graph, out, |i, j| u32::from(matrix.get(i, j)))
}
