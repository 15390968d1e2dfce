//! Procedural graph generators for benchmarks and testing.
//!
//! Vertices are named by their decimal index (`"0"`, `"1"`, …) so that
//! generated graphs written as edge lists reload with identical ids.

use rand::Rng;

use grafcolor_types::{GrafcolorError, GrafcolorResult, VertexId};

use crate::graph::Graph;

fn numbered_vertices(n: usize) -> Graph {
    let mut graph = Graph::with_capacity(n);
    for i in 0..n {
        graph.add_vertex(&i.to_string());
    }
    graph
}

/// Random simple graph with `floor(n(n-1)/2 * completeness)` distinct edges.
///
/// # Example
/// ```
/// use rand::SeedableRng;
/// use grafcolor_graph::generators::random_graph;
///
/// let mut rng = rand::rngs::StdRng::seed_from_u64(7);
/// let graph = random_graph(10, 0.5, &mut rng).unwrap();
/// assert_eq!(graph.vertex_count(), 10);
/// assert_eq!(graph.edge_count(), 22);
/// ```
pub fn random_graph<R: Rng + ?Sized>(
    n: usize,
    completeness: f64,
    rng: &mut R,
) -> GrafcolorResult<Graph> {
    if !(0.0..=1.0).contains(&completeness) {
        return Err(GrafcolorError::InvalidConfig(format!(
            "completeness must be in [0, 1], got {completeness}"
        )));
    }

    let mut graph = numbered_vertices(n);
    if n < 2 {
        return Ok(graph);
    }

    let max_edges = n * (n - 1) / 2;
    let target = (max_edges as f64 * completeness).floor() as usize;

    while graph.edge_count() < target {
        let a = VertexId(rng.gen_range(0..n) as u32);
        let b = VertexId(rng.gen_range(0..n) as u32);
        if a != b && !graph.is_edge(a, b) {
            graph.add_edge(a, b);
        }
    }

    Ok(graph)
}

/// Path `0 - 1 - … - (n-1)`.
pub fn path_graph(n: usize) -> Graph {
    let mut graph = numbered_vertices(n);
    for i in 1..n {
        graph.add_edge(VertexId(i as u32 - 1), VertexId(i as u32));
    }
    graph
}

/// Cycle on `n` vertices (a path for `n < 3`).
pub fn cycle_graph(n: usize) -> Graph {
    let mut graph = path_graph(n);
    if n >= 3 {
        graph.add_edge(VertexId(n as u32 - 1), VertexId(0));
    }
    graph
}

/// Complete graph on `n` vertices.
pub fn complete_graph(n: usize) -> Graph {
    let mut graph = numbered_vertices(n);
    for i in 0..n {
        for j in (i + 1)..n {
            graph.add_edge(VertexId(i as u32), VertexId(j as u32));
        }
    }
    graph
}
