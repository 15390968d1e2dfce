//! Graph file loader.

use std::path::Path;

use grafcolor_graph::Graph;
use grafcolor_types::constants::{COMMENT_CHAR, EDGE_SEPARATOR};
use grafcolor_types::{GrafcolorError, GrafcolorResult};

/// Applies one input line to `graph`. Returns true if the line named a vertex.
fn apply_line(graph: &mut Graph, raw: &str) -> bool {
    let line: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if line.is_empty() || line.starts_with(COMMENT_CHAR) {
        return false;
    }

    let (first, second) = match line.split_once(EDGE_SEPARATOR) {
        Some((a, b)) => (a, b),
        None => (line.as_str(), ""),
    };

    let first_id = (!first.is_empty()).then(|| graph.add_vertex(first));
    let second_id = (!second.is_empty()).then(|| graph.add_vertex(second));

    if let (Some(u), Some(v)) = (first_id, second_id) {
        if !graph.add_edge(u, v) {
            tracing::debug!(line = raw, "ignored self loop");
        }
    }

    first_id.is_some() || second_id.is_some()
}

/// Parses graph text. Fails if no vertex is named anywhere in the input.
pub fn parse_graph(text: &str) -> GrafcolorResult<Graph> {
    let mut graph = Graph::new();
    for line in text.lines() {
        apply_line(&mut graph, line);
    }

    if graph.is_empty() {
        return Err(GrafcolorError::GraphLoad("input contains no vertices".into()));
    }
    Ok(graph)
}

/// Reads and parses the graph file at `path`.
pub fn load_graph(path: impl AsRef<Path>) -> GrafcolorResult<Graph> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| GrafcolorError::GraphLoad(format!("{}: {e}", path.display())))?;

    let graph = parse_graph(&text).map_err(|e| match e {
        GrafcolorError::GraphLoad(msg) => {
            GrafcolorError::GraphLoad(format!("{}: {msg}", path.display()))
        }
        other => other,
    })?;

    tracing::info!(
        path = %path.display(),
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "loaded graph"
    );
    Ok(graph)
}
