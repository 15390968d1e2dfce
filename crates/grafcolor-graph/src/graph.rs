//! Core graph type.
//!
//! Vertices are registered by name and receive dense ids in first-seen
//! order. Adjacency is stored symmetrically as one ascending set per
//! vertex; the first insertion of each edge is also recorded in a
//! canonical edge list.

use std::collections::{BTreeSet, HashMap};

use grafcolor_types::{GrafcolorError, GrafcolorResult, VertexId};

use crate::matrix::{AdjacencyMatrix, BitMatrix};
use crate::non_adjacency::{NonAdjacencyGroups, NonAdjacencyMatrix};

/// An undirected simple graph with named vertices.
///
/// Populated once through [`add_vertex`](Graph::add_vertex) and
/// [`add_edge`](Graph::add_edge), then read by the coloring orchestrators.
/// Self loops are never stored: a vertex is not its own neighbor.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    /// For each vertex, its neighbor ids in ascending order.
    adjacency: Vec<BTreeSet<u32>>,
    /// Vertex name → id.
    ids: HashMap<String, VertexId>,
    /// Vertex id → name.
    names: Vec<String>,
    /// Canonical edge list, in insertion order.
    edges: Vec<(VertexId, VertexId)>,
}

impl Graph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty graph with room for `vertex_count` vertices.
    pub fn with_capacity(vertex_count: usize) -> Self {
        Self {
            adjacency: Vec::with_capacity(vertex_count),
            ids: HashMap::with_capacity(vertex_count),
            names: Vec::with_capacity(vertex_count),
            edges: Vec::new(),
        }
    }

    /// Registers `name` and returns its id. Registering a known name
    /// returns the existing id.
    pub fn add_vertex(&mut self, name: &str) -> VertexId {
        if let Some(&id) = self.ids.get(name) {
            return id;
        }
        let id = VertexId(self.names.len() as u32);
        self.ids.insert(name.to_string(), id);
        self.names.push(name.to_string());
        self.adjacency.push(BTreeSet::new());
        id
    }

    /// Adds the undirected edge `(u, v)`.
    ///
    /// Returns `false` without touching the graph if either id is out of
    /// range or `u == v`. Duplicate edges collapse; only the first insertion
    /// is recorded in [`edges`](Graph::edges).
    pub fn add_edge(&mut self, u: VertexId, v: VertexId) -> bool {
        if !self.is_valid_id(u) || !self.is_valid_id(v) || u == v {
            return false;
        }

        let inserted = self.adjacency[u.index()].insert(v.0);
        self.adjacency[v.index()].insert(u.0);

        if inserted {
            self.edges.push((u, v));
        }
        true
    }

    /// Returns true if `u` and `v` are adjacent. Out-of-range ids are never adjacent.
    pub fn is_edge(&self, u: VertexId, v: VertexId) -> bool {
        self.adjacency
            .get(u.index())
            .is_some_and(|set| set.contains(&v.0))
    }

    /// Returns true if `id` is in `[0, vertex_count)`.
    #[inline]
    pub fn is_valid_id(&self, id: VertexId) -> bool {
        id.index() < self.names.len()
    }

    /// Returns true if no vertex has been registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns the number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.names.len()
    }

    /// Returns the number of distinct edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Canonical edge list in first-insertion order.
    pub fn edges(&self) -> &[(VertexId, VertexId)] {
        &self.edges
    }

    /// Looks up the id registered for `name`.
    pub fn id_of(&self, name: &str) -> Option<VertexId> {
        self.ids.get(name).copied()
    }

    /// Looks up the name registered for `id`.
    pub fn name_of(&self, id: VertexId) -> Option<&str> {
        self.names.get(id.index()).map(String::as_str)
    }

    /// All vertex names, sorted lexicographically.
    pub fn vertex_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Neighbor ids of `id`, ascending.
    pub fn neighbors(&self, id: VertexId) -> GrafcolorResult<&BTreeSet<u32>> {
        self.adjacency
            .get(id.index())
            .ok_or(GrafcolorError::InvalidVertexId {
                id: id.0,
                size: self.vertex_count(),
            })
    }

    /// Number of neighbors of `id`.
    pub fn degree(&self, id: VertexId) -> GrafcolorResult<usize> {
        self.neighbors(id).map(BTreeSet::len)
    }

    /// Degrees of all vertices, indexed by id.
    pub fn degrees(&self) -> Vec<usize> {
        self.adjacency.iter().map(BTreeSet::len).collect()
    }

    /// Largest vertex degree (0 for an empty graph).
    pub fn max_degree(&self) -> usize {
        self.adjacency.iter().map(BTreeSet::len).max().unwrap_or(0)
    }

    /// Per-vertex neighbor sets, indexed by id.
    pub(crate) fn adjacency_sets(&self) -> &[BTreeSet<u32>] {
        &self.adjacency
    }

    /// Dense 0/1 adjacency matrix. Fails on an empty graph.
    pub fn adjacency_matrix(&self) -> GrafcolorResult<AdjacencyMatrix> {
        AdjacencyMatrix::build(self)
    }

    /// Bit-packed adjacency matrix. Fails on an empty graph.
    pub fn adjacency_bit_matrix(&self) -> GrafcolorResult<BitMatrix> {
        BitMatrix::adjacency(self)
    }

    /// Fixed-width non-adjacency matrix. Fails on an empty graph.
    pub fn non_adjacency_matrix(&self) -> GrafcolorResult<NonAdjacencyMatrix> {
        NonAdjacencyMatrix::build(self)
    }

    /// Variable-length non-adjacency groups. Fails on an empty graph.
    pub fn non_adjacency_groups(&self) -> GrafcolorResult<NonAdjacencyGroups> {
        NonAdjacencyGroups::build(self)
    }
}
