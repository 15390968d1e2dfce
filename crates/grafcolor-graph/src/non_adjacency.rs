//! Non-adjacency groups.
//!
//! The non-adjacency group of `v` is every vertex that is neither `v` nor
//! a neighbor of `v`, ordered by ascending degree (ties by ascending id).
//! Low-degree members come first so that the group kernel, which walks a
//! group front to back, tends to build large independent sets.

use grafcolor_types::{GrafcolorError, GrafcolorResult};

use crate::graph::Graph;

/// Computes the ordered non-adjacency group of every vertex.
fn compute_groups(graph: &Graph) -> Vec<Vec<u32>> {
    let n = graph.vertex_count() as u32;
    let degrees = graph.degrees();

    graph
        .adjacency_sets()
        .iter()
        .enumerate()
        .map(|(v, neighbors)| {
            let v = v as u32;
            // Ascending set difference against the full id universe
            let mut group: Vec<u32> = (0..n)
                .filter(|&u| u != v && !neighbors.contains(&u))
                .collect();
            // Stable: equal degrees keep ascending id order
            group.sort_by_key(|&u| degrees[u as usize]);
            group
        })
        .collect()
}

/// Variable-length non-adjacency group per vertex.
///
/// A vertex adjacent to every other vertex has an empty group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonAdjacencyGroups {
    groups: Vec<Vec<u32>>,
}

impl NonAdjacencyGroups {
    /// Builds the groups for every vertex of `graph`.
    pub fn build(graph: &Graph) -> GrafcolorResult<Self> {
        if graph.is_empty() {
            return Err(GrafcolorError::EmptyGraph);
        }
        Ok(Self {
            groups: compute_groups(graph),
        })
    }

    /// Wraps precomputed groups (one entry per vertex).
    pub fn from_groups(groups: Vec<Vec<u32>>) -> Self {
        Self { groups }
    }

    /// Number of groups (equal to the vertex count).
    #[inline]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Group of vertex `v`.
    pub fn group(&self, v: usize) -> &[u32] {
        &self.groups[v]
    }

    /// Member count of each group, indexed by vertex.
    pub fn counts(&self) -> Vec<usize> {
        self.groups.iter().map(Vec::len).collect()
    }

    /// Sum of all group sizes.
    pub fn total_members(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }

    pub fn as_slice(&self) -> &[Vec<u32>] {
        &self.groups
    }
}

/// Fixed-width non-adjacency matrix.
///
/// Row `v` has `N + 1` words: `[count, id₁, …, id_count, 0, …]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonAdjacencyMatrix {
    data: Vec<u32>,
    vertex_count: usize,
}

impl NonAdjacencyMatrix {
    /// Builds the padded matrix for every vertex of `graph`.
    pub fn build(graph: &Graph) -> GrafcolorResult<Self> {
        if graph.is_empty() {
            return Err(GrafcolorError::EmptyGraph);
        }

        let n = graph.vertex_count();
        let width = n + 1;
        let mut data = vec![0u32; n * width];

        for (v, group) in compute_groups(graph).iter().enumerate() {
            if group.is_empty() {
                continue;
            }
            let start = v * width;
            data[start] = group.len() as u32;
            data[start + 1..start + 1 + group.len()].copy_from_slice(group);
        }

        Ok(Self {
            data,
            vertex_count: n,
        })
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Words per row, `N + 1`.
    #[inline]
    pub fn row_width(&self) -> usize {
        self.vertex_count + 1
    }

    /// Number of non-adjacent vertices recorded for `v`.
    pub fn count(&self, v: usize) -> usize {
        self.data[v * self.row_width()] as usize
    }

    /// The recorded members of `v`'s row (without count or padding).
    pub fn members(&self, v: usize) -> &[u32] {
        let start = v * self.row_width() + 1;
        &self.data[start..start + self.count(v)]
    }

    /// Full row-major storage including counts and padding.
    pub fn as_slice(&self) -> &[u32] {
        &self.data
    }
}
