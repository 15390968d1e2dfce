//! Vertex color assignment.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use grafcolor_graph::Graph;
use grafcolor_types::{GrafcolorError, GrafcolorResult};

/// Color of each vertex, indexed by vertex id. `None` is unassigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorAssignment(Vec<Option<u32>>);

impl ColorAssignment {
    /// All `vertex_count` vertices unassigned.
    pub fn new(vertex_count: usize) -> Self {
        Self(vec![None; vertex_count])
    }

    pub fn from_colors(colors: Vec<Option<u32>>) -> Self {
        Self(colors)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Color of `vertex`, `None` if unassigned or out of range.
    #[inline]
    pub fn get(&self, vertex: usize) -> Option<u32> {
        self.0.get(vertex).copied().flatten()
    }

    #[inline]
    pub fn is_colored(&self, vertex: usize) -> bool {
        self.get(vertex).is_some()
    }

    /// Assigns `color` to `vertex`. Out-of-range vertices are ignored.
    pub fn set(&mut self, vertex: usize, color: u32) {
        if let Some(slot) = self.0.get_mut(vertex) {
            *slot = Some(color);
        }
    }

    /// True when every vertex has a color.
    pub fn is_complete(&self) -> bool {
        self.0.iter().all(Option::is_some)
    }

    /// Ids of the uncolored vertices, ascending.
    pub fn uncolored(&self) -> Vec<u32> {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_none())
            .map(|(v, _)| v as u32)
            .collect()
    }

    /// Number of distinct colors in use.
    pub fn color_count(&self) -> usize {
        self.0.iter().flatten().collect::<BTreeSet<_>>().len()
    }

    /// Highest color in use.
    pub fn max_color(&self) -> Option<u32> {
        self.0.iter().flatten().copied().max()
    }

    pub fn as_slice(&self) -> &[Option<u32>] {
        &self.0
    }

    /// Colors with `-1` for unassigned vertices.
    pub fn to_signed(&self) -> Vec<i64> {
        self.0
            .iter()
            .map(|c| c.map_or(-1, i64::from))
            .collect()
    }

    /// Vertex ids grouped by color, ascending by color then id.
    pub fn color_classes(&self) -> Vec<(u32, Vec<u32>)> {
        let mut classes: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
        for (v, color) in self.0.iter().enumerate() {
            if let Some(c) = color {
                classes.entry(*c).or_default().push(v as u32);
            }
        }
        classes.into_iter().collect()
    }

    /// Checks that the assignment is a proper coloring of `graph`.
    ///
    /// Fails on a size mismatch, an uncolored vertex, or an edge whose
    /// endpoints share a color.
    pub fn validate(&self, graph: &Graph) -> GrafcolorResult<()> {
        if self.len() != graph.vertex_count() {
            return Err(GrafcolorError::InvalidColoring(format!(
                "assignment covers {} vertices, graph has {}",
                self.len(),
                graph.vertex_count()
            )));
        }
        if let Some(&v) = self.uncolored().first() {
            return Err(GrafcolorError::InvalidColoring(format!(
                "vertex {v} is uncolored"
            )));
        }
        for &(u, v) in graph.edges() {
            if self.get(u.index()) == self.get(v.index()) {
                return Err(GrafcolorError::InvalidColoring(format!(
                    "edge ({u}, {v}) has both endpoints colored {}",
                    self.get(u.index()).unwrap_or_default()
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for ColorAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (v, color) in self.0.iter().enumerate() {
            match color {
                Some(c) => writeln!(f, "{v}: {c}")?,
                None => writeln!(f, "{v}: -")?,
            }
        }
        Ok(())
    }
}
