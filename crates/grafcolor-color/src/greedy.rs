//! Sequential greedy coloring.
//!
//! First-fit over the dense adjacency matrix in id order: each vertex
//! takes the lowest color not used by an already-colored neighbor. The
//! used-color search runs over a u64 bitmask, one bit per color.

use grafcolor_graph::Graph;
use grafcolor_types::GrafcolorResult;

use crate::assignment::ColorAssignment;

/// Bitmask of colors `[0, limit)` taken by a vertex's neighbors.
///
/// Colors at or above `limit` are ignored by [`mark`](ColorMask::mark).
pub(crate) struct ColorMask {
    words: Vec<u64>,
    limit: usize,
}

impl ColorMask {
    pub(crate) fn new(limit: usize) -> Self {
        Self {
            words: vec![0; limit.div_ceil(64)],
            limit,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.words.fill(0);
    }

    pub(crate) fn mark(&mut self, color: u32) {
        let c = color as usize;
        if c < self.limit {
            self.words[c / 64] |= 1u64 << (c % 64);
        }
    }

    /// Lowest unmarked color, if any is below the limit.
    pub(crate) fn lowest_free(&self) -> Option<u32> {
        self.words
            .iter()
            .enumerate()
            .find(|(_, &w)| w != u64::MAX)
            .map(|(i, &w)| i * 64 + (!w).trailing_zeros() as usize)
            .filter(|&c| c < self.limit)
            .map(|c| c as u32)
    }
}

/// Colors `graph` sequentially on the host.
///
/// Uses at most `max_degree + 1` colors. Fails with `EmptyGraph` if the
/// graph has no vertices.
pub fn color_sequential(graph: &Graph) -> GrafcolorResult<ColorAssignment> {
    let adj = graph.adjacency_matrix()?;
    let n = adj.vertex_count();
    let mut assignment = ColorAssignment::new(n);
    let mut used = ColorMask::new(graph.max_degree() + 1);

    for v in 0..n {
        used.clear();
        for (u, &edge) in adj.row(v).iter().enumerate() {
            if edge != 0 {
                if let Some(c) = assignment.get(u) {
                    used.mark(c);
                }
            }
        }
        // A vertex has at most max_degree colored neighbors.
        let color = used.lowest_free().unwrap_or(0);
        assignment.set(v, color);
    }

    tracing::debug!(vertices = n, colors = assignment.color_count(), "sequential coloring done");
    Ok(assignment)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_finds_lowest_gap() {
        let mut mask = ColorMask::new(130);
        for c in 0..70 {
            mask.mark(c);
        }
        mask.mark(71);
        assert_eq!(mask.lowest_free(), Some(70));
    }

    #[test]
    fn mask_ignores_colors_past_limit() {
        let mut mask = ColorMask::new(2);
        mask.mark(0);
        mask.mark(5);
        assert_eq!(mask.lowest_free(), Some(1));
        mask.mark(1);
        assert_eq!(mask.lowest_free(), None);
    }

    #[test]
    fn mask_full_word_boundary() {
        let mut mask = ColorMask::new(64);
        for c in 0..64 {
            mask.mark(c);
        }
        assert_eq!(mask.lowest_free(), None);
        mask.clear();
        assert_eq!(mask.lowest_free(), Some(0));
    }
}
