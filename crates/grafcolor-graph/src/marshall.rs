//! Marshalling of ragged non-adjacency groups into a CSR stream.
//!
//! The device cannot follow per-vertex heap allocations, so the groups are
//! copied back to back into one flat buffer and indexed by an offset array
//! of length N: `offset[0] == 0` and `offset[i + 1] == offset[i] + count[i]`.
//! Empty groups get a zero-width region.

use grafcolor_types::{GrafcolorError, GrafcolorResult};

use crate::non_adjacency::NonAdjacencyGroups;

/// Flat non-adjacency stream plus its offset index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarshalledStream {
    flat: Vec<u32>,
    offsets: Vec<u32>,
}

impl MarshalledStream {
    /// All groups back to back.
    pub fn flat(&self) -> &[u32] {
        &self.flat
    }

    /// Start of each group in [`flat`](Self::flat), one entry per vertex.
    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }

    /// Total number of ids in the stream.
    #[inline]
    pub fn total_size(&self) -> usize {
        self.flat.len()
    }

    /// Number of groups.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.offsets.len()
    }

    /// Exclusive end of group `i`.
    fn end(&self, i: usize) -> usize {
        self.offsets
            .get(i + 1)
            .map_or(self.flat.len(), |&next| next as usize)
    }

    /// Member count of group `i`.
    pub fn count(&self, i: usize) -> usize {
        self.end(i) - self.offsets[i] as usize
    }

    /// Members of group `i`.
    pub fn group(&self, i: usize) -> &[u32] {
        &self.flat[self.offsets[i] as usize..self.end(i)]
    }
}

/// Marshals `groups` into a flat stream.
pub fn marshall(groups: &NonAdjacencyGroups) -> MarshalledStream {
    flatten(groups.as_slice())
}

/// Marshals raw groups, checking that exactly `vertex_count` are given.
pub fn marshall_groups(groups: &[Vec<u32>], vertex_count: usize) -> GrafcolorResult<MarshalledStream> {
    if groups.len() != vertex_count {
        return Err(GrafcolorError::InvalidConfig(format!(
            "expected {vertex_count} groups, got {}",
            groups.len()
        )));
    }
    Ok(flatten(groups))
}

fn flatten(groups: &[Vec<u32>]) -> MarshalledStream {
    let mut offsets = Vec::with_capacity(groups.len());
    let mut total = 0usize;
    for group in groups {
        offsets.push(total as u32);
        total += group.len();
    }

    let mut flat = Vec::with_capacity(total);
    for group in groups {
        flat.extend_from_slice(group);
    }

    tracing::debug!(groups = groups.len(), total, "marshalled non-adjacency stream");

    MarshalledStream { flat, offsets }
}
