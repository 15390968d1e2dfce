//! Dense and bit-packed adjacency matrices.
//!
//! Both layouts are row-major with `N` rows of `N` cells; cell `(i, j)`
//! lives at offset `i * N + j`. The bit matrix packs cells MSB-first:
//! offset `k` is bit `7 - k % 8` of byte `k / 8`.

use grafcolor_types::constants::BITS_PER_BYTE;
use grafcolor_types::{GrafcolorError, GrafcolorResult};

use crate::graph::Graph;

/// Reads the bit at `offset` of an MSB-first packed buffer.
///
/// # Panics
/// Panics if `offset / 8` is out of bounds for `bits`.
#[inline]
pub fn get_bit(bits: &[u8], offset: usize) -> bool {
    let byte = bits[offset / BITS_PER_BYTE];
    let pos = offset % BITS_PER_BYTE;
    byte & (1 << (BITS_PER_BYTE - 1 - pos)) != 0
}

/// Sets or clears the bit at `offset` of an MSB-first packed buffer.
///
/// # Panics
/// Panics if `offset / 8` is out of bounds for `bits`.
#[inline]
pub fn set_bit(bits: &mut [u8], offset: usize, value: bool) {
    let byte = &mut bits[offset / BITS_PER_BYTE];
    let mask = 1 << (BITS_PER_BYTE - 1 - offset % BITS_PER_BYTE);
    if value {
        *byte |= mask;
    } else {
        *byte &= !mask;
    }
}

/// Dense N×N adjacency matrix of `0`/`1` words.
///
/// Word-sized cells so the buffer can be uploaded as-is to kernels that
/// index it with plain integer loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyMatrix {
    data: Vec<u32>,
    vertex_count: usize,
}

impl AdjacencyMatrix {
    /// Builds the matrix from the graph's neighbor sets.
    pub fn build(graph: &Graph) -> GrafcolorResult<Self> {
        if graph.is_empty() {
            return Err(GrafcolorError::EmptyGraph);
        }

        let n = graph.vertex_count();
        let mut data = vec![0u32; n * n];
        for (row, neighbors) in graph.adjacency_sets().iter().enumerate() {
            let offset = row * n;
            for &col in neighbors {
                data[offset + col as usize] = 1;
            }
        }

        Ok(Self {
            data,
            vertex_count: n,
        })
    }

    /// Number of rows (and columns).
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    /// Total number of cells, `N²`.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the matrix has no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Cell `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u32 {
        self.data[row * self.vertex_count + col]
    }

    /// Row `row` as a slice of `N` cells.
    pub fn row(&self, row: usize) -> &[u32] {
        let start = row * self.vertex_count;
        &self.data[start..start + self.vertex_count]
    }

    /// The cells in row-major order.
    pub fn as_slice(&self) -> &[u32] {
        &self.data
    }

    /// Consumes the matrix, returning its row-major cells.
    pub fn into_vec(self) -> Vec<u32> {
        self.data
    }
}

/// Row-major bit matrix, `ceil(rows * cols / 8)` bytes.
///
/// Used both for the N×N adjacency bit matrix and for the group bitmaps
/// read back from the group kernel (one row per vertex in a batch).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitMatrix {
    bytes: Vec<u8>,
    rows: usize,
    cols: usize,
}

impl BitMatrix {
    /// All-zero matrix of `rows × cols` bits.
    pub fn zeroed(rows: usize, cols: usize) -> Self {
        Self {
            bytes: vec![0u8; Self::byte_len_for(rows, cols)],
            rows,
            cols,
        }
    }

    /// Wraps bytes read back from a device. Fails if the byte count does
    /// not match `ceil(rows * cols / 8)`.
    pub fn from_bytes(bytes: Vec<u8>, rows: usize, cols: usize) -> GrafcolorResult<Self> {
        let expected = Self::byte_len_for(rows, cols);
        if bytes.len() != expected {
            return Err(GrafcolorError::InvalidConfig(format!(
                "bit matrix {rows}x{cols} needs {expected} bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self { bytes, rows, cols })
    }

    /// Builds the N×N adjacency bit matrix of `graph`.
    pub fn adjacency(graph: &Graph) -> GrafcolorResult<Self> {
        if graph.is_empty() {
            return Err(GrafcolorError::EmptyGraph);
        }

        let n = graph.vertex_count();
        let mut matrix = Self::zeroed(n, n);
        for (row, neighbors) in graph.adjacency_sets().iter().enumerate() {
            for &col in neighbors {
                matrix.set(row, col as usize, true);
            }
        }
        Ok(matrix)
    }

    /// Number of bytes needed for `rows × cols` bits.
    #[inline]
    pub fn byte_len_for(rows: usize, cols: usize) -> usize {
        (rows * cols).div_ceil(BITS_PER_BYTE)
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of addressable bits, `rows * cols`.
    #[inline]
    pub fn bit_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Number of backing bytes.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    /// Bit `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> bool {
        get_bit(&self.bytes, row * self.cols + col)
    }

    /// Sets bit `(row, col)`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: bool) {
        set_bit(&mut self.bytes, row * self.cols + col, value);
    }

    /// Column indices of the set bits in `row`, ascending.
    pub fn row_members(&self, row: usize) -> Vec<u32> {
        (0..self.cols)
            .filter(|&col| self.get(row, col))
            .map(|col| col as u32)
            .collect()
    }

    /// Copies `other`'s rows into this matrix starting at `first_row`.
    ///
    /// Used to accumulate per-batch group bitmaps into the full N×N matrix.
    pub fn copy_rows_from(&mut self, first_row: usize, other: &BitMatrix) {
        debug_assert_eq!(self.cols, other.cols);
        for row in 0..other.rows {
            for col in 0..other.cols {
                if other.get(row, col) {
                    self.set(first_row + row, col, true);
                }
            }
        }
    }

    /// The packed bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the matrix, returning its packed bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn msb_first_layout() {
        let mut bits = [0u8; 2];
        set_bit(&mut bits, 0, true);
        set_bit(&mut bits, 9, true);
        assert_eq!(bits, [0b1000_0000, 0b0100_0000]);
        assert!(get_bit(&bits, 0));
        assert!(get_bit(&bits, 9));
        assert!(!get_bit(&bits, 1));
    }

    #[test]
    fn clear_bit() {
        let mut bits = [0xFFu8];
        set_bit(&mut bits, 7, false);
        assert_eq!(bits, [0b1111_1110]);
    }

    #[test]
    fn byte_len_rounds_up() {
        assert_eq!(BitMatrix::byte_len_for(3, 3), 2);
        assert_eq!(BitMatrix::byte_len_for(4, 4), 2);
        assert_eq!(BitMatrix::byte_len_for(1, 1), 1);
        assert_eq!(BitMatrix::byte_len_for(0, 5), 0);
    }
}
