//! # grafcolor-graph
//!
//! Undirected graph with dense vertex ids, plus the derived
//! representations handed to the compute backend.
//!
//! ## Key Types
//!
//! - [`Graph`] — Name↔id registry, ascending neighbor sets, canonical edge list.
//! - [`AdjacencyMatrix`] — Dense N×N matrix of 0/1 words.
//! - [`BitMatrix`] — Row-major bit matrix, MSB-first within each byte.
//! - [`NonAdjacencyGroups`] / [`NonAdjacencyMatrix`] — Per-vertex lists of
//!   non-neighbors, ordered by ascending degree.
//! - [`MarshalledStream`] — The groups flattened into one buffer plus an
//!   offset index (CSR layout) for upload.
//! - Generators for random and canonical test graphs.

pub mod generators;
pub mod graph;
pub mod marshall;
pub mod matrix;
pub mod non_adjacency;

pub use graph::Graph;
pub use marshall::{marshall, marshall_groups, MarshalledStream};
pub use matrix::{get_bit, set_bit, AdjacencyMatrix, BitMatrix};
pub use non_adjacency::{NonAdjacencyGroups, NonAdjacencyMatrix};
