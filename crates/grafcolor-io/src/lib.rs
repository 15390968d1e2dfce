//! # grafcolor-io
//!
//! Graph input parsing and plain-text dumps.
//!
//! The input format is one record per line: `name` registers a vertex,
//! `name1,name2` registers both and connects them. Spaces are ignored,
//! lines starting with `#` are comments.

pub mod loader;
pub mod writer;

pub use loader::{load_graph, parse_graph};
pub use writer::{write_adjacency_list, write_bit_matrix, write_edge_list, write_matrix};
