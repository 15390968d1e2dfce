//! # grafcolor-types
//!
//! Shared identifiers, error types and defaults for the grafcolor
//! GPU graph-coloring workspace.
//!
//! This crate has no domain logic. It defines the vocabulary shared by
//! the other grafcolor crates.

pub mod constants;
pub mod error;
pub mod ids;

pub use error::{GrafcolorError, GrafcolorResult};
pub use ids::VertexId;
