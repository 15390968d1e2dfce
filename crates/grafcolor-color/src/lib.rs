//! # grafcolor-color
//!
//! Vertex coloring orchestrators that drive a [`ComputeBackend`](grafcolor_gpu::ComputeBackend).
//!
//! - [`luby`] — Randomized independent-set extraction, one color per round.
//! - [`non_adjacency`] — Batched group kernel, host-side conflict
//!   resolution and a greedy fallback bounded by `max_degree + 1` colors.
//! - [`greedy`] — Sequential first-fit coloring on the host.
//!
//! All three produce a [`ColorAssignment`] wrapped in a [`ColoringOutcome`]
//! and are selectable at runtime through the [`ColoringStrategy`] trait.

pub mod assignment;
pub mod config;
pub mod greedy;
pub mod luby;
pub mod non_adjacency;
pub mod strategy;

pub use assignment::ColorAssignment;
pub use config::{Algorithm, ColoringConfig, KernelOverride};
pub use greedy::color_sequential;
pub use luby::color_luby;
pub use non_adjacency::color_non_adjacency;
pub use strategy::{
    strategy_for, ColoringOutcome, ColoringStrategy, LubyColoring, NonAdjacencyColoring,
    SequentialColoring,
};
