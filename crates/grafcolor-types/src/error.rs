//! Error types for grafcolor.
//!
//! All crates return `GrafcolorResult<T>` from fallible operations.

use thiserror::Error;

/// Unified error type for graph construction, backend work and coloring.
#[derive(Debug, Error)]
pub enum GrafcolorError {
    /// Graph input could not be read or contained no vertices.
    #[error("Graph load failed: {0}")]
    GraphLoad(String),

    /// A derived representation was requested from a graph with no vertices.
    #[error("Graph has no vertices")]
    EmptyGraph,

    /// A vertex id outside `[0, size)` was passed to a graph query.
    #[error("Invalid vertex id {id} (graph has {size} vertices)")]
    InvalidVertexId { id: u32, size: usize },

    /// No eligible compute device, or the backend was used before `init`.
    #[error("Compute backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Kernel source failed to build or the entry point does not exist.
    #[error("Kernel build failed for '{entry_point}': {log}")]
    Compile { entry_point: String, log: String },

    /// Device buffer allocation failed.
    #[error("Buffer allocation failed: {0}")]
    Allocation(String),

    /// Kernel argument binding or enqueue failed.
    #[error("Kernel dispatch failed: {0}")]
    Dispatch(String),

    /// Device-to-host read failed.
    #[error("Buffer readback failed: {0}")]
    Readback(String),

    /// Queue synchronization (finish) failed.
    #[error("Queue synchronization failed: {0}")]
    Sync(String),

    /// Configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A color assignment violates the proper-coloring invariant.
    #[error("Invalid coloring: {0}")]
    InvalidColoring(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GrafcolorError {
    /// Returns true for failures that originate in the compute backend or
    /// its environment rather than in the graph input.
    pub fn is_backend(&self) -> bool {
        matches!(
            self,
            GrafcolorError::BackendUnavailable(_)
                | GrafcolorError::Compile { .. }
                | GrafcolorError::Allocation(_)
                | GrafcolorError::Dispatch(_)
                | GrafcolorError::Readback(_)
                | GrafcolorError::Sync(_)
        )
    }
}

/// Convenience alias for `Result<T, GrafcolorError>`.
pub type GrafcolorResult<T> = Result<T, GrafcolorError>;
