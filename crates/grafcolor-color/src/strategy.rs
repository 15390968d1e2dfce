//! Coloring strategy trait for switching orchestrators at runtime.
//!
//! The CLI and benchmark runner hold a `Box<dyn ColoringStrategy>` built
//! from a [`ColoringConfig`], so swapping Luby, group or sequential
//! coloring is a config change.

use serde::{Deserialize, Serialize};

use grafcolor_gpu::ComputeBackend;
use grafcolor_graph::Graph;
use grafcolor_telemetry::EventBus;
use grafcolor_types::GrafcolorResult;

use crate::assignment::ColorAssignment;
use crate::config::{Algorithm, ColoringConfig};

/// Result of a coloring run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColoringOutcome {
    pub assignment: ColorAssignment,
    pub algorithm: Algorithm,
    /// Luby rounds, or group-kernel batches.
    pub rounds: u32,
    /// Kernel dispatches issued.
    pub dispatches: u32,
    /// Colors handed out by group resolution (group coloring only).
    pub group_colors: u32,
    /// Vertices colored by the greedy fallback (group coloring only).
    pub fallback_vertices: u32,
    /// Wall-clock time for the run (seconds).
    pub wall_time: f64,
}

impl ColoringOutcome {
    /// Number of distinct colors used.
    pub fn color_count(&self) -> usize {
        self.assignment.color_count()
    }
}

/// Trait for coloring orchestrators.
///
/// ```text
/// let mut strategy = strategy_for(&config);
/// let outcome = strategy.color(&graph, &backend, Some(&bus))?;
/// ```
///
/// # Implementations
///
/// - [`LubyColoring`] — Independent-set rounds on the device
/// - [`NonAdjacencyColoring`] — Group kernel + conflict resolution + fallback
/// - [`SequentialColoring`] — Host-only first-fit (ignores the backend)
pub trait ColoringStrategy: Send {
    /// Colors `graph`. The backend must already be initialized.
    fn color(
        &mut self,
        graph: &Graph,
        backend: &dyn ComputeBackend,
        events: Option<&EventBus>,
    ) -> GrafcolorResult<ColoringOutcome>;

    /// Returns the strategy's name.
    fn name(&self) -> &str;
}

/// Luby independent-set coloring.
pub struct LubyColoring {
    pub config: ColoringConfig,
}

impl ColoringStrategy for LubyColoring {
    fn color(
        &mut self,
        graph: &Graph,
        backend: &dyn ComputeBackend,
        events: Option<&EventBus>,
    ) -> GrafcolorResult<ColoringOutcome> {
        crate::luby::color_luby(graph, backend, &self.config, events)
    }

    fn name(&self) -> &str {
        "luby"
    }
}

/// Non-adjacency group coloring.
pub struct NonAdjacencyColoring {
    pub config: ColoringConfig,
}

impl ColoringStrategy for NonAdjacencyColoring {
    fn color(
        &mut self,
        graph: &Graph,
        backend: &dyn ComputeBackend,
        events: Option<&EventBus>,
    ) -> GrafcolorResult<ColoringOutcome> {
        crate::non_adjacency::color_non_adjacency(graph, backend, &self.config, events)
    }

    fn name(&self) -> &str {
        "non_adjacency"
    }
}

/// Sequential first-fit coloring.
pub struct SequentialColoring;

impl ColoringStrategy for SequentialColoring {
    fn color(
        &mut self,
        graph: &Graph,
        _backend: &dyn ComputeBackend,
        _events: Option<&EventBus>,
    ) -> GrafcolorResult<ColoringOutcome> {
        let start = std::time::Instant::now();
        let assignment = crate::greedy::color_sequential(graph)?;
        Ok(ColoringOutcome {
            assignment,
            algorithm: Algorithm::Sequential,
            rounds: 1,
            dispatches: 0,
            group_colors: 0,
            fallback_vertices: 0,
            wall_time: start.elapsed().as_secs_f64(),
        })
    }

    fn name(&self) -> &str {
        "sequential"
    }
}

/// Builds the strategy selected by `config.algorithm`.
pub fn strategy_for(config: &ColoringConfig) -> Box<dyn ColoringStrategy> {
    match config.algorithm {
        Algorithm::Luby => Box::new(LubyColoring {
            config: config.clone(),
        }),
        Algorithm::NonAdjacency => Box::new(NonAdjacencyColoring {
            config: config.clone(),
        }),
        Algorithm::Sequential => Box::new(SequentialColoring),
    }
}
