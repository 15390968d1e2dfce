//! Benchmark runner — colors scenarios with each algorithm and collects metrics.

use grafcolor_color::{strategy_for, Algorithm, ColoringConfig};
use grafcolor_gpu::ComputeBackend;
use grafcolor_types::GrafcolorResult;

use crate::metrics::BenchmarkMetrics;
use crate::scenarios::{Scenario, ScenarioKind};

/// Seed for Luby priorities, so runs are comparable.
const LUBY_SEED: u64 = 42;

/// Runs benchmark scenarios and collects metrics.
pub struct BenchmarkRunner;

impl BenchmarkRunner {
    /// Run one algorithm on a scenario.
    ///
    /// A coloring that fails validation is reported with `valid: false`;
    /// backend errors abort the run.
    pub fn run_one(
        scenario: &Scenario,
        algorithm: Algorithm,
        backend: &dyn ComputeBackend,
    ) -> GrafcolorResult<BenchmarkMetrics> {
        let config = ColoringConfig {
            algorithm,
            seed: Some(LUBY_SEED),
            ..ColoringConfig::default()
        };
        let graph = &scenario.graph;
        let outcome = strategy_for(&config).color(graph, backend, None)?;
        let valid = outcome.assignment.validate(graph).is_ok();

        tracing::info!(
            scenario = scenario.kind.name(),
            algorithm = algorithm.name(),
            colors = outcome.color_count(),
            wall_time = outcome.wall_time,
            "benchmark run complete"
        );

        Ok(BenchmarkMetrics {
            scenario: scenario.kind.name().to_string(),
            algorithm: algorithm.name().to_string(),
            vertex_count: graph.vertex_count(),
            edge_count: graph.edge_count(),
            max_degree: graph.max_degree(),
            colors: outcome.color_count(),
            rounds: outcome.rounds,
            dispatches: outcome.dispatches,
            fallback_vertices: outcome.fallback_vertices,
            wall_time: outcome.wall_time,
            valid,
        })
    }

    /// Run every algorithm on a scenario.
    pub fn run(
        scenario: &Scenario,
        backend: &dyn ComputeBackend,
    ) -> GrafcolorResult<Vec<BenchmarkMetrics>> {
        Algorithm::all()
            .iter()
            .map(|&algorithm| Self::run_one(scenario, algorithm, backend))
            .collect()
    }

    /// Run all scenarios with every algorithm.
    pub fn run_all(backend: &dyn ComputeBackend) -> GrafcolorResult<Vec<BenchmarkMetrics>> {
        let mut results = Vec::new();
        for &kind in ScenarioKind::all() {
            let scenario = Scenario::from_kind(kind)?;
            results.extend(Self::run(&scenario, backend)?);
        }
        Ok(results)
    }
}
