//! Benchmark metrics — data collected during a benchmark run.

use serde::{Deserialize, Serialize};

/// Metrics collected from one algorithm on one scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkMetrics {
    /// Scenario name.
    pub scenario: String,
    /// Algorithm name.
    pub algorithm: String,
    pub vertex_count: usize,
    pub edge_count: usize,
    pub max_degree: usize,
    /// Distinct colors used.
    pub colors: usize,
    /// Luby rounds or group batches (1 for sequential).
    pub rounds: u32,
    /// Kernel dispatches.
    pub dispatches: u32,
    /// Vertices colored by the greedy fallback.
    pub fallback_vertices: u32,
    /// Total wall-clock time (seconds).
    pub wall_time: f64,
    /// Whether the coloring passed validation.
    pub valid: bool,
}

impl BenchmarkMetrics {
    /// CSV header row.
    pub fn to_csv_header() -> String {
        "scenario,algorithm,vertex_count,edge_count,max_degree,colors,rounds,dispatches,fallback_vertices,wall_time_ms,valid".to_string()
    }

    /// Format this metrics instance as a CSV data row.
    pub fn to_csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{},{:.4},{}",
            self.scenario,
            self.algorithm,
            self.vertex_count,
            self.edge_count,
            self.max_degree,
            self.colors,
            self.rounds,
            self.dispatches,
            self.fallback_vertices,
            self.wall_time * 1000.0,
            self.valid,
        )
    }

    /// Format multiple metrics as a complete CSV string.
    pub fn to_csv(metrics: &[BenchmarkMetrics]) -> String {
        let mut csv = Self::to_csv_header();
        for m in metrics {
            csv.push('\n');
            csv.push_str(&m.to_csv_row());
        }
        csv
    }
}
