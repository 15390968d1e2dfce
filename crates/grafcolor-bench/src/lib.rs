//! # grafcolor-bench
//!
//! Benchmark suite for the coloring orchestrators.
//!
//! Provides 4 procedural graph scenarios, runs every algorithm on each,
//! and exports the collected metrics as CSV for regression tracking.

pub mod metrics;
pub mod runner;
pub mod scenarios;

pub use metrics::BenchmarkMetrics;
pub use runner::BenchmarkRunner;
pub use scenarios::{Scenario, ScenarioKind};
