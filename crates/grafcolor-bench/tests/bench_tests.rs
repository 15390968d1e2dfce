//! Integration tests for grafcolor-bench.

use grafcolor_bench::metrics::BenchmarkMetrics;
use grafcolor_bench::runner::BenchmarkRunner;
use grafcolor_bench::scenarios::{Scenario, ScenarioKind};
use grafcolor_color::Algorithm;
use grafcolor_gpu::{ComputeBackend, CpuFallback};

fn backend() -> CpuFallback {
    let mut backend = CpuFallback::new();
    backend.init().unwrap();
    backend
}

// ─── Scenario Tests ───────────────────────────────────────────

#[test]
fn path_setup() {
    let s = Scenario::path();
    assert_eq!(s.kind, ScenarioKind::Path);
    assert_eq!(s.graph.vertex_count(), 256);
    assert_eq!(s.graph.edge_count(), 255);
    assert_eq!(s.graph.max_degree(), 2);
}

#[test]
fn cycle_is_odd() {
    let s = Scenario::cycle();
    assert_eq!(s.graph.vertex_count() % 2, 1);
    assert_eq!(s.graph.edge_count(), s.graph.vertex_count());
}

#[test]
fn random_is_reproducible() {
    let a = Scenario::random().unwrap();
    let b = Scenario::random().unwrap();
    assert_eq!(a.graph.edges(), b.graph.edges());
    assert_eq!(a.graph.edge_count(), 200 * 199 / 2 * 3 / 10);
}

#[test]
fn all_scenarios() {
    assert_eq!(ScenarioKind::all().len(), 4);
    for &kind in ScenarioKind::all() {
        assert_eq!(ScenarioKind::from_name(kind.name()), Some(kind));
        assert_eq!(Scenario::from_kind(kind).unwrap().kind, kind);
    }
    assert_eq!(ScenarioKind::from_name("hypercube"), None);
}

// ─── Runner Tests ─────────────────────────────────────────────

#[test]
fn run_complete_needs_every_color() {
    let backend = backend();
    let scenario = Scenario::complete();
    let metrics = BenchmarkRunner::run(&scenario, &backend).unwrap();
    assert_eq!(metrics.len(), Algorithm::all().len());
    for m in &metrics {
        assert!(m.valid, "{}", m.algorithm);
        assert_eq!(m.colors, 32, "{}", m.algorithm);
    }
}

#[test]
fn run_sequential_meets_lower_bounds() {
    let backend = backend();
    for scenario in [Scenario::path(), Scenario::cycle()] {
        let m = BenchmarkRunner::run_one(&scenario, Algorithm::Sequential, &backend).unwrap();
        assert!(m.valid);
        assert_eq!(Some(m.colors), scenario.min_colors);
        assert_eq!(m.dispatches, 0);
    }
}

#[test]
fn run_all_scenarios_valid() {
    let backend = backend();
    let metrics = BenchmarkRunner::run_all(&backend).unwrap();
    assert_eq!(metrics.len(), ScenarioKind::all().len() * Algorithm::all().len());
    assert!(metrics.iter().all(|m| m.valid));
    assert!(metrics
        .iter()
        .filter(|m| m.algorithm == "luby")
        .all(|m| m.dispatches == m.rounds));
    assert_eq!(backend.live_buffers(), 0);
}

// ─── Metrics Tests ────────────────────────────────────────────

fn sample() -> BenchmarkMetrics {
    BenchmarkMetrics {
        scenario: "path".into(),
        algorithm: "luby".into(),
        vertex_count: 4,
        edge_count: 3,
        max_degree: 2,
        colors: 2,
        rounds: 3,
        dispatches: 3,
        fallback_vertices: 0,
        wall_time: 0.0015,
        valid: true,
    }
}

#[test]
fn csv_row_matches_header() {
    let header_cols = BenchmarkMetrics::to_csv_header().split(',').count();
    let row = sample().to_csv_row();
    assert_eq!(row.split(',').count(), header_cols);
    assert_eq!(row, "path,luby,4,3,2,2,3,3,0,1.5000,true");
}

#[test]
fn csv_multiple_rows() {
    let csv = BenchmarkMetrics::to_csv(&[sample(), sample()]);
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.starts_with("scenario,algorithm"));
}

#[test]
fn metrics_json() {
    let json = serde_json::to_string(&sample()).unwrap();
    let back: BenchmarkMetrics = serde_json::from_str(&json).unwrap();
    assert_eq!(back.colors, 2);
    assert!(back.valid);
}
