//! CLI command implementations.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use grafcolor_bench::metrics::BenchmarkMetrics;
use grafcolor_bench::runner::BenchmarkRunner;
use grafcolor_bench::scenarios::{Scenario, ScenarioKind};
use grafcolor_color::{strategy_for, Algorithm, ColoringConfig, ColoringOutcome, KernelOverride};
use grafcolor_gpu::{ComputeBackend, CpuFallback};
use grafcolor_graph::generators::random_graph;
use grafcolor_graph::Graph;
use grafcolor_io::{load_graph, write_adjacency_list, write_bit_matrix, write_edge_list, write_matrix};
use grafcolor_telemetry::{EventBus, TracingSink};
use grafcolor_types::constants::{
    DEFAULT_LUBY_KERNEL_FILE, DEFAULT_LUBY_KERNEL_NAME, DEFAULT_VIS_KERNEL_FILE,
    DEFAULT_VIS_KERNEL_NAME,
};
use grafcolor_types::GrafcolorError;

use crate::{AlgorithmArg, BackendArg};

/// Exit code for usage and backend failures.
pub const EXIT_USAGE: i32 = 1;
const EXIT_GRAPH_LOAD: i32 = 2;
const EXIT_ADJACENCY: i32 = 3;
const EXIT_NON_ADJACENCY: i32 = 4;

/// A failed command, tagged with the stage that failed.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("cannot load graph: {0}")]
    GraphLoad(GrafcolorError),
    #[error("adjacency computation failed: {0}")]
    Adjacency(GrafcolorError),
    #[error("non-adjacency computation failed: {0}")]
    NonAdjacency(GrafcolorError),
    #[error("{0}")]
    Run(#[from] GrafcolorError),
    #[error("{0}")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Usage(String),
}

impl CliError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::GraphLoad(_) => EXIT_GRAPH_LOAD,
            CliError::Adjacency(_) => EXIT_ADJACENCY,
            CliError::NonAdjacency(_) => EXIT_NON_ADJACENCY,
            CliError::Run(_) | CliError::Io(_) | CliError::Usage(_) => EXIT_USAGE,
        }
    }
}

type CommandResult = Result<(), CliError>;

/// Arguments of `grafcolor color`.
pub struct ColorArgs {
    pub algorithm: AlgorithmArg,
    pub graph: PathBuf,
    pub kernel_file: Option<PathBuf>,
    pub kernel_name: Option<String>,
    pub config: Option<PathBuf>,
    pub backend: BackendArg,
    pub seed: Option<u64>,
    pub json: bool,
}

impl AlgorithmArg {
    fn algorithm(self) -> Algorithm {
        match self {
            AlgorithmArg::Luby => Algorithm::Luby,
            AlgorithmArg::Vis => Algorithm::NonAdjacency,
            AlgorithmArg::Seq => Algorithm::Sequential,
        }
    }
}

/// Builds the run config from the optional file and the flags.
fn coloring_config(args: &ColorArgs) -> Result<ColoringConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => ColoringConfig::load(path)?,
        None => ColoringConfig::default(),
    };
    config.algorithm = args.algorithm.algorithm();
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let (default_file, default_name) = match config.algorithm {
        Algorithm::Luby => (DEFAULT_LUBY_KERNEL_FILE, DEFAULT_LUBY_KERNEL_NAME),
        _ => (DEFAULT_VIS_KERNEL_FILE, DEFAULT_VIS_KERNEL_NAME),
    };
    match (&args.kernel_file, &args.kernel_name) {
        (None, None) => {}
        (file, name) => {
            config.kernel = Some(KernelOverride {
                file: file.clone().unwrap_or_else(|| PathBuf::from(default_file)),
                entry_point: name.clone().unwrap_or_else(|| default_name.to_string()),
            });
        }
    }
    config.validate()?;
    Ok(config)
}

fn make_backend(kind: BackendArg) -> Result<Box<dyn ComputeBackend>, CliError> {
    let mut backend: Box<dyn ComputeBackend> = match kind {
        BackendArg::Cpu => Box::new(CpuFallback::new()),
        #[cfg(feature = "opencl")]
        BackendArg::Opencl => Box::new(grafcolor_gpu::OpenClBackend::new()),
        #[cfg(not(feature = "opencl"))]
        BackendArg::Opencl => {
            return Err(GrafcolorError::BackendUnavailable(
                "built without the `opencl` feature".into(),
            )
            .into())
        }
    };
    backend.init()?;
    Ok(backend)
}

/// JSON form of a coloring result.
#[derive(Serialize)]
struct ColoringReport<'a> {
    algorithm: &'a str,
    backend: &'a str,
    colors: usize,
    rounds: u32,
    dispatches: u32,
    fallback_vertices: u32,
    wall_time: f64,
    coloring: BTreeMap<&'a str, u32>,
}

fn coloring_by_name<'a>(graph: &'a Graph, outcome: &ColoringOutcome) -> BTreeMap<&'a str, u32> {
    graph
        .vertex_names()
        .into_iter()
        .filter_map(|name| {
            let id = graph.id_of(name)?;
            Some((name, outcome.assignment.get(id.index())?))
        })
        .collect()
}

/// Color a graph file.
pub fn color(args: &ColorArgs) -> CommandResult {
    let config = coloring_config(args)?;
    let graph = load_graph(&args.graph).map_err(CliError::GraphLoad)?;

    // Check the derived representations up front so failures map to their exit code.
    graph.adjacency_matrix().map_err(CliError::Adjacency)?;
    if config.algorithm == Algorithm::NonAdjacency {
        graph.non_adjacency_groups().map_err(CliError::NonAdjacency)?;
    }

    let backend = make_backend(args.backend)?;
    let mut bus = EventBus::new();
    bus.add_sink(Box::new(TracingSink::new(tracing::Level::DEBUG)));

    let mut strategy = strategy_for(&config);
    let result = strategy.color(&graph, backend.as_ref(), Some(&bus));
    bus.finalize();
    let outcome = result?;

    let coloring = coloring_by_name(&graph, &outcome);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        let report = ColoringReport {
            algorithm: config.algorithm.name(),
            backend: backend.name(),
            colors: outcome.color_count(),
            rounds: outcome.rounds,
            dispatches: outcome.dispatches,
            fallback_vertices: outcome.fallback_vertices,
            wall_time: outcome.wall_time,
            coloring,
        };
        serde_json::to_writer_pretty(&mut out, &report).map_err(io::Error::from)?;
        writeln!(out)?;
    } else {
        writeln!(out, "grafcolor: {} on {}", strategy.name(), backend.name())?;
        writeln!(out, "─────────────────────────────")?;
        for (name, color) in &coloring {
            writeln!(out, "{name}: {color}")?;
        }
        writeln!(out)?;
        writeln!(out, "Vertices:   {}", graph.vertex_count())?;
        writeln!(out, "Edges:      {}", graph.edge_count())?;
        writeln!(out, "Colors:     {}", outcome.color_count())?;
        writeln!(out, "Rounds:     {}", outcome.rounds)?;
        if config.algorithm == Algorithm::NonAdjacency {
            writeln!(out, "Groups:     {}", outcome.group_colors)?;
            writeln!(out, "Fallback:   {}", outcome.fallback_vertices)?;
        }
        writeln!(out, "Wall time:  {:.3}ms", outcome.wall_time * 1000.0)?;
    }
    Ok(())
}

/// Print a random graph as an edge list.
pub fn generate(vertices: usize, completeness: f64, seed: Option<u64>) -> CommandResult {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let graph = random_graph(vertices, completeness, &mut rng)?;
    tracing::info!(vertices, edges = graph.edge_count(), "generated random graph");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    // Isolated vertices would be lost from a plain edge list.
    for id in 0..graph.vertex_count() as u32 {
        if graph.degree(id.into())? == 0 {
            if let Some(name) = graph.name_of(id.into()) {
                writeln!(out, "{name}")?;
            }
        }
    }
    write_edge_list(&graph, &mut out)?;
    Ok(())
}

/// Print a graph's adjacency list, dense matrix and bit matrix.
pub fn inspect(path: &Path) -> CommandResult {
    let graph = load_graph(path).map_err(CliError::GraphLoad)?;
    let matrix = graph.adjacency_matrix().map_err(CliError::Adjacency)?;
    let bits = graph.adjacency_bit_matrix().map_err(CliError::Adjacency)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "grafcolor Graph Inspector")?;
    writeln!(out, "─────────────────────────")?;
    writeln!(out, "Vertices:    {}", graph.vertex_count())?;
    writeln!(out, "Edges:       {}", graph.edge_count())?;
    writeln!(out, "Max degree:  {}", graph.max_degree())?;
    writeln!(out)?;
    writeln!(out, "Adjacency list:")?;
    write_adjacency_list(&graph, &mut out)?;
    writeln!(out)?;
    writeln!(out, "Adjacency matrix:")?;
    write_matrix(&graph, &matrix, &mut out)?;
    writeln!(out)?;
    writeln!(out, "Adjacency bit matrix ({} bytes):", bits.byte_len())?;
    write_bit_matrix(&graph, &bits, &mut out)?;
    Ok(())
}

/// Run benchmark suite.
pub fn benchmark(scenario_name: &str, output_path: Option<&Path>) -> CommandResult {
    println!("grafcolor Benchmark Suite");
    println!("═════════════════════════");
    println!();

    let scenarios: Vec<ScenarioKind> = if scenario_name == "all" {
        ScenarioKind::all().to_vec()
    } else {
        let kind = ScenarioKind::from_name(scenario_name).ok_or_else(|| {
            let available: Vec<&str> = ScenarioKind::all().iter().map(|k| k.name()).collect();
            CliError::Usage(format!(
                "unknown scenario: {scenario_name} (available: {}, all)",
                available.join(", ")
            ))
        })?;
        vec![kind]
    };

    let backend = make_backend(BackendArg::Cpu)?;
    let mut all_metrics = Vec::new();

    for &kind in &scenarios {
        let scenario = Scenario::from_kind(kind)?;
        println!(
            "Running: {} ({} verts, {} edges, max degree {})",
            kind.name(),
            scenario.graph.vertex_count(),
            scenario.graph.edge_count(),
            scenario.graph.max_degree(),
        );

        for metrics in BenchmarkRunner::run(&scenario, backend.as_ref())? {
            println!(
                "  {:<14} colors {:>4}  rounds {:>4}  {:>9.3}ms  {}",
                metrics.algorithm,
                metrics.colors,
                metrics.rounds,
                metrics.wall_time * 1000.0,
                if metrics.valid { "ok" } else { "INVALID" },
            );
            all_metrics.push(metrics);
        }
        println!();
    }

    let csv = BenchmarkMetrics::to_csv(&all_metrics);
    if let Some(path) = output_path {
        std::fs::write(path, &csv)?;
        println!("Results written to: {}", path.display());
    } else {
        println!("CSV Output:");
        println!("{csv}");
    }

    Ok(())
}
