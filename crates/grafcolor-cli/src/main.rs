//! grafcolor CLI — GPU-offloaded graph coloring.

use std::path::PathBuf;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

use commands::{ColorArgs, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "grafcolor")]
#[command(version, about = "grafcolor — vertex coloring on GPU compute backends")]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Coloring algorithm as named on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AlgorithmArg {
    /// Luby independent-set rounds.
    Luby,
    /// Vertex independent sets from non-adjacency groups.
    Vis,
    /// Sequential first-fit on the host.
    Seq,
}

/// Compute backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    /// Sequential CPU reference backend.
    Cpu,
    /// OpenCL device (requires the `opencl` feature).
    Opencl,
}

#[derive(Subcommand)]
enum Commands {
    /// Color a graph file.
    Color {
        /// Algorithm to run.
        #[arg(value_enum)]
        algorithm: AlgorithmArg,

        /// Graph file: one `name` or `name1,name2` per line, `#` comments.
        graph: PathBuf,

        /// OpenCL source file replacing the embedded kernel.
        #[arg(long)]
        kernel_file: Option<PathBuf>,

        /// Kernel entry point.
        #[arg(long)]
        kernel_name: Option<String>,

        /// Coloring config (TOML).
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value = "cpu")]
        backend: BackendArg,

        /// Seed for Luby priorities.
        #[arg(long)]
        seed: Option<u64>,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Generate a random graph as an edge list on stdout.
    Generate {
        /// Number of vertices.
        vertices: usize,

        /// Fraction of all possible edges to create, in [0, 1].
        #[arg(default_value_t = grafcolor_types::constants::DEFAULT_COMPLETENESS)]
        completeness: f64,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print a graph's adjacency list and matrices.
    Inspect {
        /// Graph file.
        graph: PathBuf,
    },

    /// Run benchmark suite.
    Benchmark {
        /// Which scenario to run (path, cycle, complete, random, all).
        #[arg(short, long, default_value = "all")]
        scenario: String,

        /// Output CSV file path.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(EXIT_USAGE);
        }
    };
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Color {
            algorithm,
            graph,
            kernel_file,
            kernel_name,
            config,
            backend,
            seed,
            json,
        } => commands::color(&ColorArgs {
            algorithm,
            graph,
            kernel_file,
            kernel_name,
            config,
            backend,
            seed,
            json,
        }),
        Commands::Generate {
            vertices,
            completeness,
            seed,
        } => commands::generate(vertices, completeness, seed),
        Commands::Inspect { graph } => commands::inspect(&graph),
        Commands::Benchmark { scenario, output } => commands::benchmark(&scenario, output.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_color_command() {
        let cli = Cli::try_parse_from([
            "grafcolor",
            "color",
            "luby",
            "graph.txt",
            "--kernel-name",
            "getISSet",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Color {
                algorithm,
                kernel_name,
                backend,
                json,
                ..
            } => {
                assert_eq!(algorithm, AlgorithmArg::Luby);
                assert_eq!(kernel_name.as_deref(), Some("getISSet"));
                assert_eq!(backend, BackendArg::Cpu);
                assert!(json);
            }
            _ => panic!("expected color command"),
        }
    }

    #[test]
    fn generate_defaults_completeness() {
        let cli = Cli::try_parse_from(["grafcolor", "generate", "10"]).unwrap();
        match cli.command {
            Commands::Generate { completeness, .. } => assert_eq!(completeness, 0.5),
            _ => panic!("expected generate command"),
        }
    }

    #[test]
    fn unknown_algorithm_is_usage_error() {
        let err = Cli::try_parse_from(["grafcolor", "color", "dsatur", "g.txt"]).err();
        assert!(matches!(err.map(|e| e.kind()), Some(ErrorKind::InvalidValue)));
    }
}
