//! Centra CLI - run centrality measures on generated graphs.
//!
//! Graph loading is left to library users; the CLI generates R-MAT graphs so
//! runs are reproducible from the command line alone.

mod commands;
mod output;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Centra centrality tool.
///
/// Computes betweenness and Katz centrality on seeded R-MAT graphs and
/// reports the local devices available to the engine.
#[derive(Parser)]
#[command(name = "centra")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "table")]
    format: OutputFormat,

    /// Suppress progress and info messages
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose debug logging
    #[arg(long, short, global = true)]
    verbose: bool,
}

/// Output format options.
#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// Machine-readable JSON format
    Json,
}

impl OutputFormat {
    /// Returns true when stdout must carry nothing but the JSON document.
    fn is_json(self) -> bool {
        matches!(self, OutputFormat::Json)
    }
}

/// Source partitioning across devices.
#[derive(Clone, Copy, ValueEnum, Default)]
enum Partition {
    /// Consecutive runs of sources per device
    #[default]
    Contiguous,
    /// Sources dealt to devices in turn
    RoundRobin,
}

/// R-MAT graph parameters shared by every command.
#[derive(Args, Clone)]
struct GraphArgs {
    /// log2 of the vertex count
    #[arg(long, default_value_t = 10)]
    scale: u32,

    /// Candidate edges per vertex
    #[arg(long, default_value_t = 16)]
    edge_factor: usize,

    /// Generator seed
    #[arg(long, default_value_t = 0)]
    graph_seed: u64,

    /// Generate a directed graph
    #[arg(long)]
    directed: bool,

    /// Scramble vertex ids
    #[arg(long)]
    scramble: bool,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Describe the generated graph (counts, degrees)
    Info {
        #[command(flatten)]
        graph: GraphArgs,
    },

    /// Compute betweenness centrality
    Betweenness {
        #[command(flatten)]
        graph: GraphArgs,

        /// Number of sampled sources (exact when omitted)
        #[arg(long, short = 'k')]
        subset_size: Option<usize>,

        /// Sampling seed (random and logged when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Number of devices
        #[arg(long, short = 'd', default_value_t = 1)]
        devices: usize,

        /// Request peer links between devices
        #[arg(long)]
        peer_to_peer: bool,

        /// Source partitioning strategy
        #[arg(long, default_value = "contiguous")]
        partition: Partition,

        /// Report raw dependency sums instead of normalized scores
        #[arg(long)]
        raw: bool,

        /// Count path endpoints
        #[arg(long)]
        endpoints: bool,

        /// Score edges instead of vertices
        #[arg(long)]
        edges: bool,

        /// Number of top-ranked entries to show
        #[arg(long, default_value_t = 10)]
        top: usize,
    },

    /// Compute Katz centrality
    Katz {
        #[command(flatten)]
        graph: GraphArgs,

        /// Attenuation factor (1 / (max out-degree + 1) when omitted)
        #[arg(long)]
        alpha: Option<f64>,

        /// Constant term
        #[arg(long, default_value_t = 1.0)]
        beta: f64,

        /// Iteration limit
        #[arg(long, default_value_t = 1000)]
        max_iter: usize,

        /// Per-vertex convergence tolerance
        #[arg(long, default_value_t = 1e-6)]
        tolerance: f64,

        /// Skip L2 normalization
        #[arg(long)]
        raw: bool,

        /// Number of top-ranked vertices to show
        #[arg(long, default_value_t = 10)]
        top: usize,
    },

    /// Show local devices available to the engine
    Devices,
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays parseable
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(std::io::stderr)
            .init();
    } else if !cli.quiet {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_writer(std::io::stderr)
            .init();
    }

    let result = match cli.command {
        Commands::Info { graph } => commands::info::run(&graph, cli.format, cli.quiet),
        Commands::Betweenness {
            graph,
            subset_size,
            seed,
            devices,
            peer_to_peer,
            partition,
            raw,
            endpoints,
            edges,
            top,
        } => {
            let options = commands::betweenness::Options {
                subset_size,
                seed,
                devices,
                peer_to_peer,
                partition,
                normalized: !raw,
                endpoints,
                edges,
                top,
            };
            commands::betweenness::run(&graph, &options, cli.format, cli.quiet)
        }
        Commands::Katz {
            graph,
            alpha,
            beta,
            max_iter,
            tolerance,
            raw,
            top,
        } => {
            let options = commands::katz::Options {
                alpha,
                beta,
                max_iter,
                tolerance,
                normalized: !raw,
                top,
            };
            commands::katz::run(&graph, &options, cli.format, cli.quiet)
        }
        Commands::Devices => commands::devices::run(cli.format, cli.quiet),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
