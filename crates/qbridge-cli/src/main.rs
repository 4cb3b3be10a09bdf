//! qbridge CLI - translate circuits between DAG and vertex listings.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{adjacency, common, forward, grid, reverse, roundtrip};

/// qbridge - DAG / vertex circuit translator
#[derive(Parser)]
#[command(name = "qbridge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Translation policy file (YAML)
    #[arg(long, global = true, env = "QBRIDGE_CONFIG")]
    config: Option<PathBuf>,

    /// Fail on unknown operations instead of boxing them
    #[arg(long, global = true)]
    no_box_unknown: bool,

    /// Drop classical conditions instead of failing
    #[arg(long, global = true)]
    drop_conditions: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Translate a DAG listing into a vertex listing
    Forward {
        /// Input DAG listing (JSON)
        #[arg(short, long)]
        input: String,

        /// Output file (default: <input>_vertex.json)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Translate a vertex listing back into a DAG listing
    Reverse {
        /// Input vertex listing (JSON)
        #[arg(short, long)]
        input: String,

        /// Output file (default: <input>_dag.json)
        #[arg(short, long)]
        output: Option<String>,

        /// Name of the quantum register to create
        #[arg(long, default_value = "q")]
        qreg: String,
    },

    /// Translate a DAG listing forward and back, and compare
    Roundtrip {
        /// Input DAG listing (JSON)
        #[arg(short, long)]
        input: String,
    },

    /// Print the routing grid of a vertex listing
    Grid {
        /// Input vertex listing (JSON)
        #[arg(short, long)]
        input: String,
    },

    /// Print the directed adjacency of a coupling list
    Adjacency {
        /// Directed pairs, e.g. "0-1,1-2"
        #[arg(short, long)]
        pairs: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let policy = || {
        common::load_policy(
            cli.config.as_deref(),
            cli.no_box_unknown,
            cli.drop_conditions,
        )
    };

    // Execute command
    let result = match &cli.command {
        Commands::Forward { input, output } => {
            policy().and_then(|p| forward::execute(input, output.as_deref(), &p))
        }
        Commands::Reverse {
            input,
            output,
            qreg,
        } => reverse::execute(input, output.as_deref(), qreg),
        Commands::Roundtrip { input } => policy().and_then(|p| roundtrip::execute(input, &p)),
        Commands::Grid { input } => grid::execute(input),
        Commands::Adjacency { pairs } => adjacency::execute(pairs),
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
