//! sr-eval CLI - Super-resolution model evaluation tool

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

/// Super-resolution model evaluation tool.
#[derive(Parser)]
#[command(name = "sr-eval")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate a model on every test set of an options file
    Test {
        /// Options JSON file
        #[arg(short, long, default_value = "options/test_sr.json")]
        opt: PathBuf,

        /// Also write JSON and CSV reports to the log directory
        #[arg(long)]
        report: bool,

        /// Override train.manual_seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Score an estimated image against a reference
    Compare {
        /// Estimated (super-resolved) image
        estimated: PathBuf,

        /// Ground-truth image
        reference: PathBuf,

        /// Pixels excluded from each side
        #[arg(short, long, default_value_t = 0)]
        border: usize,
    },

    /// Show the latest checkpoint in a directory
    Checkpoint {
        /// Checkpoint directory
        dir: PathBuf,

        /// Network tag (G, E, optimizerG)
        #[arg(long, default_value = "G")]
        net: String,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Test { opt, report, seed } => commands::test::run(&opt, report, seed),
        Commands::Compare { estimated, reference, border } => {
            commands::compare::run(&estimated, &reference, border)
        }
        Commands::Checkpoint { dir, net } => commands::checkpoint::run(&dir, &net),
    }
}
