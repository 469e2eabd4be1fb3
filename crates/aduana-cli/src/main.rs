//! # aduana CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use aduana_cli::check::{run_check, CheckArgs};
use aduana_cli::crossing::{run_crossing, CrossingArgs};
use aduana_cli::graph::{run_graph, GraphArgs};
use aduana_cli::preliq::{run_preliq, PreliqArgs};
use aduana_cli::rules::{run_rules, RulesArgs};

/// Aduana Stack CLI
///
/// Offline tooling for the customs operation lifecycle: transition
/// graph inspection, dry-run transition checks, rule catalogue listing,
/// declaration crossing, and preliquidation computation.
#[derive(Parser, Debug)]
#[command(name = "aduana", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the status transition allow-list.
    Graph(GraphArgs),

    /// Dry-run one transition edge; non-zero exit on rejection.
    Check(CheckArgs),

    /// Print the compliance rule catalogue.
    Rules(RulesArgs),

    /// Cross a preliminary and a final declaration file offline.
    Crossing(CrossingArgs),

    /// Compute preliquidation totals for a declaration file.
    Preliq(PreliqArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Graph(args) => run_graph(&args),
        Commands::Check(args) => run_check(&args),
        Commands::Rules(args) => run_rules(&args),
        Commands::Crossing(args) => run_crossing(&args),
        Commands::Preliq(args) => run_preliq(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(error) => {
            tracing::error!("{error:#}");
            ExitCode::from(1)
        }
    }
}
