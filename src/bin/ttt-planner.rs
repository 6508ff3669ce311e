//! ttt-planner CLI - Solve Tic-Tac-Toe exactly and play with the result
//!
//! This CLI provides a unified interface for:
//! - Solving the game with value or policy iteration and storing the tables
//! - Playing matches between table-driven, random and human agents
//! - Inspecting stored tables at a given board

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(name = "ttt-planner")]
#[command(version, about = "Exact dynamic-programming solver for Tic-Tac-Toe", long_about = None)]
struct Cli {
    /// Log every solver sweep
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve the game and store value and policy tables
    Plan(ttt_planner::cli::commands::plan::PlanArgs),

    /// Play a match between two agents
    Play(ttt_planner::cli::commands::play::PlayArgs),

    /// Show the stored tables at one board
    Inspect(ttt_planner::cli::commands::inspect::InspectArgs),
}

fn init_logging(verbose: bool) -> Result<()> {
    let default = if verbose {
        "ttt_planner=debug"
    } else {
        "ttt_planner=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    match cli.command {
        Commands::Plan(args) => ttt_planner::cli::commands::plan::execute(args),
        Commands::Play(args) => ttt_planner::cli::commands::play::execute(args),
        Commands::Inspect(args) => ttt_planner::cli::commands::inspect::execute(args),
    }
}
