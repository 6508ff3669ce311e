//! Inspect command - Show the stored value and policy of a board

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use crate::{
    Error,
    adapters::MsgPackRepository,
    cli::output::{print_board, print_kv, print_section, print_subsection},
    environment::Environment,
    planner::{SavedPolicyTable, SavedValueTable},
    ports::{Observation, TableRepository},
    tictactoe::{BoardState, Player},
};

#[derive(Parser, Debug)]
#[command(about = "Inspect stored tables at one board")]
pub struct InspectArgs {
    /// Directory holding the stored tables
    #[arg(long, short = 't', default_value = "tables")]
    pub tables: PathBuf,

    /// Player mark whose tables to read (`first` or `second`)
    #[arg(long, short = 'p', default_value = "first")]
    pub player: Player,

    /// Board as 9 cells (`X`, `O`, `.`), row by row
    #[arg(long, short = 'b', default_value = ".........")]
    pub board: BoardState,

    /// Export the player's stored tables to a JSON file
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// JSON export of the tables stored for one player
#[derive(Debug, Serialize)]
pub struct ExportedTables {
    pub player: Player,
    pub values: Option<SavedValueTable>,
    pub policy: Option<SavedPolicyTable>,
}

/// Treat a missing table as absent rather than as a failure.
fn optional<T>(result: crate::Result<T>) -> crate::Result<Option<T>> {
    match result {
        Ok(table) => Ok(Some(table)),
        Err(Error::MissingTable { .. }) => Ok(None),
        Err(err) => Err(err),
    }
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let repo = MsgPackRepository::new(&args.tables);
    let player = args.player;
    let board = args.board;

    let saved_values = optional(repo.load_values(player))
        .with_context(|| format!("Loading value table for {player} player"))?;
    let saved_policy = optional(repo.load_policy(player))
        .with_context(|| format!("Loading policy table for {player} player"))?;

    print_section(&format!("Board {} ({player} player tables)", board.encode()));
    print_board(&board);
    println!();
    print_kv("Status", &format!("{:?}", board.status()));
    print_kv("Turn", board.turn().as_str());
    print_kv("Step", &board.step().to_string());

    match &saved_values {
        Some(saved) => {
            let values = saved.to_table()?;
            let value = values
                .get(&board)
                .map_or_else(|| "infeasible board".to_string(), |v| format!("{v:.6}"));
            print_kv("Value", &value);

            let env = Environment::with_seed(player, 0);
            let observation = Observation::at(&env, &board);
            if !observation.candidates.is_empty() {
                print_subsection("Successor values");
                for (action, next) in &observation.candidates {
                    let next_value = values.get(next).unwrap_or_default();
                    print_kv(action.name(), &format!("{next_value:.6}"));
                }
            }
        }
        None => print_kv("Value", "no value table stored"),
    }

    match &saved_policy {
        Some(saved) => {
            let policy = saved.to_table()?;
            match policy.get(&board) {
                Some(dist) => {
                    print_subsection("Policy");
                    for &(action, prob) in dist.entries() {
                        print_kv(action.name(), &format!("{prob:.3}"));
                    }
                }
                None => print_kv("Policy", "no entry (board is decided or infeasible)"),
            }
        }
        None => print_kv("Policy", "no policy table stored"),
    }

    if let Some(path) = &args.export {
        let exported = ExportedTables {
            player,
            values: saved_values,
            policy: saved_policy,
        };
        let file = File::create(path)
            .with_context(|| format!("Failed to create file: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &exported)
            .context("Failed to write JSON export")?;
        writer
            .flush()
            .with_context(|| format!("Failed to flush file: {}", path.display()))?;
        println!("\nExported tables to {}", path.display());
    }

    Ok(())
}
