//! Plan command - Solve the game and store value and policy tables

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use super::PlayerChoice;
use crate::{
    adapters::MsgPackRepository,
    cli::output::{create_spinner, format_number, print_kv, print_section, print_subsection},
    config::PlannerConfig,
    environment::Environment,
    planner::{
        Phase, PolicyIterationPlanner, SavedPolicyTable, SavedValueTable, ValueIterationPlanner,
    },
    ports::TableRepository,
    tictactoe::{BoardState, Player, Status},
};

/// Solver(s) to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Method {
    Value,
    Policy,
    Both,
}

impl Method {
    fn runs_value_iteration(self) -> bool {
        matches!(self, Method::Value | Method::Both)
    }

    fn runs_policy_iteration(self) -> bool {
        matches!(self, Method::Policy | Method::Both)
    }
}

#[derive(Parser, Debug)]
#[command(about = "Solve the game and store the resulting tables")]
pub struct PlanArgs {
    /// Solver to run
    #[arg(long, short = 'm', value_enum, default_value_t = Method::Both)]
    pub method: Method,

    /// Player mark(s) to solve for
    #[arg(long, short = 'p', value_enum, default_value_t = PlayerChoice::Both)]
    pub player: PlayerChoice,

    /// Discount factor
    #[arg(long, default_value_t = PlannerConfig::DEFAULT_GAMMA)]
    pub gamma: f64,

    /// Convergence threshold on the largest per-sweep change
    #[arg(long, default_value_t = PlannerConfig::DEFAULT_THRESHOLD)]
    pub threshold: f64,

    /// Give up after this many sweeps per loop
    #[arg(long)]
    pub max_iterations: Option<usize>,

    /// Directory receiving the table files
    #[arg(long, short = 'o', default_value = "tables")]
    pub out: PathBuf,

    /// Random seed for the environment
    #[arg(long)]
    pub seed: Option<u64>,
}

impl PlanArgs {
    fn config(&self) -> PlannerConfig {
        PlannerConfig {
            gamma: self.gamma,
            threshold: self.threshold,
            max_iterations: self.max_iterations,
        }
    }
}

pub fn execute(args: PlanArgs) -> Result<()> {
    let config = args.config();
    config.validate().context("Invalid planner configuration")?;
    let repo = MsgPackRepository::new(&args.out);

    print_section("Planning");
    print_kv("Method", &format!("{:?}", args.method).to_lowercase());
    print_kv("Gamma", &config.gamma.to_string());
    print_kv("Threshold", &config.threshold.to_string());
    print_kv("Output", &args.out.display().to_string());

    for &player in args.player.players() {
        let env = match args.seed {
            Some(seed) => Environment::with_seed(player, seed),
            None => Environment::new(player),
        };

        let space = env.state_space();
        print_subsection(&format!("{player} player"));
        print_kv("Feasible states", &format_number(space.len()));
        print_kv(
            "Undecided states",
            &format_number(space.count_by_status(Status::Undecided)),
        );

        if args.method.runs_value_iteration() {
            solve_values(&repo, env.clone(), config, player)?;
        }
        if args.method.runs_policy_iteration() {
            solve_policy(&repo, env, config, player)?;
        }
    }

    println!("\nTables written to {}", args.out.display());
    Ok(())
}

fn solve_values(
    repo: &MsgPackRepository,
    env: Environment,
    config: PlannerConfig,
    player: Player,
) -> Result<()> {
    let spinner = create_spinner(&format!("Value iteration for the {player} player"));
    let mut planner = ValueIterationPlanner::with_config(env, config);
    let result = planner.plan();
    spinner.finish_and_clear();
    let values = result.with_context(|| format!("Value iteration failed for {player} player"))?;

    repo.save_values(&SavedValueTable::from_table(&values, &config))
        .with_context(|| format!("Failed to store value table for {player} player"))?;

    let last_delta = planner.log().last().map_or(0.0, |record| record.delta);
    print_kv("Value sweeps", &planner.log().len().to_string());
    print_kv("Final delta", &format!("{last_delta:.3e}"));
    print_kv(
        "V(empty board)",
        &format!("{:.6}", values.get(&BoardState::empty()).unwrap_or_default()),
    );
    Ok(())
}

fn solve_policy(
    repo: &MsgPackRepository,
    env: Environment,
    config: PlannerConfig,
    player: Player,
) -> Result<()> {
    let spinner = create_spinner(&format!("Policy iteration for the {player} player"));
    let mut planner = PolicyIterationPlanner::with_config(env, config);
    let result = planner.plan();
    spinner.finish_and_clear();
    let policy = result.with_context(|| format!("Policy iteration failed for {player} player"))?;

    repo.save_policy(&SavedPolicyTable::from_table(&policy, &config))
        .with_context(|| format!("Failed to store policy table for {player} player"))?;

    let rounds = planner
        .log()
        .iter()
        .filter(|record| record.phase == Phase::PolicyImprovement)
        .count();
    print_kv("Policy rounds", &rounds.to_string());
    print_kv(
        "Evaluation sweeps",
        &(planner.log().len() - rounds).to_string(),
    );
    if let Some(action) = policy
        .get(&BoardState::empty())
        .and_then(|dist| dist.argmax())
    {
        print_kv("Opening move", action.name());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn plan_writes_requested_tables() {
        let temp_dir = TempDir::new().unwrap();
        let args = PlanArgs {
            method: Method::Value,
            player: PlayerChoice::Second,
            gamma: 0.9,
            threshold: 1e-4,
            max_iterations: None,
            out: temp_dir.path().to_path_buf(),
            seed: Some(1),
        };

        execute(args).unwrap();
        assert!(temp_dir.path().join("values_second.msgpack").exists());
        assert!(!temp_dir.path().join("values_first.msgpack").exists());
        assert!(!temp_dir.path().join("policy_second.msgpack").exists());
    }

    #[test]
    fn plan_rejects_bad_gamma() {
        let temp_dir = TempDir::new().unwrap();
        let args = PlanArgs {
            method: Method::Both,
            player: PlayerChoice::Both,
            gamma: 1.5,
            threshold: 1e-4,
            max_iterations: None,
            out: temp_dir.path().to_path_buf(),
            seed: None,
        };
        assert!(execute(args).is_err());
    }
}
