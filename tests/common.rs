//! Shared helpers for the integration tests.

#![allow(dead_code)]

use ttt_planner::{
    environment::Environment,
    planner::{PolicyIterationPlanner, PolicyTable, ValueIterationPlanner, ValueTable},
    tictactoe::{BoardState, Player},
};

/// Parse a board written as 9 cells (`X`, `O`, `.`).
pub fn board(cells: &str) -> BoardState {
    cells.parse().expect("valid board string")
}

pub fn env(player: Player) -> Environment {
    Environment::with_seed(player, 42)
}

/// Solve with value iteration at the default configuration.
pub fn solve_values(player: Player) -> (ValueIterationPlanner, ValueTable) {
    let mut planner = ValueIterationPlanner::new(env(player));
    let values = planner.plan().expect("value iteration converges");
    (planner, values)
}

/// Solve with policy iteration at the default configuration.
pub fn solve_policy(player: Player) -> (PolicyIterationPlanner, PolicyTable) {
    let mut planner = PolicyIterationPlanner::new(env(player));
    let policy = planner.plan().expect("policy iteration converges");
    (planner, policy)
}
