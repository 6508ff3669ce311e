//! Exact dynamic-programming solver for Tic-Tac-Toe
//!
//! This crate provides:
//! - The game model: boards with derived turn, step and status, and the
//!   enumerated space of feasible boards
//! - An environment exposing moves, transitions and player-relative rewards
//! - Value iteration and policy iteration under the minimax assumption
//! - Persistence of the solved tables, agents that play from them, and a
//!   two-agent match loop

pub mod adapters;
pub mod agents;
pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod identifiers;
pub mod pipeline;
pub mod planner;
pub mod ports;
pub mod tictactoe;
pub mod utils;

pub use config::PlannerConfig;
pub use environment::Environment;
pub use error::{Error, Result};
pub use planner::{
    PolicyIterationPlanner, PolicyTable, ValueIterationPlanner, ValueTable,
};
