//! Tic-Tac-Toe game model: marks, boards, actions and the feasible state space

pub mod action;
pub mod board;
pub mod lines;
pub mod space;
pub mod validation;

pub use action::Action;
pub use board::{BoardState, Mark, Player, RAW_BOARD_COUNT};
pub use lines::{LineAnalyzer, LineCounts, WINNING_LINES};
pub use space::{RawBoards, StateSpace};
pub use validation::Status;
