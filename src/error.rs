//! Error types for the planner crate

use thiserror::Error;

/// Main error type for the planner crate
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("wrong board length: expected {expected} cells, got {got} in '{context}'")]
    InvalidBoardLength {
        expected: usize,
        got: usize,
        context: String,
    },

    #[error("invalid character '{character}' at position {position} in '{context}'")]
    InvalidCellCharacter {
        character: char,
        position: usize,
        context: String,
    },

    #[error("invalid mark value {value} (expected 0, 1 or -1)")]
    InvalidMark { value: i8 },

    #[error("unknown action '{name}' (expected one of TL, TC, TR, CL, C, CR, BL, BC, BR)")]
    UnknownAction { name: String },

    #[error("unknown player '{name}' (expected 'first' or 'second')")]
    UnknownPlayer { name: String },

    #[error("reward requested for infeasible board {board}")]
    InfeasibleState { board: String },

    #[error("board {board} is not part of the feasible state space")]
    UnknownState { board: String },

    #[error("no actions available at board '{state}'")]
    NoActionsAvailable { state: String },

    #[error("action {action} is not legal at board '{state}'")]
    IllegalAction { action: String, state: String },

    #[error("{phase} did not converge after {iterations} iterations (last delta {delta})")]
    NotConverged {
        phase: String,
        iterations: usize,
        delta: f64,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("unsupported table format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("no stored {kind} table for the {player} player")]
    MissingTable { kind: String, player: String },

    #[error("input closed before a move was entered")]
    InputClosed,

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to {operation}: {message}")]
    SerializationContext { operation: String, message: String },
}

/// Convenience type alias for Results using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Error::Io {
            operation: "IO operation".to_string(),
            source,
        }
    }
}
