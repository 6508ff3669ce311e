//! Adapters implementing domain ports.
//!
//! Both repositories name a stored table by its kind and player mark, e.g.
//! `values_first` or `policy_second`.

pub mod in_memory_repository;
pub mod msgpack_repository;

use std::fmt;

pub use in_memory_repository::InMemoryRepository;
pub use msgpack_repository::MsgPackRepository;

use crate::tictactoe::Player;

/// Kind of stored table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    Values,
    Policy,
}

impl TableKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TableKind::Values => "values",
            TableKind::Policy => "policy",
        }
    }

    /// Storage key of this kind of table for `player`
    pub fn key(self, player: Player) -> String {
        format!("{}_{}", self.as_str(), player.as_str())
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
