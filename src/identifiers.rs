//! Dense identifiers for boards in the enumerated state space.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Index of a feasible board in a [`StateSpace`](crate::tictactoe::StateSpace).
///
/// Ids are dense (`0..space.len()`) and follow enumeration order, so tables
/// keyed by state are plain vectors indexed by `StateId`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StateId(u32);

impl StateId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Position in the arena
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<StateId> for usize {
    fn from(id: StateId) -> Self {
        id.index()
    }
}
