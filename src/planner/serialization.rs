//! Versioned snapshots of solved tables.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{ActionDistribution, PolicyTable, ValueTable};
use crate::{
    Error, Result,
    config::PlannerConfig,
    tictactoe::{BoardState, Player, StateSpace},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedValueTable {
    pub version: u32,
    pub player: Player,
    pub gamma: f64,
    pub threshold: f64,
    entries: Vec<(BoardState, f64)>,
}

impl SavedValueTable {
    pub const VERSION: u32 = 1;

    pub fn from_table(table: &ValueTable, config: &PlannerConfig) -> Self {
        Self {
            version: Self::VERSION,
            player: table.player(),
            gamma: config.gamma,
            threshold: config.threshold,
            entries: table.iter().map(|(state, value)| (*state, value)).collect(),
        }
    }

    pub fn entries(&self) -> &[(BoardState, f64)] {
        &self.entries
    }

    /// Rebuild the table over the shared state space.
    ///
    /// Boards missing from the snapshot keep their terminal value.
    pub fn to_table(&self) -> Result<ValueTable> {
        check_version(self.version)?;

        let space = StateSpace::shared();
        let mut table = ValueTable::terminal_values(Arc::clone(&space), self.player);
        for (state, value) in &self.entries {
            let id = space.id_of(state).ok_or_else(|| Error::UnknownState {
                board: state.encode(),
            })?;
            table.set(id, *value);
        }
        Ok(table)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedPolicyTable {
    pub version: u32,
    pub player: Player,
    pub gamma: f64,
    pub threshold: f64,
    entries: Vec<(BoardState, ActionDistribution)>,
}

impl SavedPolicyTable {
    pub const VERSION: u32 = 1;

    pub fn from_table(table: &PolicyTable, config: &PlannerConfig) -> Self {
        Self {
            version: Self::VERSION,
            player: table.player(),
            gamma: config.gamma,
            threshold: config.threshold,
            entries: table
                .iter()
                .map(|(state, dist)| (*state, dist.clone()))
                .collect(),
        }
    }

    pub fn entries(&self) -> &[(BoardState, ActionDistribution)] {
        &self.entries
    }

    pub fn to_table(&self) -> Result<PolicyTable> {
        check_version(self.version)?;

        let space = StateSpace::shared();
        let mut table = PolicyTable::empty(Arc::clone(&space), self.player);
        for (state, dist) in &self.entries {
            let id = space.id_of(state).ok_or_else(|| Error::UnknownState {
                board: state.encode(),
            })?;
            table.set(id, dist.clone());
        }
        Ok(table)
    }
}

fn check_version(found: u32) -> Result<()> {
    if found != SavedValueTable::VERSION {
        return Err(Error::UnsupportedVersion {
            found,
            expected: SavedValueTable::VERSION,
        });
    }
    Ok(())
}
