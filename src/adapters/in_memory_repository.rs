//! In-memory table repository for testing.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use serde::{Serialize, de::DeserializeOwned};

use super::TableKind;
use crate::{
    Result,
    error::Error,
    planner::{SavedPolicyTable, SavedValueTable},
    ports::TableRepository,
    tictactoe::Player,
};

/// In-memory repository for testing.
///
/// Stores the MessagePack bytes of each table in a shared map, so encoding is
/// exercised without touching the file system. All clones share the same
/// storage.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tables
    pub fn count(&self) -> usize {
        self.storage().len()
    }

    pub fn clear(&self) {
        self.storage().clear();
    }

    pub fn contains(&self, kind: TableKind, player: Player) -> bool {
        self.storage().contains_key(&kind.key(player))
    }

    fn storage(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn write<T: Serialize>(&self, kind: TableKind, player: Player, table: &T) -> Result<()> {
        let bytes = rmp_serde::to_vec(table).map_err(|e| Error::SerializationContext {
            operation: format!("serialize {kind} table for in-memory storage"),
            message: e.to_string(),
        })?;

        self.storage().insert(kind.key(player), bytes);
        Ok(())
    }

    fn read<T: DeserializeOwned>(&self, kind: TableKind, player: Player) -> Result<T> {
        let storage = self.storage();
        let bytes = storage
            .get(&kind.key(player))
            .ok_or_else(|| Error::MissingTable {
                kind: kind.to_string(),
                player: player.to_string(),
            })?;

        rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
            operation: format!("deserialize {kind} table from in-memory storage"),
            message: e.to_string(),
        })
    }
}

impl TableRepository for InMemoryRepository {
    fn save_values(&self, table: &SavedValueTable) -> Result<()> {
        self.write(TableKind::Values, table.player, table)
    }

    fn load_values(&self, player: Player) -> Result<SavedValueTable> {
        self.read(TableKind::Values, player)
    }

    fn save_policy(&self, table: &SavedPolicyTable) -> Result<()> {
        self.write(TableKind::Policy, table.player, table)
    }

    fn load_policy(&self, player: Player) -> Result<SavedPolicyTable> {
        self.read(TableKind::Policy, player)
    }
}
