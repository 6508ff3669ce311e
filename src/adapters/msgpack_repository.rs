//! MessagePack implementation of the table repository.
//!
//! This adapter implements the TableRepository port using rmp_serde, one file
//! per table under a root directory.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, ErrorKind, Write},
    path::{Path, PathBuf},
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

/// MessagePack-based table repository.
///
/// # Examples
///
/// ```no_run
/// use ttt_planner::{
///     adapters::MsgPackRepository,
///     config::PlannerConfig,
///     environment::Environment,
///     planner::{SavedValueTable, ValueIterationPlanner},
///     ports::TableRepository,
///     tictactoe::Player,
/// };
///
/// let repo = MsgPackRepository::new("tables");
/// let mut planner = ValueIterationPlanner::new(Environment::new(Player::First));
/// let values = planner.plan()?;
///
/// repo.save_values(&SavedValueTable::from_table(&values, &PlannerConfig::default()))?;
/// let loaded = repo.load_values(Player::First)?;
/// # Ok::<(), ttt_planner::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct MsgPackRepository {
    root: PathBuf,
}

impl MsgPackRepository {
    /// Create a repository storing its files under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File holding the table of `kind` for `player`
    pub fn path_for(&self, kind: TableKind, player: Player) -> PathBuf {
        self.root.join(format!("{}.msgpack", kind.key(player)))
    }

    fn write<T: Serialize>(&self, kind: TableKind, player: Player, table: &T) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|source| Error::Io {
            operation: format!("create directory {:?}", self.root),
            source,
        })?;

        let path = self.path_for(kind, player);
        let file = File::create(&path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, table).map_err(|e| {
            Error::SerializationContext {
                operation: format!("serialize {kind} table to MessagePack"),
                message: e.to_string(),
            }
        })?;
        writer.flush().map_err(|source| Error::Io {
            operation: format!("flush file {path:?}"),
            source,
        })?;

        tracing::debug!(path = %path.display(), "saved {kind} table");
        Ok(())
    }

    fn read<T: DeserializeOwned>(&self, kind: TableKind, player: Player) -> Result<T> {
        let path = self.path_for(kind, player);
        let file = File::open(&path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => Error::MissingTable {
                kind: kind.to_string(),
                player: player.to_string(),
            },
            _ => Error::Io {
                operation: format!("open file {path:?}"),
                source,
            },
        })?;

        rmp_serde::decode::from_read(BufReader::new(file)).map_err(|e| {
            Error::SerializationContext {
                operation: format!("deserialize {kind} table from MessagePack"),
                message: e.to_string(),
            }
        })
    }
}

impl TableRepository for MsgPackRepository {
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

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::{
        config::PlannerConfig,
        environment::Environment,
        planner::{PolicyTable, ValueTable},
        tictactoe::{BoardState, StateSpace},
    };

    #[test]
    fn test_values_roundtrip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = MsgPackRepository::new(temp_dir.path());

        let table = ValueTable::terminal_values(StateSpace::shared(), Player::Second);
        let saved = SavedValueTable::from_table(&table, &PlannerConfig::default());
        repo.save_values(&saved).expect("Failed to save");

        assert!(temp_dir.path().join("values_second.msgpack").exists());
        let loaded = repo.load_values(Player::Second).expect("Failed to load");
        assert_eq!(loaded, saved);
    }

    #[test]
    fn test_policy_roundtrip_in_nested_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = MsgPackRepository::new(temp_dir.path().join("nested").join("tables"));

        let policy = PolicyTable::uniform(&Environment::with_seed(Player::First, 0));
        let saved = SavedPolicyTable::from_table(&policy, &PlannerConfig::default());
        repo.save_policy(&saved).expect("Failed to save");

        let restored = repo.policy_table(Player::First).expect("Failed to load");
        assert_eq!(
            restored.get(&BoardState::empty()),
            policy.get(&BoardState::empty())
        );
    }

    #[test]
    fn test_missing_table_is_reported() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = MsgPackRepository::new(temp_dir.path());
        assert!(matches!(
            repo.load_policy(Player::First),
            Err(Error::MissingTable { .. })
        ));
    }

    #[test]
    fn test_corrupt_file_returns_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = MsgPackRepository::new(temp_dir.path());
        fs::write(repo.path_for(TableKind::Values, Player::First), b"not msgpack").unwrap();
        assert!(matches!(
            repo.load_values(Player::First),
            Err(Error::SerializationContext { .. })
        ));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_save_reports_unwritable_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let repo = MsgPackRepository::new(temp_dir.path());
        std::os::unix::fs::symlink(
            "/dev/full",
            repo.path_for(TableKind::Values, Player::First),
        )
        .expect("Failed to link");

        let table = ValueTable::terminal_values(StateSpace::shared(), Player::First);
        let saved = SavedValueTable::from_table(&table, &PlannerConfig::default());
        assert!(repo.save_values(&saved).is_err());
    }
}
