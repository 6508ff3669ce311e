//! Repository port for solved table persistence.

use crate::{
    Result,
    planner::{PolicyTable, SavedPolicyTable, SavedValueTable, ValueTable},
    tictactoe::Player,
};

/// Port for persisting and loading solved tables.
///
/// A store holds at most one value table and one policy table per player
/// mark; saving replaces the previous table of the same kind and player.
///
/// # Examples
///
/// ```no_run
/// use ttt_planner::{
///     ports::TableRepository,
///     tictactoe::{BoardState, Player},
/// };
///
/// fn value_of_empty_board<R: TableRepository>(repo: &R) -> ttt_planner::Result<f64> {
///     let table = repo.load_values(Player::First)?.to_table()?;
///     Ok(table.get(&BoardState::empty()).unwrap_or_default())
/// }
/// ```
pub trait TableRepository {
    /// Save a value table under its player mark.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be serialized or written.
    fn save_values(&self, table: &SavedValueTable) -> Result<()>;

    /// Load the value table of `player`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::MissingTable`] if nothing was stored for
    /// `player`, or an error if the stored bytes cannot be decoded.
    fn load_values(&self, player: Player) -> Result<SavedValueTable>;

    /// Save a policy table under its player mark.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be serialized or written.
    fn save_policy(&self, table: &SavedPolicyTable) -> Result<()>;

    /// Load the policy table of `player`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::MissingTable`] if nothing was stored for
    /// `player`, or an error if the stored bytes cannot be decoded.
    fn load_policy(&self, player: Player) -> Result<SavedPolicyTable>;

    /// Load and rebuild the value table of `player`.
    fn value_table(&self, player: Player) -> Result<ValueTable> {
        self.load_values(player)?.to_table()
    }

    /// Load and rebuild the policy table of `player`.
    fn policy_table(&self, player: Player) -> Result<PolicyTable> {
        self.load_policy(player)?.to_table()
    }
}
