//! Observer port - match events for display and recording

use crate::{
    Result,
    pipeline::MatchRecord,
    tictactoe::{Action, BoardState, Player},
};

/// Observer of a match played by [`crate::pipeline::MatchRunner`].
///
/// Events arrive in order: `on_match_start`, one `on_move` per move,
/// then `on_match_end`.
pub trait MatchObserver {
    /// Called once with the starting board.
    fn on_match_start(&mut self, _state: &BoardState) -> Result<()> {
        Ok(())
    }

    /// Called after each move with the board it produced.
    fn on_move(
        &mut self,
        _mover: Player,
        _agent: &str,
        _action: Action,
        _next_state: &BoardState,
    ) -> Result<()> {
        Ok(())
    }

    /// Called once after the game is decided.
    fn on_match_end(&mut self, _record: &MatchRecord) -> Result<()> {
        Ok(())
    }
}
