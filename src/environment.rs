//! The game environment: state universe, transition and reward model.
//!
//! The environment is built around a *player mark*, the side whose reward is
//! being maximized. Its pure operations (`actions_available_at`,
//! `make_move`, `reward_func`, `transit_func`) are all the solvers use; the
//! mutable `step`/`reset` pair exists for match play.

use std::sync::Arc;

use rand::{SeedableRng, random, rngs::StdRng};

use crate::{
    Error, Result,
    tictactoe::{Action, BoardState, Player, StateSpace, Status},
    utils::weighted_sample,
};

/// Next-state distribution of one (state, action, mark) triple
pub type TransitionProbs = Vec<(BoardState, f64)>;

/// Result of sampling one transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    pub next_state: BoardState,
    pub reward: f64,
    pub done: bool,
}

/// Tic-Tac-Toe environment seen from one player's side
#[derive(Debug, Clone)]
pub struct Environment {
    player: Player,
    state: BoardState,
    space: Arc<StateSpace>,
    rng: StdRng,
}

impl Environment {
    /// Create an environment rewarding `player`, starting from the empty board.
    pub fn new(player: Player) -> Self {
        Self::with_seed(player, random())
    }

    /// Create an environment whose transition sampling is reproducible.
    pub fn with_seed(player: Player, seed: u64) -> Self {
        Self {
            player,
            state: BoardState::empty(),
            space: StateSpace::shared(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The side whose reward is maximized
    pub fn player(&self) -> Player {
        self.player
    }

    /// Current board of the environment's own game
    pub fn state(&self) -> &BoardState {
        &self.state
    }

    /// Every action, legal or not
    pub fn actions(&self) -> [Action; 9] {
        Action::ALL
    }

    /// Every feasible board. Enumerated once per process and shared.
    pub fn states(&self) -> &[BoardState] {
        self.space.states()
    }

    pub fn state_space(&self) -> &Arc<StateSpace> {
        &self.space
    }

    /// Empty cells of an undecided board; nothing once the game is decided.
    pub fn actions_available_at(&self, state: &BoardState) -> Vec<Action> {
        if state.status() == Status::Undecided {
            state.empty_cells()
        } else {
            Vec::new()
        }
    }

    /// Write `mark`'s mark at `action`. The input board is untouched and the
    /// target cell is not checked; callers pick actions from
    /// [`Environment::actions_available_at`].
    pub fn make_move(&self, state: &BoardState, action: Action, mark: Player) -> BoardState {
        state.with_mark(action, mark.mark())
    }

    /// Reward and done flag of a board from the player's perspective.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InfeasibleState`] for an infeasible board; such a board
    /// means the state universe or transition model is corrupt.
    pub fn reward_func(&self, state: &BoardState) -> Result<(f64, bool)> {
        match state.status() {
            Status::Undecided => Ok((0.0, false)),
            Status::Draw => Ok((0.0, true)),
            Status::Infeasible => Err(Error::InfeasibleState {
                board: state.encode(),
            }),
            won if won.is_win_for(self.player) => Ok((1.0, true)),
            _ => Ok((-1.0, true)),
        }
    }

    /// Distribution over next boards. The game is deterministic, so this is a
    /// single board with probability 1.
    pub fn transit_func(&self, state: &BoardState, action: Action, mark: Player) -> TransitionProbs {
        vec![(self.make_move(state, action, mark), 1.0)]
    }

    /// Sample a transition and score the resulting board.
    pub fn transit(&mut self, state: &BoardState, action: Action, mark: Player) -> Result<StepResult> {
        let probs = self.transit_func(state, action, mark);
        let next_state =
            weighted_sample(&mut self.rng, &probs).ok_or_else(|| Error::NoActionsAvailable {
                state: state.encode(),
            })?;
        let (reward, done) = self.reward_func(&next_state)?;

        Ok(StepResult {
            next_state,
            reward,
            done,
        })
    }

    /// Advance the environment's own board by one move.
    pub fn step(&mut self, action: Action, mark: Player) -> Result<StepResult> {
        let current = self.state;
        let result = self.transit(&current, action, mark)?;
        self.state = result.next_state;
        Ok(result)
    }

    /// Return the environment's board to the empty grid.
    pub fn reset(&mut self) -> BoardState {
        self.state.reset();
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn states_exclude_infeasible_boards() {
        let env = Environment::with_seed(Player::First, 1);
        assert_eq!(env.states().len(), 5890);
        assert!(
            env.states()
                .iter()
                .all(|s| s.status() != Status::Infeasible)
        );
    }

    #[test]
    fn no_actions_once_decided() {
        let env = Environment::with_seed(Player::First, 1);
        let won: BoardState = "XXXOO....".parse().unwrap();
        assert!(env.actions_available_at(&won).is_empty());

        let open: BoardState = "XO.......".parse().unwrap();
        assert_eq!(env.actions_available_at(&open).len(), 7);
    }

    #[test]
    fn reward_depends_on_player_mark() {
        let won: BoardState = "XXXOO....".parse().unwrap();
        let first = Environment::with_seed(Player::First, 1);
        let second = Environment::with_seed(Player::Second, 1);
        assert_eq!(first.reward_func(&won).unwrap(), (1.0, true));
        assert_eq!(second.reward_func(&won).unwrap(), (-1.0, true));
        assert_eq!(
            first.reward_func(&BoardState::empty()).unwrap(),
            (0.0, false)
        );
    }

    #[test]
    fn reward_on_infeasible_board_is_an_error() {
        let env = Environment::with_seed(Player::First, 1);
        let infeasible: BoardState = "XXXOOO...".parse().unwrap();
        assert!(matches!(
            env.reward_func(&infeasible),
            Err(Error::InfeasibleState { .. })
        ));
    }

    #[test]
    fn transit_func_is_deterministic() {
        let env = Environment::with_seed(Player::First, 1);
        let probs = env.transit_func(&BoardState::empty(), Action::Center, Player::First);
        assert_eq!(probs.len(), 1);
        assert_eq!(probs[0].1, 1.0);
        assert_eq!(probs[0].0.get(Action::Center), crate::tictactoe::Mark::First);
    }

    #[test]
    fn step_and_reset_drive_the_current_state() {
        let mut env = Environment::with_seed(Player::First, 1);
        let result = env.step(Action::Center, Player::First).unwrap();
        assert_eq!(env.state(), &result.next_state);
        assert!(!result.done);
        assert_eq!(env.state().turn(), Player::Second);

        let reset = env.reset();
        assert_eq!(reset, BoardState::empty());
        assert_eq!(env.state(), &BoardState::empty());
    }
}
