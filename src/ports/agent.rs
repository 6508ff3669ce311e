//! Agent port - move selection during a match

use crate::{
    Result,
    environment::Environment,
    tictactoe::{Action, BoardState, Player},
};

/// What an agent sees before choosing a move
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub state: BoardState,
    /// Side to move
    pub mover: Player,
    /// Legal actions with the board each one leads to, in action order
    pub candidates: Vec<(Action, BoardState)>,
}

impl Observation {
    /// Snapshot the environment's current board.
    pub fn observe(env: &Environment) -> Self {
        Self::at(env, env.state())
    }

    /// Snapshot an arbitrary board using the environment's move model.
    pub fn at(env: &Environment, state: &BoardState) -> Self {
        let mover = state.turn();
        let candidates = env
            .actions_available_at(state)
            .into_iter()
            .map(|action| (action, env.make_move(state, action, mover)))
            .collect();

        Self {
            state: *state,
            mover,
            candidates,
        }
    }

    pub fn legal_actions(&self) -> impl Iterator<Item = Action> + '_ {
        self.candidates.iter().map(|&(action, _)| action)
    }

    pub fn is_legal(&self, action: Action) -> bool {
        self.legal_actions().any(|a| a == action)
    }
}

/// Agent trait - anything that picks a move for the side to play
///
/// # Examples
///
/// ```no_run
/// use ttt_planner::{
///     Error,
///     ports::{Agent, Observation},
///     tictactoe::Action,
/// };
///
/// struct FirstLegal;
///
/// impl Agent for FirstLegal {
///     fn name(&self) -> &str {
///         "first-legal"
///     }
///
///     fn select_action(&mut self, observation: &Observation) -> ttt_planner::Result<Action> {
///         observation
///             .legal_actions()
///             .next()
///             .ok_or_else(|| Error::NoActionsAvailable {
///                 state: observation.state.encode(),
///             })
///     }
/// }
/// ```
pub trait Agent {
    /// Short label used in match output
    fn name(&self) -> &str;

    /// Choose one of the observation's legal actions.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NoActionsAvailable`] on a decided board.
    fn select_action(&mut self, observation: &Observation) -> Result<Action>;
}
