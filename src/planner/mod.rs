//! Exact dynamic-programming solvers over the enumerated state space
//!
//! Both solvers share the [`Planner`] base: it owns the [`Environment`],
//! turns its transition and reward functions into lazy [`Transition`]
//! sequences, and keeps a per-sweep log.
//!
//! ## Solvers
//!
//! - [`ValueIterationPlanner`]: minimax Bellman backups until the largest
//!   change in a sweep drops below the threshold
//! - [`PolicyIterationPlanner`]: alternating policy evaluation and greedy
//!   improvement until no greedy action changes
//!
//! In both, the environment's player maximizes on its own turns and the
//! opponent is assumed to minimize on the others.
//!
//! ## Usage Example
//!
//! ```no_run
//! use ttt_planner::{
//!     environment::Environment,
//!     planner::ValueIterationPlanner,
//!     tictactoe::{BoardState, Player},
//! };
//!
//! let env = Environment::new(Player::First);
//! let mut planner = ValueIterationPlanner::new(env);
//! let values = planner.plan().unwrap();
//! assert_eq!(values.get(&BoardState::empty()), Some(0.0));
//! ```

pub mod policy_iteration;
pub mod serialization;
pub mod tables;
pub mod value_iteration;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use policy_iteration::PolicyIterationPlanner;
pub use serialization::{SavedPolicyTable, SavedValueTable};
pub use tables::{ActionDistribution, PolicyTable, ValueTable};
pub use value_iteration::ValueIterationPlanner;

use crate::{
    Error, Result,
    config::PlannerConfig,
    environment::Environment,
    tictactoe::{Action, BoardState, Player},
};

/// One weighted outcome of a move, scored for the environment's player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub probability: f64,
    pub next_state: BoardState,
    pub reward: f64,
}

/// Fixed-point loop a log record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    ValueIteration,
    PolicyEvaluation { round: usize },
    PolicyImprovement,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::ValueIteration => write!(f, "value iteration"),
            Phase::PolicyEvaluation { round } => write!(f, "policy evaluation (round {round})"),
            Phase::PolicyImprovement => write!(f, "policy improvement"),
        }
    }
}

/// One sweep of a fixed-point loop.
///
/// For improvement records `delta` is the number of boards whose greedy
/// action changed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepRecord {
    pub phase: Phase,
    pub iteration: usize,
    pub delta: f64,
}

/// Shared base of the solvers
#[derive(Debug, Clone)]
pub struct Planner {
    env: Environment,
    log: Vec<SweepRecord>,
}

impl Planner {
    pub fn new(env: Environment) -> Self {
        Self {
            env,
            log: Vec::new(),
        }
    }

    /// Reset the environment and clear the iteration log.
    pub fn initialize(&mut self) {
        self.env.reset();
        self.log.clear();
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn player(&self) -> Player {
        self.env.player()
    }

    pub fn log(&self) -> &[SweepRecord] {
        &self.log
    }

    /// Outcomes of playing `action` with `mark` at `state`.
    ///
    /// Each call builds a fresh iterator with one item per entry of
    /// [`Environment::transit_func`]. An item is an error if its next board
    /// cannot be scored.
    pub fn transitions_at(
        &self,
        state: &BoardState,
        action: Action,
        mark: Player,
    ) -> impl Iterator<Item = Result<Transition>> + '_ {
        self.env
            .transit_func(state, action, mark)
            .into_iter()
            .map(move |(next_state, probability)| {
                let (reward, _) = self.env.reward_func(&next_state)?;
                Ok(Transition {
                    probability,
                    next_state,
                    reward,
                })
            })
    }

    /// Terminal values for the environment's player
    pub fn initial_values(&self) -> ValueTable {
        ValueTable::terminal_values(self.env.state_space().clone(), self.env.player())
    }

    /// Expected backed-up value of `action` at `state`, with the mover's mark:
    /// `Σ p · (r + γ · V(next))`.
    ///
    /// # Errors
    ///
    /// Fails if a successor is infeasible or missing from `values`.
    pub fn backup(
        &self,
        state: &BoardState,
        action: Action,
        values: &ValueTable,
        gamma: f64,
    ) -> Result<f64> {
        let mut expected = 0.0;
        for transition in self.transitions_at(state, action, state.turn()) {
            let transition = transition?;
            let next_value =
                values
                    .get(&transition.next_state)
                    .ok_or_else(|| Error::UnknownState {
                        board: transition.next_state.encode(),
                    })?;
            expected += transition.probability * (transition.reward + gamma * next_value);
        }
        Ok(expected)
    }

    /// Backed-up value of every legal action at `state`, in action order.
    pub fn action_values(
        &self,
        state: &BoardState,
        values: &ValueTable,
        gamma: f64,
    ) -> Result<Vec<(Action, f64)>> {
        let actions = self.env.actions_available_at(state);
        if actions.is_empty() {
            return Err(Error::NoActionsAvailable {
                state: state.encode(),
            });
        }

        actions
            .into_iter()
            .map(|action| Ok((action, self.backup(state, action, values, gamma)?)))
            .collect()
    }

    /// Whether the environment's player moves at `state`
    pub fn maximizes_at(&self, state: &BoardState) -> bool {
        state.turn() == self.env.player()
    }

    pub(crate) fn record(&mut self, phase: Phase, iteration: usize, delta: f64) {
        tracing::debug!(%phase, iteration, delta, "sweep finished");
        self.log.push(SweepRecord {
            phase,
            iteration,
            delta,
        });
    }
}

/// First action with the largest value when `maximize`, else the first with
/// the smallest.
pub fn select_extreme(action_values: &[(Action, f64)], maximize: bool) -> Option<(Action, f64)> {
    let mut best: Option<(Action, f64)> = None;
    for &(action, value) in action_values {
        let better = match best {
            None => true,
            Some((_, current)) if maximize => value > current,
            Some((_, current)) => value < current,
        };
        if better {
            best = Some((action, value));
        }
    }
    best
}

/// Fail with [`Error::NotConverged`] once `iteration` reaches the configured cap.
pub(crate) fn check_iteration_cap(
    config: &PlannerConfig,
    phase: Phase,
    iteration: usize,
    delta: f64,
) -> Result<()> {
    match config.max_iterations {
        Some(max) if iteration >= max => {
            tracing::warn!(
                %phase,
                iterations = iteration,
                delta,
                threshold = config.threshold,
                "iteration cap reached before convergence; gamma may be too close to 1 or the threshold too tight"
            );
            Err(Error::NotConverged {
                phase: phase.to_string(),
                iterations: iteration,
                delta,
            })
        }
        _ => Ok(()),
    }
}
