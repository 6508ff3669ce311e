//! Value iteration with minimax Bellman backups.

use std::sync::Arc;

use tracing::info;

use super::{Phase, Planner, SweepRecord, ValueTable, check_iteration_cap, select_extreme};
use crate::{
    Error, Result, config::PlannerConfig, environment::Environment, tictactoe::Status,
};

/// Solves the state values of the environment's player.
///
/// Sweeps update the table in place in state-space order, so a backup sees
/// the values already written earlier in the same sweep.
#[derive(Debug, Clone)]
pub struct ValueIterationPlanner {
    planner: Planner,
    config: PlannerConfig,
}

impl ValueIterationPlanner {
    pub fn new(env: Environment) -> Self {
        Self::with_config(env, PlannerConfig::default())
    }

    pub fn with_config(env: Environment, config: PlannerConfig) -> Self {
        Self {
            planner: Planner::new(env),
            config,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    pub fn log(&self) -> &[SweepRecord] {
        self.planner.log()
    }

    /// Iterate until the largest change in a sweep drops below the threshold.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for a bad configuration,
    /// [`Error::NotConverged`] when the sweep cap is reached, and propagates
    /// transition model faults.
    pub fn plan(&mut self) -> Result<ValueTable> {
        self.config.validate()?;
        self.planner.initialize();

        let player = self.planner.player();
        let mut values = self.planner.initial_values();
        info!(
            %player,
            gamma = self.config.gamma,
            threshold = self.config.threshold,
            states = values.len(),
            "starting value iteration"
        );

        let mut iteration = 0;
        loop {
            let delta = self.sweep(&mut values)?;
            iteration += 1;
            self.planner.record(Phase::ValueIteration, iteration, delta);

            if delta < self.config.threshold {
                info!(%player, iterations = iteration, delta, "value iteration converged");
                return Ok(values);
            }
            check_iteration_cap(&self.config, Phase::ValueIteration, iteration, delta)?;
        }
    }

    /// One in-place pass over the undecided boards; returns the largest change.
    pub fn sweep(&self, values: &mut ValueTable) -> Result<f64> {
        let space = Arc::clone(values.space());
        let gamma = self.config.gamma;
        let mut delta: f64 = 0.0;

        for (id, state) in space.iter() {
            if state.status() != Status::Undecided {
                continue;
            }

            let action_values = self.planner.action_values(state, values, gamma)?;
            let (_, best) = select_extreme(&action_values, self.planner.maximizes_at(state))
                .ok_or_else(|| Error::NoActionsAvailable {
                    state: state.encode(),
                })?;

            delta = delta.max((best - values.value(id)).abs());
            values.set(id, best);
        }

        Ok(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::{BoardState, Player};

    #[test]
    fn converges_to_draw_value_from_empty_board() {
        let mut planner = ValueIterationPlanner::new(Environment::with_seed(Player::First, 0));
        let values = planner.plan().unwrap();

        assert_eq!(values.get(&BoardState::empty()), Some(0.0));
        assert_eq!(planner.log().len(), 4);
        assert!(planner.log().last().unwrap().delta < PlannerConfig::DEFAULT_THRESHOLD);
    }

    #[test]
    fn terminal_values_stay_fixed() {
        let mut planner = ValueIterationPlanner::new(Environment::with_seed(Player::Second, 0));
        let values = planner.plan().unwrap();

        let first_won: BoardState = "XXXOO....".parse().unwrap();
        let second_won: BoardState = "XX.OOOX..".parse().unwrap();
        let draw: BoardState = "XOXXOOOXX".parse().unwrap();
        assert_eq!(values.get(&first_won), Some(-1.0));
        assert_eq!(values.get(&second_won), Some(1.0));
        assert_eq!(values.get(&draw), Some(0.0));
    }

    #[test]
    fn immediate_win_is_worth_the_reward_plus_discounted_terminal() {
        let mut planner = ValueIterationPlanner::new(Environment::with_seed(Player::First, 0));
        let values = planner.plan().unwrap();

        // X to move completes the top row: 1 + 0.9 * 1
        let state: BoardState = "XX.OO....".parse().unwrap();
        let value = values.get(&state).unwrap();
        assert!((value - 1.9).abs() < 1e-9);
    }

    #[test]
    fn cap_surfaces_non_convergence() {
        let config = PlannerConfig::new().with_max_iterations(2);
        let mut planner =
            ValueIterationPlanner::with_config(Environment::with_seed(Player::First, 0), config);

        let err = planner.plan().unwrap_err();
        assert!(matches!(err, Error::NotConverged { iterations: 2, .. }));
        assert_eq!(planner.log().len(), 2);
    }

    #[test]
    fn invalid_config_is_rejected_before_sweeping() {
        let config = PlannerConfig::new().with_gamma(1.0);
        let mut planner =
            ValueIterationPlanner::with_config(Environment::with_seed(Player::First, 0), config);
        assert!(matches!(
            planner.plan(),
            Err(Error::InvalidConfiguration { .. })
        ));
        assert!(planner.log().is_empty());
    }
}
