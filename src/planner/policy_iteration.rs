//! Policy iteration: evaluate the current policy, then make it greedy.

use std::sync::Arc;

use tracing::info;

use super::{
    Phase, Planner, PolicyTable, SweepRecord, ValueTable, check_iteration_cap, select_extreme,
};
use crate::{
    Error, Result, config::PlannerConfig, environment::Environment, tictactoe::Status,
};

/// Solves a policy for the environment's player.
///
/// Starts from the uniform policy over legal actions. Improvement picks the
/// first best action in action order, so a run is deterministic.
#[derive(Debug, Clone)]
pub struct PolicyIterationPlanner {
    planner: Planner,
    config: PlannerConfig,
    policy: PolicyTable,
    values: Option<ValueTable>,
}

impl PolicyIterationPlanner {
    pub fn new(env: Environment) -> Self {
        Self::with_config(env, PlannerConfig::default())
    }

    pub fn with_config(env: Environment, config: PlannerConfig) -> Self {
        let policy = PolicyTable::uniform(&env);
        Self {
            planner: Planner::new(env),
            config,
            policy,
            values: None,
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

    /// Current policy
    pub fn policy(&self) -> &PolicyTable {
        &self.policy
    }

    /// Values of the last evaluated policy
    pub fn values(&self) -> Option<&ValueTable> {
        self.values.as_ref()
    }

    /// Reset the environment and log, and go back to the uniform policy.
    pub fn initialize(&mut self) {
        self.planner.initialize();
        self.policy = PolicyTable::uniform(self.planner.env());
        self.values = None;
    }

    /// Alternate evaluation and improvement until the policy is stable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for a bad configuration,
    /// [`Error::NotConverged`] when either loop reaches the cap, and
    /// propagates transition model faults.
    pub fn plan(&mut self) -> Result<PolicyTable> {
        self.config.validate()?;
        self.initialize();

        let player = self.planner.player();
        info!(
            %player,
            gamma = self.config.gamma,
            threshold = self.config.threshold,
            "starting policy iteration"
        );

        let mut round = 0;
        loop {
            round += 1;
            let values = self.evaluate(round)?;
            let changed = self.improve(&values)?;
            self.values = Some(values);
            self.planner
                .record(Phase::PolicyImprovement, round, changed as f64);

            if changed == 0 {
                info!(%player, rounds = round, "policy iteration converged");
                return Ok(self.policy.clone());
            }
            check_iteration_cap(&self.config, Phase::PolicyImprovement, round, changed as f64)?;
        }
    }

    /// Values of the current policy, solved to the threshold with in-place
    /// expectation backups.
    pub fn evaluate(&mut self, round: usize) -> Result<ValueTable> {
        let phase = Phase::PolicyEvaluation { round };
        let gamma = self.config.gamma;
        let mut values = self.planner.initial_values();
        let space = Arc::clone(values.space());

        let mut iteration = 0;
        loop {
            let mut delta: f64 = 0.0;
            for (id, state) in space.iter() {
                if state.status() != Status::Undecided {
                    continue;
                }

                let dist = self
                    .policy
                    .get_by_id(id)
                    .ok_or_else(|| Error::NoActionsAvailable {
                        state: state.encode(),
                    })?;

                let mut value = 0.0;
                for &(action, prob) in dist.entries() {
                    value += prob * self.planner.backup(state, action, &values, gamma)?;
                }

                delta = delta.max((value - values.value(id)).abs());
                values.set(id, value);
            }

            iteration += 1;
            self.planner.record(phase, iteration, delta);
            if delta < self.config.threshold {
                return Ok(values);
            }
            check_iteration_cap(&self.config, phase, iteration, delta)?;
        }
    }

    /// Make the policy greedy with respect to `values`: argmax on the
    /// player's turns, argmin on the opponent's. Returns how many boards
    /// changed their most probable action.
    pub fn improve(&mut self, values: &ValueTable) -> Result<usize> {
        let gamma = self.config.gamma;
        let space = Arc::clone(values.space());
        let mut changed = 0;

        for (id, state) in space.iter() {
            if state.status() != Status::Undecided {
                continue;
            }

            let action_values = self.planner.action_values(state, values, gamma)?;
            let (best, _) = select_extreme(&action_values, self.planner.maximizes_at(state))
                .ok_or_else(|| Error::NoActionsAvailable {
                    state: state.encode(),
                })?;

            let dist = self
                .policy
                .get_mut(id)
                .ok_or_else(|| Error::NoActionsAvailable {
                    state: state.encode(),
                })?;
            if dist.argmax() != Some(best) {
                changed += 1;
            }
            dist.make_greedy(best);
        }

        Ok(changed)
    }
}
