//! Value and policy tables keyed by board state.
//!
//! Both tables are dense vectors indexed by [`StateId`] and carry a handle to
//! the state space they were built over, so lookups by board go through the
//! packed-code index instead of hashing grids.

use std::{fmt, sync::Arc};

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::select_extreme;
use crate::{
    environment::Environment,
    identifiers::StateId,
    tictactoe::{Action, BoardState, Player, StateSpace, Status},
    utils::weighted_sample,
};

/// State values from one player's perspective
#[derive(Clone)]
pub struct ValueTable {
    player: Player,
    space: Arc<StateSpace>,
    values: Vec<f64>,
}

impl ValueTable {
    /// Table with the fixed terminal values: +1 for a win of `player`, -1 for
    /// a win of the opponent, 0 for draws and undecided boards.
    pub fn terminal_values(space: Arc<StateSpace>, player: Player) -> Self {
        let values = space
            .states()
            .iter()
            .map(|state| match state.status().winner() {
                Some(winner) if winner == player => 1.0,
                Some(_) => -1.0,
                None => 0.0,
            })
            .collect();

        Self {
            player,
            space,
            values,
        }
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn space(&self) -> &Arc<StateSpace> {
        &self.space
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of a board, or `None` for a board outside the feasible space
    pub fn get(&self, state: &BoardState) -> Option<f64> {
        self.space.id_of(state).map(|id| self.values[id.index()])
    }

    pub fn value(&self, id: StateId) -> f64 {
        self.values[id.index()]
    }

    pub(crate) fn set(&mut self, id: StateId, value: f64) {
        self.values[id.index()] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BoardState, f64)> + '_ {
        self.space.states().iter().zip(self.values.iter().copied())
    }

    /// Largest absolute difference to another table over the same space
    pub fn max_abs_difference(&self, other: &ValueTable) -> f64 {
        self.values
            .iter()
            .zip(&other.values)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }

    /// Legal action the mover should take under this table.
    ///
    /// The table's player maximizes the successor value and the opponent
    /// minimizes it; ties go to the first action in action order.
    pub fn greedy_action(&self, env: &Environment, state: &BoardState) -> Option<Action> {
        let successors: Vec<(Action, f64)> = env
            .actions_available_at(state)
            .into_iter()
            .filter_map(|action| {
                let next = env.make_move(state, action, state.turn());
                self.get(&next).map(|value| (action, value))
            })
            .collect();
        select_extreme(&successors, state.turn() == self.player).map(|(action, _)| action)
    }
}

impl fmt::Debug for ValueTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueTable")
            .field("player", &self.player)
            .field("states", &self.values.len())
            .finish()
    }
}

/// Probability distribution over the legal actions of one board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDistribution {
    entries: Vec<(Action, f64)>,
}

impl ActionDistribution {
    /// Equal probability on every action
    pub fn uniform(actions: &[Action]) -> Self {
        let prob = 1.0 / actions.len() as f64;
        Self {
            entries: actions.iter().map(|&action| (action, prob)).collect(),
        }
    }

    /// Probability 1 on `best`, 0 on the other actions
    pub fn greedy(actions: &[Action], best: Action) -> Self {
        let mut dist = Self {
            entries: actions.iter().map(|&action| (action, 0.0)).collect(),
        };
        dist.make_greedy(best);
        dist
    }

    pub fn from_entries(entries: Vec<(Action, f64)>) -> Self {
        Self { entries }
    }

    /// Overwrite the probabilities so that `best` gets all the mass.
    pub fn make_greedy(&mut self, best: Action) {
        for (action, prob) in &mut self.entries {
            *prob = if *action == best { 1.0 } else { 0.0 };
        }
    }

    pub fn entries(&self) -> &[(Action, f64)] {
        &self.entries
    }

    pub fn actions(&self) -> impl Iterator<Item = Action> + '_ {
        self.entries.iter().map(|&(action, _)| action)
    }

    pub fn probability(&self, action: Action) -> f64 {
        self.entries
            .iter()
            .find(|(a, _)| *a == action)
            .map_or(0.0, |&(_, prob)| prob)
    }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|&(_, prob)| prob).sum()
    }

    /// Most probable action, first in action order on ties
    pub fn argmax(&self) -> Option<Action> {
        let mut best: Option<(Action, f64)> = None;
        for &(action, prob) in &self.entries {
            if best.is_none_or(|(_, best_prob)| prob > best_prob) {
                best = Some((action, prob));
            }
        }
        best.map(|(action, _)| action)
    }

    /// Exactly one action carries probability 1
    pub fn is_greedy(&self) -> bool {
        self.entries.iter().filter(|&&(_, prob)| prob == 1.0).count() == 1
            && self
                .entries
                .iter()
                .all(|&(_, prob)| prob == 0.0 || prob == 1.0)
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> Option<Action> {
        weighted_sample(rng, &self.entries)
    }
}

/// Stochastic policy from one player's perspective, defined on undecided
/// boards only
#[derive(Clone)]
pub struct PolicyTable {
    player: Player,
    space: Arc<StateSpace>,
    entries: Vec<Option<ActionDistribution>>,
}

impl PolicyTable {
    /// Uniform distribution over the legal actions of every undecided board
    pub fn uniform(env: &Environment) -> Self {
        let space = Arc::clone(env.state_space());
        let entries = space
            .states()
            .iter()
            .map(|state| {
                (state.status() == Status::Undecided)
                    .then(|| ActionDistribution::uniform(&env.actions_available_at(state)))
            })
            .collect();

        Self {
            player: env.player(),
            space,
            entries,
        }
    }

    /// Table without any entry
    pub fn empty(space: Arc<StateSpace>, player: Player) -> Self {
        let entries = vec![None; space.len()];
        Self {
            player,
            space,
            entries,
        }
    }

    pub fn player(&self) -> Player {
        self.player
    }

    pub fn space(&self) -> &Arc<StateSpace> {
        &self.space
    }

    /// Number of boards with a distribution
    pub fn len(&self) -> usize {
        self.entries.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Distribution at a board; `None` for decided or unknown boards
    pub fn get(&self, state: &BoardState) -> Option<&ActionDistribution> {
        self.space
            .id_of(state)
            .and_then(|id| self.entries[id.index()].as_ref())
    }

    pub fn get_by_id(&self, id: StateId) -> Option<&ActionDistribution> {
        self.entries[id.index()].as_ref()
    }

    pub(crate) fn get_mut(&mut self, id: StateId) -> Option<&mut ActionDistribution> {
        self.entries[id.index()].as_mut()
    }

    pub(crate) fn set(&mut self, id: StateId, dist: ActionDistribution) {
        self.entries[id.index()] = Some(dist);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BoardState, &ActionDistribution)> + '_ {
        self.space
            .states()
            .iter()
            .zip(&self.entries)
            .filter_map(|(state, dist)| dist.as_ref().map(|d| (state, d)))
    }
}

impl fmt::Debug for PolicyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PolicyTable")
            .field("player", &self.player)
            .field("entries", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn terminal_values_follow_player_perspective() {
        let space = StateSpace::shared();
        let first = ValueTable::terminal_values(Arc::clone(&space), Player::First);
        let second = ValueTable::terminal_values(space, Player::Second);
        let won: BoardState = "XXXOO....".parse().unwrap();

        assert_eq!(first.get(&won), Some(1.0));
        assert_eq!(second.get(&won), Some(-1.0));
        assert_eq!(first.get(&BoardState::empty()), Some(0.0));
        assert_eq!(first.len(), 5890);
    }

    #[test]
    fn infeasible_board_has_no_value() {
        let table = ValueTable::terminal_values(StateSpace::shared(), Player::First);
        let infeasible: BoardState = "OO.......".parse().unwrap();
        assert_eq!(table.get(&infeasible), None);
    }

    #[test]
    fn uniform_distribution_sums_to_one() {
        let dist = ActionDistribution::uniform(&[Action::TopLeft, Action::Center, Action::BottomRight]);
        assert!((dist.total() - 1.0).abs() < 1e-12);
        assert_eq!(dist.argmax(), Some(Action::TopLeft));
        assert!(!dist.is_greedy());
    }

    #[test]
    fn greedy_distribution_is_one_hot() {
        let actions = [Action::TopLeft, Action::Center, Action::BottomRight];
        let dist = ActionDistribution::greedy(&actions, Action::Center);
        assert!(dist.is_greedy());
        assert_eq!(dist.argmax(), Some(Action::Center));
        assert_eq!(dist.probability(Action::TopLeft), 0.0);
        assert_eq!(dist.probability(Action::TopCenter), 0.0);

        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..20 {
            assert_eq!(dist.sample(&mut rng), Some(Action::Center));
        }
    }

    #[test]
    fn uniform_policy_covers_only_undecided_boards() {
        let env = Environment::with_seed(Player::First, 0);
        let policy = PolicyTable::uniform(&env);
        assert_eq!(policy.len(), 4520);

        let empty = policy.get(&BoardState::empty()).unwrap();
        assert_eq!(empty.entries().len(), 9);
        assert!((empty.probability(Action::Center) - 1.0 / 9.0).abs() < 1e-12);

        let won: BoardState = "XXXOO....".parse().unwrap();
        assert!(policy.get(&won).is_none());
    }
}
