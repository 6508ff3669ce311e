//! Exhaustive enumeration of the feasible state space

use std::sync::{Arc, OnceLock};

use super::{BoardState, Status, board::RAW_BOARD_COUNT};
use crate::identifiers::StateId;

/// Generator over every raw 3x3 grid in ascending packed-code order.
///
/// Codes are read as nine base-3 digits, cell 0 most significant, with digit
/// `d` meaning mark value `d - 1`. Nothing is materialized up front.
#[derive(Debug, Clone, Default)]
pub struct RawBoards {
    next: usize,
}

impl RawBoards {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Iterator for RawBoards {
    type Item = BoardState;

    fn next(&mut self) -> Option<BoardState> {
        if self.next >= RAW_BOARD_COUNT {
            return None;
        }
        let board = BoardState::from_code(self.next as u16);
        self.next += 1;
        Some(board)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = RAW_BOARD_COUNT.saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RawBoards {}

/// Arena of every board whose status is not [`Status::Infeasible`].
///
/// Each feasible board gets a dense [`StateId`] in enumeration order; the
/// reverse lookup is a direct index by packed code, so no hashing of board
/// contents happens in solver loops.
#[derive(Debug, Clone)]
pub struct StateSpace {
    states: Vec<BoardState>,
    index: Vec<Option<StateId>>,
}

impl StateSpace {
    /// Enumerate all 3^9 grids and keep the feasible ones.
    pub fn enumerate() -> Self {
        let mut states = Vec::new();
        let mut index = vec![None; RAW_BOARD_COUNT];

        for board in RawBoards::new().filter(|b| b.status() != Status::Infeasible) {
            index[board.code() as usize] = Some(StateId::new(states.len()));
            states.push(board);
        }

        tracing::debug!(feasible = states.len(), "enumerated state space");
        Self { states, index }
    }

    /// Process-wide state space, enumerated on first use.
    pub fn shared() -> Arc<StateSpace> {
        static SPACE: OnceLock<Arc<StateSpace>> = OnceLock::new();
        Arc::clone(SPACE.get_or_init(|| Arc::new(Self::enumerate())))
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// All feasible boards in enumeration order
    pub fn states(&self) -> &[BoardState] {
        &self.states
    }

    pub fn get(&self, id: StateId) -> &BoardState {
        &self.states[id.index()]
    }

    /// Id of a board, or `None` if it is infeasible
    pub fn id_of(&self, state: &BoardState) -> Option<StateId> {
        self.index[state.code() as usize]
    }

    pub fn contains(&self, state: &BoardState) -> bool {
        self.id_of(state).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StateId, &BoardState)> + '_ {
        self.states
            .iter()
            .enumerate()
            .map(|(i, state)| (StateId::new(i), state))
    }

    pub fn count_by_status(&self, status: Status) -> usize {
        self.states.iter().filter(|s| s.status() == status).count()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashSet, VecDeque};

    use super::*;
    use crate::tictactoe::{Action, Mark};

    #[test]
    fn raw_boards_cover_every_code_once() {
        let codes: HashSet<u16> = RawBoards::new().map(|b| b.code()).collect();
        assert_eq!(codes.len(), RAW_BOARD_COUNT);
        assert_eq!(RawBoards::new().len(), RAW_BOARD_COUNT);
    }

    #[test]
    fn feasible_state_counts_match_expected() {
        let space = StateSpace::enumerate();
        assert_eq!(space.len(), 5890);
        assert_eq!(space.count_by_status(Status::Undecided), 4520);
        assert_eq!(space.count_by_status(Status::FirstWin), 942);
        assert_eq!(space.count_by_status(Status::SecondWin), 412);
        assert_eq!(space.count_by_status(Status::Draw), 16);
        assert_eq!(space.count_by_status(Status::Infeasible), 0);
    }

    #[test]
    fn ids_are_dense_and_reversible() {
        let space = StateSpace::shared();
        for (id, state) in space.iter() {
            assert_eq!(space.id_of(state), Some(id));
            assert_eq!(space.get(id), state);
        }
        let infeasible: BoardState = "XX.......".parse().unwrap();
        assert!(!space.contains(&infeasible));
    }

    #[test]
    fn reachable_boards_are_feasible() {
        let space = StateSpace::shared();
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([BoardState::empty()]);
        seen.insert(BoardState::empty());

        while let Some(state) = queue.pop_front() {
            assert!(space.contains(&state), "reachable board {state:?} pruned");
            if state.status() != Status::Undecided {
                continue;
            }
            for action in state.empty_cells() {
                let next = state.with_mark(action, state.turn().mark());
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }

        assert_eq!(seen.len(), 5478);
        assert!(seen.contains(&BoardState::empty().with_mark(Action::Center, Mark::First)));
    }
}
