//! Game status classification

use serde::{Deserialize, Serialize};

use super::{Mark, Player, lines::LineAnalyzer};

/// Outcome classification of a board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Undecided,
    FirstWin,
    SecondWin,
    Draw,
    /// Not reachable under legal alternating play
    Infeasible,
}

impl Status {
    /// Classify a grid.
    ///
    /// A board is infeasible when the mark sum leaves `0..=1` (the first player
    /// can be at most one mark ahead), when both sides own a completed line, or
    /// when one side owns two lines before the board is full. Otherwise a
    /// completed line decides the winner, and a full board without one is a
    /// draw.
    pub fn classify(cells: &[Mark; 9], step: u8) -> Status {
        let lines = LineAnalyzer::completed_lines(cells);
        let sum: i8 = cells.iter().map(|m| m.value()).sum();

        if !(0..=1).contains(&sum) {
            Status::Infeasible
        } else if lines.first > 0 && lines.second > 0 {
            Status::Infeasible
        } else if step < 9 && (lines.first == 2 || lines.second == 2) {
            Status::Infeasible
        } else if lines.first > 0 {
            Status::FirstWin
        } else if lines.second > 0 {
            Status::SecondWin
        } else if step == 9 {
            Status::Draw
        } else {
            Status::Undecided
        }
    }

    /// The winning player, if the game has been won
    pub fn winner(self) -> Option<Player> {
        match self {
            Status::FirstWin => Some(Player::First),
            Status::SecondWin => Some(Player::Second),
            _ => None,
        }
    }

    pub fn is_win_for(self, player: Player) -> bool {
        self.winner() == Some(player)
    }

    /// Won or drawn
    pub fn is_decided(self) -> bool {
        matches!(self, Status::FirstWin | Status::SecondWin | Status::Draw)
    }

    /// The status with first and second player roles exchanged
    pub fn swapped(self) -> Status {
        match self {
            Status::FirstWin => Status::SecondWin,
            Status::SecondWin => Status::FirstWin,
            other => other,
        }
    }
}
