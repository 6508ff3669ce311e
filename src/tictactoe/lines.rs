//! Winning line analysis for Tic-Tac-Toe

use super::{Mark, Player};

/// Winning line indices on the 3x3 board
pub const WINNING_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8], // rows
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8], // columns
    [0, 4, 8],
    [2, 4, 6], // diagonals
];

/// Number of completed lines per side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineCounts {
    pub first: usize,
    pub second: usize,
}

impl LineCounts {
    pub fn for_player(&self, player: Player) -> usize {
        match player {
            Player::First => self.first,
            Player::Second => self.second,
        }
    }
}

/// Utility for analyzing winning lines in Tic-Tac-Toe
pub struct LineAnalyzer;

impl LineAnalyzer {
    /// Sum of the mark values along one line
    pub fn line_sum(cells: &[Mark; 9], line: &[usize; 3]) -> i8 {
        line.iter().map(|&idx| cells[idx].value()).sum()
    }

    /// Count the lines whose marks sum to +3 (first player) or -3 (second player)
    pub fn completed_lines(cells: &[Mark; 9]) -> LineCounts {
        let mut counts = LineCounts::default();
        for line in &WINNING_LINES {
            match Self::line_sum(cells, line) {
                3 => counts.first += 1,
                -3 => counts.second += 1,
                _ => {}
            }
        }
        counts
    }
}
