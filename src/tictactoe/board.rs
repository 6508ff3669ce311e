//! Board state representation and derived game facts

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{action::Action, validation::Status};

/// Number of raw 3x3 boards (3^9), i.e. the size of the packed-code range.
pub const RAW_BOARD_COUNT: usize = 19_683;

/// A mark in one cell of the board
///
/// Marks carry the signed values used throughout the game model: `0` for an
/// empty cell, `+1` for the first player and `-1` for the second player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i8")]
pub enum Mark {
    Empty,
    First,
    Second,
}

impl Mark {
    /// Signed value of the mark
    pub const fn value(self) -> i8 {
        match self {
            Mark::Empty => 0,
            Mark::First => 1,
            Mark::Second => -1,
        }
    }

    /// Base-3 digit of the mark in a packed board code
    ///
    /// Digits follow the mark value order (-1, 0, +1), so enumerating codes in
    /// ascending order walks boards in lexicographic order of their values.
    pub const fn digit(self) -> u16 {
        (self.value() + 1) as u16
    }

    fn from_digit(digit: u16) -> Mark {
        match digit {
            0 => Mark::Second,
            1 => Mark::Empty,
            _ => Mark::First,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Mark::Empty => '.',
            Mark::First => 'X',
            Mark::Second => 'O',
        }
    }

    pub fn from_char(c: char) -> Option<Mark> {
        match c {
            '.' | '-' | '0' => Some(Mark::Empty),
            'X' | 'x' => Some(Mark::First),
            'O' | 'o' => Some(Mark::Second),
            _ => None,
        }
    }

    /// The player owning this mark, if any
    pub fn player(self) -> Option<Player> {
        match self {
            Mark::First => Some(Player::First),
            Mark::Second => Some(Player::Second),
            Mark::Empty => None,
        }
    }

    /// Swap first and second player marks
    pub fn swapped(self) -> Mark {
        match self {
            Mark::First => Mark::Second,
            Mark::Second => Mark::First,
            Mark::Empty => Mark::Empty,
        }
    }
}

impl From<Mark> for i8 {
    fn from(mark: Mark) -> Self {
        mark.value()
    }
}

impl TryFrom<i8> for Mark {
    type Error = crate::Error;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Mark::Empty),
            1 => Ok(Mark::First),
            -1 => Ok(Mark::Second),
            _ => Err(crate::Error::InvalidMark { value }),
        }
    }
}

/// A side in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Player {
    First,
    Second,
}

impl Player {
    pub const BOTH: [Player; 2] = [Player::First, Player::Second];

    /// Get the opponent player
    pub fn opponent(self) -> Player {
        match self {
            Player::First => Player::Second,
            Player::Second => Player::First,
        }
    }

    /// The mark this player writes
    pub fn mark(self) -> Mark {
        match self {
            Player::First => Mark::First,
            Player::Second => Mark::Second,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Player::First => "first",
            Player::Second => "second",
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Player {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" | "x" | "1" => Ok(Player::First),
            "second" | "o" | "-1" => Ok(Player::Second),
            _ => Err(crate::Error::UnknownPlayer {
                name: s.to_string(),
            }),
        }
    }
}

/// Immutable 3x3 board together with its derived turn, step and status
///
/// All derived fields are computed once at construction and are pure functions
/// of the cells, so equality and hashing by value are equality and hashing of
/// the grid. Deserialization goes through [`BoardState::new`] and recomputes
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[Mark; 9]", into = "[Mark; 9]")]
pub struct BoardState {
    cells: [Mark; 9],
    turn: Player,
    step: u8,
    status: Status,
    code: u16,
}

impl BoardState {
    /// Build a board from its nine cells (row-major). Never fails: infeasible
    /// grids are accepted and reported through [`BoardState::status`].
    pub fn new(cells: [Mark; 9]) -> Self {
        let sum: i8 = cells.iter().map(|m| m.value()).sum();
        let empty = cells.iter().filter(|&&m| m == Mark::Empty).count();
        let step = (9 - empty) as u8;
        let turn = if sum == 0 {
            Player::First
        } else {
            Player::Second
        };
        let code = cells.iter().fold(0u16, |acc, m| acc * 3 + m.digit());

        BoardState {
            cells,
            turn,
            step,
            status: Status::classify(&cells, step),
            code,
        }
    }

    /// The canonical empty board
    pub fn empty() -> Self {
        Self::new([Mark::Empty; 9])
    }

    /// Build a board from a row-major 3x3 grid
    pub fn from_grid(grid: [[Mark; 3]; 3]) -> Self {
        let mut cells = [Mark::Empty; 9];
        for (row, marks) in grid.iter().enumerate() {
            cells[row * 3..row * 3 + 3].copy_from_slice(marks);
        }
        Self::new(cells)
    }

    /// Decode a packed base-3 board code (0..19683)
    pub fn from_code(code: u16) -> Self {
        let mut cells = [Mark::Empty; 9];
        let mut rest = code;
        for cell in cells.iter_mut().rev() {
            *cell = Mark::from_digit(rest % 3);
            rest /= 3;
        }
        Self::new(cells)
    }

    /// Reset this board to the canonical empty grid.
    pub fn reset(&mut self) -> &mut Self {
        *self = Self::empty();
        self
    }

    pub fn cells(&self) -> &[Mark; 9] {
        &self.cells
    }

    /// Get the mark at a cell
    pub fn get(&self, action: Action) -> Mark {
        self.cells[action.index()]
    }

    /// Whose move is next
    pub fn turn(&self) -> Player {
        self.turn
    }

    /// Number of marks placed
    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn status(&self) -> Status {
        self.status
    }

    /// Packed base-3 encoding of the grid, a pure function of the cells
    pub fn code(&self) -> u16 {
        self.code
    }

    /// Sum of all mark values
    pub fn sum(&self) -> i8 {
        self.cells.iter().map(|m| m.value()).sum()
    }

    pub fn is_empty(&self, action: Action) -> bool {
        self.get(action) == Mark::Empty
    }

    /// Cells without a mark, in action order
    pub fn empty_cells(&self) -> Vec<Action> {
        Action::ALL
            .into_iter()
            .filter(|&action| self.is_empty(action))
            .collect()
    }

    /// A new board with `mark` written at `action`. The cell is overwritten
    /// whether or not it was empty.
    #[must_use = "with_mark returns a new board state; the original is unchanged"]
    pub fn with_mark(&self, action: Action, mark: Mark) -> Self {
        let mut cells = self.cells;
        cells[action.index()] = mark;
        Self::new(cells)
    }

    /// Swap first and second player marks on every cell
    #[must_use = "swap_marks returns a new board state; the original is unchanged"]
    pub fn swap_marks(&self) -> Self {
        Self::new(self.cells.map(Mark::swapped))
    }

    /// Compact single-line label, e.g. `XO.......`
    pub fn encode(&self) -> String {
        self.cells.iter().map(|m| m.to_char()).collect()
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<[Mark; 9]> for BoardState {
    fn from(cells: [Mark; 9]) -> Self {
        Self::new(cells)
    }
}

impl From<BoardState> for [Mark; 9] {
    fn from(state: BoardState) -> Self {
        state.cells
    }
}

impl FromStr for BoardState {
    type Err = crate::Error;

    /// Parse nine cells (`X`, `O`, `.`), ignoring whitespace and `/` separators.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '/')
            .collect();
        if chars.len() != 9 {
            return Err(crate::Error::InvalidBoardLength {
                expected: 9,
                got: chars.len(),
                context: s.to_string(),
            });
        }

        let mut cells = [Mark::Empty; 9];
        for (i, &c) in chars.iter().enumerate() {
            cells[i] = Mark::from_char(c).ok_or_else(|| crate::Error::InvalidCellCharacter {
                character: c,
                position: i,
                context: s.to_string(),
            })?;
        }

        Ok(Self::new(cells))
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &cell) in self.cells.iter().enumerate() {
            write!(f, "{}", cell.to_char())?;
            if (i + 1).is_multiple_of(3) && i < 8 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
