//! The nine symbolic cell positions a mark can be written to

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A cell position, named by row (Top/Center/Bottom) and column
/// (Left/Center/Right)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Action {
    /// Every action in row-major order
    pub const ALL: [Action; 9] = [
        Action::TopLeft,
        Action::TopCenter,
        Action::TopRight,
        Action::CenterLeft,
        Action::Center,
        Action::CenterRight,
        Action::BottomLeft,
        Action::BottomCenter,
        Action::BottomRight,
    ];

    /// Row-major cell index (0-8)
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Action> {
        Self::ALL.get(index).copied()
    }

    /// (row, column) pair
    pub fn position(self) -> (usize, usize) {
        (self.index() / 3, self.index() % 3)
    }

    pub fn from_position(row: usize, column: usize) -> Option<Action> {
        if row < 3 && column < 3 {
            Self::from_index(row * 3 + column)
        } else {
            None
        }
    }

    /// Short symbolic name (`TL`, `TC`, ..., `BR`)
    pub fn name(self) -> &'static str {
        match self {
            Action::TopLeft => "TL",
            Action::TopCenter => "TC",
            Action::TopRight => "TR",
            Action::CenterLeft => "CL",
            Action::Center => "C",
            Action::CenterRight => "CR",
            Action::BottomLeft => "BL",
            Action::BottomCenter => "BC",
            Action::BottomRight => "BR",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|action| action.name() == wanted)
            .ok_or_else(|| crate::Error::UnknownAction {
                name: s.to_string(),
            })
    }
}
