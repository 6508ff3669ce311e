//! Subcommands of the `ttt-planner` binary

pub mod inspect;
pub mod play;
pub mod plan;

use clap::ValueEnum;

use crate::tictactoe::Player;

/// Which player marks a command applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlayerChoice {
    First,
    Second,
    Both,
}

impl PlayerChoice {
    pub fn players(self) -> &'static [Player] {
        match self {
            PlayerChoice::First => &[Player::First],
            PlayerChoice::Second => &[Player::Second],
            PlayerChoice::Both => &Player::BOTH,
        }
    }
}
