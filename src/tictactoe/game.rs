//! Game status verdicts

use std::fmt;

use serde::{Deserialize, Serialize};

use super::board::Player;

/// Verdict on a board: still in progress, won by one player, or drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Win(Player),
    Draw,
}

impl GameStatus {
    /// A board is terminal once someone has won or the board is full
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    pub fn winner(self) -> Option<Player> {
        match self {
            GameStatus::Win(player) => Some(player),
            GameStatus::InProgress | GameStatus::Draw => None,
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameStatus::InProgress => write!(f, "in progress"),
            GameStatus::Win(player) => write!(f, "{player} wins"),
            GameStatus::Draw => write!(f, "draw"),
        }
    }
}
