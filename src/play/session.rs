//! One human-vs-bot game

use serde::Serialize;

use crate::{
    Result,
    difficulty::Difficulty,
    error::Error,
    q_learning::{QLearningAgent, ValueTable},
    tictactoe::{Board, GameStatus, Player},
};

/// The human always plays X and moves first
pub const HUMAN: Player = Player::X;

/// State of the game after one human move and the bot's answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoveReport {
    pub board: Board,
    pub status: GameStatus,
    /// Cell the bot played, `None` if the human's move ended the game
    pub bot_move: Option<usize>,
}

/// A game between a human and the bot.
///
/// The session only borrows the table, so training cannot touch it while a
/// game is in progress.
#[derive(Debug)]
pub struct PlaySession<'a> {
    table: &'a ValueTable,
    agent: QLearningAgent,
    board: Board,
}

impl<'a> PlaySession<'a> {
    pub fn new(table: &'a ValueTable, agent: QLearningAgent) -> Self {
        Self {
            table,
            agent,
            board: Board::new(),
        }
    }

    /// Session with a bot at the difficulty's play-time exploration rate
    pub fn for_difficulty(table: &'a ValueTable, difficulty: Difficulty) -> Self {
        Self::new(table, QLearningAgent::for_difficulty(difficulty))
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn status(&self) -> GameStatus {
        self.board.status()
    }

    /// Play the human's X at `cell`, then let the bot answer if the game
    /// continues.
    ///
    /// # Errors
    ///
    /// - [`Error::GameOver`] if the game has already finished
    /// - [`Error::IllegalMove`] if `cell` is out of range or occupied
    pub fn human_move(&mut self, cell: usize) -> Result<MoveReport> {
        if self.board.is_terminal() {
            return Err(Error::GameOver);
        }

        self.board = self.board.apply_action(cell, HUMAN)?;

        let bot_move = if self.board.is_terminal() {
            None
        } else {
            let action = self.agent.select_move(self.table, &self.board)?;
            self.board = self.board.apply_action(action, self.agent.role())?;
            log::debug!("bot played {action}");
            Some(action)
        };

        Ok(MoveReport {
            board: self.board,
            status: self.board.status(),
            bot_move,
        })
    }

    /// Start a fresh game with the same bot
    pub fn reset(&mut self) {
        self.board = Board::new();
    }
}
