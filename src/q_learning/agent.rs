//! Bot player backed by a learned value table

use crate::{
    difficulty::Difficulty,
    error::Result,
    q_learning::{policy::EpsilonGreedy, q_table::ValueTable},
    tictactoe::{Board, Player},
};

/// Inference-time player.
///
/// The agent never learns; it reads a [`ValueTable`] through an
/// [`EpsilonGreedy`] selector with a fixed exploration rate. The table is
/// borrowed per call, so it cannot be mutated by training while a move is
/// being chosen.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    policy: EpsilonGreedy,
    epsilon: f64,
    role: Player,
}

impl QLearningAgent {
    /// Create an agent playing `O` with the given exploration rate
    pub fn new(epsilon: f64) -> Self {
        Self {
            policy: EpsilonGreedy::new(),
            epsilon,
            role: Player::O,
        }
    }

    /// Agent configured with the difficulty's play-time epsilon
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        Self::new(difficulty.play_epsilon())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.policy = self.policy.with_seed(seed);
        self
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn role(&self) -> Player {
        self.role
    }

    /// Choose a cell for the current board.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NoLegalActions`] on a full board.
    pub fn select_move(&mut self, table: &ValueTable, board: &Board) -> Result<usize> {
        let state = board.state_key();
        let legal = board.legal_actions();
        self.policy.select(table, &state, &legal, self.epsilon)
    }
}
