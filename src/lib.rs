//! Tabular Q-learning tic-tac-toe engine
//!
//! This crate provides:
//! - Tic-Tac-Toe rules and the state-key encoding used for learning
//! - A value table with the TD(0) update and ε-greedy action selection
//! - Training against a uniformly random opponent, in resumable chunks
//! - Persisted per-difficulty tables (JSON or MessagePack)
//! - A human-vs-bot play session and the `qttt` command line

pub mod adapters;
pub mod cli;
pub mod difficulty;
pub mod error;
pub mod pipeline;
pub mod play;
pub mod ports;
pub mod q_learning;
pub mod tictactoe;
pub mod types;

pub use difficulty::Difficulty;
pub use error::{Error, Result};
pub use q_learning::{EpsilonGreedy, QLearningAgent, ValueTable};
pub use tictactoe::{Board, GameStatus, Player};
pub use types::StateKey;
