//! Tabular Q-learning
//!
//! This module holds the learning core shared by training and play:
//!
//! - [`ValueTable`]: state key → nine action values, zero for unseen states
//! - [`EpsilonGreedy`]: ε-greedy selection with a first-index greedy tie-break
//! - [`QLearningAgent`]: a non-learning bot that plays from a table
//!
//! The update rule is off-policy Q-learning:
//!
//! ```text
//! Q(s,a) ← Q(s,a) + α [r + γ max_a' Q(s',a') − Q(s,a)]
//! ```
//!
//! ## Usage Example
//!
//! ```
//! use qtictactoe::q_learning::{EpsilonGreedy, ValueTable};
//! use qtictactoe::tictactoe::Board;
//!
//! let table = ValueTable::new();
//! let board = Board::new();
//! let mut policy = EpsilonGreedy::new().with_seed(42);
//!
//! // Fully greedy on an empty table picks the first legal cell
//! let action = policy
//!     .select(&table, &board.state_key(), &board.legal_actions(), 0.0)
//!     .unwrap();
//! assert_eq!(action, 0);
//! ```

pub mod agent;
pub mod policy;
pub mod q_table;

// Public re-exports
pub use agent::QLearningAgent;
pub use policy::{EpsilonGreedy, greedy_action};
pub use q_table::{ActionValues, TdParams, TerminalValue, Transition, ValueTable};
