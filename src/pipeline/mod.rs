//! Training pipeline
//!
//! This module provides:
//! - The Q-learning training loop against the random opponent
//! - The linear exploration schedule
//! - Resumable chunked training through a repository
//! - Observer adapters for progress bars, logs and metrics

pub mod chunked;
pub mod observers;
pub mod schedule;
pub mod training;

pub use chunked::{Anneal, ChunkedTrainer, default_chunk_size};
// Re-export observer implementations (adapters)
pub use observers::{LogObserver, MetricsObserver, ProgressObserver, StopAfter, TrainingMetrics};
pub use schedule::EpsilonSchedule;
pub use training::{
    AGENT, EpisodeOutcome, OPPONENT, TrainingConfig, TrainingLoop, TrainingReport, reward_for,
};

pub use crate::ports::{Control, Observer};
