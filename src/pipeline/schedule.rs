//! Exploration schedule for training runs

use serde::{Deserialize, Serialize};

/// Linear ε anneal across a run.
///
/// Episode 0 uses `start` and the final episode uses `end`; a single-episode
/// run uses `start`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpsilonSchedule {
    start: f64,
    end: f64,
    episodes: usize,
}

impl EpsilonSchedule {
    pub fn linear(start: f64, end: f64, episodes: usize) -> Self {
        Self {
            start,
            end,
            episodes,
        }
    }

    /// Exploration rate for a global episode index
    pub fn epsilon_at(&self, episode: usize) -> f64 {
        let span = self.episodes.saturating_sub(1).max(1) as f64;
        let progress = (episode as f64 / span).min(1.0);
        self.start + (self.end - self.start) * progress
    }
}
