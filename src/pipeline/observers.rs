//! Observer adapters for training runs
//!
//! Observers allow composable progress reporting during training without
//! coupling the training loop to specific output formats.

use std::sync::{Arc, Mutex};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use super::training::{AGENT, TrainingReport};
use crate::{
    Result,
    ports::{Control, Observer},
    tictactoe::GameStatus,
};

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    wins: usize,
    draws: usize,
    losses: usize,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            wins: 0,
            draws: 0,
            losses: 0,
        }
    }

    fn message(&self) -> String {
        format!("{} D:{} L:{}", self.wins, self.draws, self.losses)
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes (W:{msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, _episode: usize, status: GameStatus) -> Result<()> {
        match status {
            GameStatus::Win(winner) if winner == AGENT => self.wins += 1,
            GameStatus::Win(_) => self.losses += 1,
            GameStatus::Draw => self.draws += 1,
            GameStatus::InProgress => {}
        }
        Ok(())
    }

    fn on_progress(&mut self, completed: usize, _total: usize) -> Result<Control> {
        if let Some(pb) = &self.progress_bar {
            pb.set_position(completed as u64);
            pb.set_message(self.message());
        }
        Ok(Control::Continue)
    }

    fn on_training_end(&mut self, _report: &TrainingReport) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Log observer - emits `trained {completed}/{total}` lines at batch boundaries
#[derive(Debug, Default)]
pub struct LogObserver;

impl LogObserver {
    pub fn new() -> Self {
        Self
    }
}

impl Observer for LogObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        log::info!("starting... ({total_episodes} episodes)");
        Ok(())
    }

    fn on_progress(&mut self, completed: usize, total: usize) -> Result<Control> {
        log::info!("trained {completed}/{total}");
        Ok(Control::Continue)
    }

    fn on_training_end(&mut self, report: &TrainingReport) -> Result<()> {
        if report.cancelled {
            log::info!("training stopped ({} episodes)", report.episodes);
        } else {
            log::info!("training complete ({})", report.episodes);
        }
        Ok(())
    }
}

/// Outcome counts collected by [`MetricsObserver`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingMetrics {
    pub episodes: usize,
    pub agent_wins: usize,
    pub opponent_wins: usize,
    pub draws: usize,
    /// `(completed, total)` for every progress notification, in order
    pub progress: Vec<(usize, usize)>,
}

impl TrainingMetrics {
    /// Agent win rate over the recorded episodes
    pub fn win_rate(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.agent_wins as f64 / self.episodes as f64
        }
    }
}

/// Metrics observer - Tracks training outcomes.
///
/// The observer is moved into the training loop, so the counts live behind a
/// shared handle that the caller keeps.
#[derive(Debug, Clone, Default)]
pub struct MetricsObserver {
    metrics: Arc<Mutex<TrainingMetrics>>,
}

impl MetricsObserver {
    /// Create a new metrics observer
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the shared counts
    pub fn handle(&self) -> Arc<Mutex<TrainingMetrics>> {
        Arc::clone(&self.metrics)
    }

    /// Copy of the current counts
    pub fn snapshot(&self) -> TrainingMetrics {
        self.metrics
            .lock()
            .map(|metrics| metrics.clone())
            .unwrap_or_default()
    }

    fn update(&self, f: impl FnOnce(&mut TrainingMetrics)) {
        if let Ok(mut metrics) = self.metrics.lock() {
            f(&mut metrics);
        }
    }
}

impl Observer for MetricsObserver {
    fn on_episode_end(&mut self, _episode: usize, status: GameStatus) -> Result<()> {
        self.update(|metrics| {
            metrics.episodes += 1;
            match status {
                GameStatus::Win(winner) if winner == AGENT => metrics.agent_wins += 1,
                GameStatus::Win(_) => metrics.opponent_wins += 1,
                GameStatus::Draw => metrics.draws += 1,
                GameStatus::InProgress => {}
            }
        });
        Ok(())
    }

    fn on_progress(&mut self, completed: usize, total: usize) -> Result<Control> {
        self.update(|metrics| metrics.progress.push((completed, total)));
        Ok(Control::Continue)
    }
}

/// Requests a stop at the first batch boundary at or past `limit` episodes
#[derive(Debug, Clone, Copy)]
pub struct StopAfter {
    limit: usize,
}

impl StopAfter {
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

impl Observer for StopAfter {
    fn on_progress(&mut self, completed: usize, _total: usize) -> Result<Control> {
        if completed >= self.limit {
            Ok(Control::Stop)
        } else {
            Ok(Control::Continue)
        }
    }
}
