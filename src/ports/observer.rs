//! Observer port - abstraction for training observation
//!
//! This port lets progress bars, log lines and metrics follow a training run
//! without coupling the training loop to any output format.

use crate::{Result, pipeline::TrainingReport, tictactoe::GameStatus};

/// Whether training should keep going after a batch boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Control {
    #[default]
    Continue,
    Stop,
}

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` - once per run
/// 2. `on_episode_end(episode, status)` - after every episode
/// 3. `on_progress(completed, total)` - at every batch boundary and after the
///    last episode
/// 4. `on_training_end(report)` - once per run
///
/// Returning [`Control::Stop`] from `on_progress` ends the run at that batch
/// boundary. Training never stops in the middle of an episode.
///
/// # Examples
///
/// ```
/// use qtictactoe::{ports::Observer, tictactoe::GameStatus};
///
/// struct CountingObserver {
///     episodes: usize,
/// }
///
/// impl Observer for CountingObserver {
///     fn on_episode_end(&mut self, _episode: usize, _status: GameStatus) -> qtictactoe::Result<()> {
///         self.episodes += 1;
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called when training starts.
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each episode with its final status.
    fn on_episode_end(&mut self, _episode: usize, _status: GameStatus) -> Result<()> {
        Ok(())
    }

    /// Called at batch boundaries with global progress.
    ///
    /// # Default Implementation
    ///
    /// Continues training.
    fn on_progress(&mut self, _completed: usize, _total: usize) -> Result<Control> {
        Ok(Control::Continue)
    }

    /// Called when training completes or is stopped.
    fn on_training_end(&mut self, _report: &TrainingReport) -> Result<()> {
        Ok(())
    }
}
