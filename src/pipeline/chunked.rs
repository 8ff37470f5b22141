//! Resumable training in chunks against a persisted table
//!
//! Each chunk is a full load → train → save cycle against the repository, so
//! a run can be interrupted between chunks and later runs pick up whatever
//! the last completed chunk saved. Chunks never overlap.

use serde::{Deserialize, Serialize};

use super::{
    schedule::EpsilonSchedule,
    training::{TrainingLoop, TrainingReport},
};
use crate::{Result, ports::ValueTableRepository, q_learning::ValueTable};

/// Smallest chunk the trainer will schedule
pub const MIN_CHUNK_EPISODES: usize = 100;

/// Chunk size for a run: a fortieth of the run, but at least
/// [`MIN_CHUNK_EPISODES`]
pub fn default_chunk_size(episodes: usize) -> usize {
    (episodes / 40).max(MIN_CHUNK_EPISODES)
}

/// How exploration anneals across the chunks of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anneal {
    /// Every chunk anneals from `epsilon_start` to `epsilon_end` over its
    /// own episodes, as back-to-back training sessions would.
    #[default]
    PerChunk,
    /// One anneal over the whole run; chunking does not change what is
    /// learned.
    Global,
}

/// Drives a [`TrainingLoop`] chunk by chunk through a repository
pub struct ChunkedTrainer<R> {
    repository: R,
    training: TrainingLoop,
    chunk_size: usize,
    anneal: Anneal,
}

impl<R: ValueTableRepository> ChunkedTrainer<R> {
    pub fn new(repository: R, training: TrainingLoop) -> Self {
        let chunk_size = default_chunk_size(training.config().episodes);
        Self {
            repository,
            training,
            chunk_size,
            anneal: Anneal::default(),
        }
    }

    pub fn with_anneal(mut self, anneal: Anneal) -> Self {
        self.anneal = anneal;
        self
    }

    pub fn anneal(&self) -> Anneal {
        self.anneal
    }

    /// Override the chunk size (at least one episode)
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Schedule and origin used for the chunk starting at `start`
    fn chunk_schedule(&self, start: usize) -> (EpsilonSchedule, usize) {
        let config = self.training.config();
        match self.anneal {
            Anneal::Global => (config.schedule(), 0),
            Anneal::PerChunk => {
                let len = self.chunk_size.min(config.episodes.saturating_sub(start));
                let schedule =
                    EpsilonSchedule::linear(config.epsilon_start, config.epsilon_end, len);
                (schedule, start)
            }
        }
    }

    /// Exploration rate the run uses for a global episode index
    pub fn epsilon_at(&self, episode: usize) -> f64 {
        let start = episode - episode % self.chunk_size;
        let (schedule, origin) = self.chunk_schedule(start);
        schedule.epsilon_at(episode - origin)
    }

    /// Train every configured episode, persisting after each chunk.
    ///
    /// Returns the table as saved by the last chunk and the combined report.
    /// Stops after the current chunk if an observer requested it.
    ///
    /// # Errors
    ///
    /// Propagates repository I/O failures and training errors. Chunks saved
    /// before the failure stay saved.
    pub fn run(&mut self) -> Result<(ValueTable, TrainingReport)> {
        let total = self.training.config().episodes;
        self.training.notify_training_start()?;

        let mut table = self.repository.load()?;
        let mut combined = TrainingReport::new(table.len());
        let mut start = 0;

        while start < total {
            let end = (start + self.chunk_size).min(total);

            if start > 0 {
                table = self.repository.load()?;
            }
            let (schedule, origin) = self.chunk_schedule(start);
            let report = self
                .training
                .run_range_annealed(&mut table, start..end, schedule, origin)?;
            self.repository.save(&table)?;
            log::debug!(
                "chunk {start}..{end} saved ({} states)",
                report.table_size_after
            );

            combined.absorb(&report);
            if report.cancelled {
                break;
            }
            start = end;
        }

        self.training.notify_training_end(&combined)?;
        Ok((table, combined))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::{adapters::InMemoryRepository, difficulty::Difficulty};

    fn hard_trainer(anneal: Anneal) -> ChunkedTrainer<InMemoryRepository> {
        let training = TrainingLoop::new(Difficulty::Hard.training_config()).unwrap();
        ChunkedTrainer::new(InMemoryRepository::new(), training).with_anneal(anneal)
    }

    #[test]
    fn test_every_chunk_starts_at_epsilon_start() {
        let trainer = hard_trainer(Anneal::PerChunk);
        let chunk = trainer.chunk_size();
        assert_eq!(chunk, 550);

        for k in 0..22000 / chunk {
            assert_eq!(trainer.epsilon_at(k * chunk), 1.0, "chunk {k}");
            let last = trainer.epsilon_at((k + 1) * chunk - 1);
            assert!((last - 0.01).abs() < 1e-12, "chunk {k} ends at {last}");
        }
    }

    #[test]
    fn test_short_final_chunk_still_reaches_epsilon_end() {
        let config = crate::pipeline::TrainingConfig {
            episodes: 250,
            epsilon_start: 0.8,
            epsilon_end: 0.2,
            ..Default::default()
        };
        let training = TrainingLoop::new(config).unwrap();
        let trainer = ChunkedTrainer::new(InMemoryRepository::new(), training);

        assert_eq!(trainer.epsilon_at(200), 0.8);
        assert!((trainer.epsilon_at(249) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_global_anneal_spans_the_run() {
        let trainer = hard_trainer(Anneal::Global);
        assert_eq!(trainer.epsilon_at(0), 1.0);
        assert!(trainer.epsilon_at(550) < 1.0);
        assert!((trainer.epsilon_at(21999) - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_default_chunk_size() {
        assert_eq!(default_chunk_size(300), 100);
        assert_eq!(default_chunk_size(4000), 100);
        assert_eq!(default_chunk_size(22000), 550);
        assert_eq!(default_chunk_size(0), 100);
    }
}
