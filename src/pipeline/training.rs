//! Q-learning training loop against a uniformly random opponent

use std::ops::Range;

use rand::{rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use super::schedule::EpsilonSchedule;
use crate::{
    Error, Result,
    ports::{Control, Observer},
    q_learning::{
        EpsilonGreedy, TdParams, TerminalValue, Transition, ValueTable, policy::build_rng,
    },
    tictactoe::{Board, GameStatus, Player},
};

/// The random opponent. It always opens and never learns.
pub const OPPONENT: Player = Player::X;

/// The learning agent.
pub const AGENT: Player = Player::O;

/// Episodes between progress notifications
pub const DEFAULT_REPORT_EVERY: usize = 200;

/// Training configuration
///
/// Built once per training invocation and not changed while it runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Learning rate α, in (0, 1]
    pub learning_rate: f64,

    /// Discount factor γ, in [0, 1]
    pub discount: f64,

    /// Exploration rate of the first episode
    pub epsilon_start: f64,

    /// Exploration rate of the last episode
    pub epsilon_end: f64,

    /// Number of episodes in the whole run
    pub episodes: usize,

    /// Episodes between progress notifications (batch size)
    pub report_every: usize,

    /// Random seed
    pub seed: Option<u64>,

    /// Treatment of terminal successor states in the TD target
    pub terminal_value: TerminalValue,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.5,
            discount: 0.9,
            epsilon_start: 1.0,
            epsilon_end: 0.05,
            episodes: 5000,
            report_every: DEFAULT_REPORT_EVERY,
            seed: None,
            terminal_value: TerminalValue::default(),
        }
    }
}

impl TrainingConfig {
    /// Check parameter ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] naming the first bad parameter.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(Error::InvalidConfiguration { message });

        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return invalid(format!(
                "learning rate must be in (0, 1], got {}",
                self.learning_rate
            ));
        }
        if !(0.0..=1.0).contains(&self.discount) {
            return invalid(format!("discount must be in [0, 1], got {}", self.discount));
        }
        for (name, value) in [
            ("epsilon start", self.epsilon_start),
            ("epsilon end", self.epsilon_end),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return invalid(format!("{name} must be in [0, 1], got {value}"));
            }
        }
        if self.report_every == 0 {
            return invalid("report interval must be at least one episode".to_string());
        }
        Ok(())
    }

    pub fn schedule(&self) -> EpsilonSchedule {
        EpsilonSchedule::linear(self.epsilon_start, self.epsilon_end, self.episodes)
    }

    pub fn td_params(&self) -> TdParams {
        TdParams {
            learning_rate: self.learning_rate,
            discount: self.discount,
            terminal_value: self.terminal_value,
        }
    }
}

/// Result of one simulated game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeOutcome {
    pub status: GameStatus,
    /// TD updates applied, one per agent move
    pub agent_updates: usize,
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    /// Episodes completed by this run
    pub episodes: usize,

    /// Episodes the agent won
    pub agent_wins: usize,

    /// Episodes the random opponent won
    pub opponent_wins: usize,

    pub draws: usize,

    /// TD updates applied
    pub agent_updates: usize,

    /// Distinct states in the table when the run started
    pub table_size_before: usize,

    /// Distinct states in the table when the run ended
    pub table_size_after: usize,

    /// Whether an observer stopped the run early
    pub cancelled: bool,
}

impl TrainingReport {
    pub fn new(table_size_before: usize) -> Self {
        Self {
            episodes: 0,
            agent_wins: 0,
            opponent_wins: 0,
            draws: 0,
            agent_updates: 0,
            table_size_before,
            table_size_after: table_size_before,
            cancelled: false,
        }
    }

    fn record(&mut self, outcome: EpisodeOutcome) {
        self.episodes += 1;
        self.agent_updates += outcome.agent_updates;
        match outcome.status {
            GameStatus::Win(winner) if winner == AGENT => self.agent_wins += 1,
            GameStatus::Win(_) => self.opponent_wins += 1,
            GameStatus::Draw => self.draws += 1,
            GameStatus::InProgress => {}
        }
    }

    /// Fold a later run (e.g. the next chunk) into this report
    pub fn absorb(&mut self, later: &TrainingReport) {
        self.episodes += later.episodes;
        self.agent_wins += later.agent_wins;
        self.opponent_wins += later.opponent_wins;
        self.draws += later.draws;
        self.agent_updates += later.agent_updates;
        self.table_size_after = later.table_size_after;
        self.cancelled |= later.cancelled;
    }

    fn rate(&self, count: usize) -> f64 {
        if self.episodes > 0 {
            count as f64 / self.episodes as f64
        } else {
            0.0
        }
    }

    pub fn win_rate(&self) -> f64 {
        self.rate(self.agent_wins)
    }

    pub fn draw_rate(&self) -> f64 {
        self.rate(self.draws)
    }

    pub fn loss_rate(&self) -> f64 {
        self.rate(self.opponent_wins)
    }

    /// Save report to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

/// Reward for the agent's move that produced `status`
pub fn reward_for(status: GameStatus) -> f64 {
    match status {
        GameStatus::Win(winner) if winner == AGENT => 1.0,
        GameStatus::Win(_) => -1.0,
        GameStatus::Draw | GameStatus::InProgress => 0.0,
    }
}

/// Training loop for a single learner against the random opponent.
///
/// The table is borrowed mutably for the duration of a run, so nothing else
/// can read or write it until the run returns. Episodes run strictly one
/// after another.
pub struct TrainingLoop {
    config: TrainingConfig,
    schedule: EpsilonSchedule,
    policy: EpsilonGreedy,
    opponent_rng: StdRng,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingLoop {
    /// Create a new training loop
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if the config fails validation.
    pub fn new(config: TrainingConfig) -> Result<Self> {
        config.validate()?;

        let policy = match config.seed {
            Some(seed) => EpsilonGreedy::new().with_seed(seed),
            None => EpsilonGreedy::new(),
        };
        let opponent_rng = build_rng(config.seed.map(|seed| seed.wrapping_add(1)));

        Ok(Self {
            schedule: config.schedule(),
            config,
            policy,
            opponent_rng,
            observers: Vec::new(),
        })
    }

    /// Add an observer to the loop
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Run every configured episode against `table`
    pub fn run(&mut self, table: &mut ValueTable) -> Result<TrainingReport> {
        self.notify_training_start()?;
        let report = self.run_range(table, 0..self.config.episodes)?;
        self.notify_training_end(&report)?;
        Ok(report)
    }

    /// Run a slice of the global episode range.
    ///
    /// Exploration is interpolated over the full configured episode count, so
    /// a run split into consecutive ranges anneals exactly like a single run.
    /// Progress is reported every `report_every` completed episodes and at the
    /// end of the range; an observer may stop the run at any of those points.
    /// The report is marked cancelled when a stop leaves part of the full run
    /// unplayed.
    pub fn run_range(
        &mut self,
        table: &mut ValueTable,
        episodes: Range<usize>,
    ) -> Result<TrainingReport> {
        let schedule = self.schedule;
        self.run_range_annealed(table, episodes, schedule, 0)
    }

    /// Run a slice of the global episode range under its own exploration
    /// schedule.
    ///
    /// Episode `i` explores at `schedule.epsilon_at(i - origin)`. Progress and
    /// cancellation behave as in [`run_range`](Self::run_range).
    pub fn run_range_annealed(
        &mut self,
        table: &mut ValueTable,
        episodes: Range<usize>,
        schedule: EpsilonSchedule,
        origin: usize,
    ) -> Result<TrainingReport> {
        let total = self.config.episodes;
        let end = episodes.end.min(total);
        let mut report = TrainingReport::new(table.len());

        for episode in episodes.start..end {
            let epsilon = schedule.epsilon_at(episode.saturating_sub(origin));
            let outcome = self.play_episode(table, epsilon)?;
            report.record(outcome);

            for observer in &mut self.observers {
                observer.on_episode_end(episode, outcome.status)?;
            }

            let completed = episode + 1;
            if (completed.is_multiple_of(self.config.report_every) || completed == end)
                && self.notify_progress(completed, total)? == Control::Stop
            {
                report.cancelled = completed < total;
                if report.cancelled {
                    log::info!("training stopped by observer after {completed}/{total} episodes");
                }
                break;
            }
        }

        report.table_size_after = table.len();
        Ok(report)
    }

    /// Simulate one game and apply a TD update after every agent move.
    ///
    /// The opponent opens and plays uniformly at random; its moves are never
    /// learned from.
    pub fn run_episode(
        &mut self,
        table: &mut ValueTable,
        episode: usize,
    ) -> Result<EpisodeOutcome> {
        let epsilon = self.schedule.epsilon_at(episode);
        self.play_episode(table, epsilon)
    }

    fn play_episode(&mut self, table: &mut ValueTable, epsilon: f64) -> Result<EpisodeOutcome> {
        let params = self.config.td_params();

        let mut board = Board::new();
        let mut turn = OPPONENT;
        let mut agent_updates = 0;

        loop {
            if turn == OPPONENT {
                let legal = board.legal_actions();
                let action = *legal
                    .choose(&mut self.opponent_rng)
                    .ok_or(Error::NoLegalActions)?;
                board = board.apply_action(action, OPPONENT)?;
            } else {
                let before = board.state_key();
                let legal = board.legal_actions();
                let action = self.policy.select(table, &before, &legal, epsilon)?;

                board = board.apply_action(action, AGENT)?;
                let after = board.state_key();
                let status = board.status();

                table.td_update(
                    Transition {
                        before: &before,
                        action,
                        reward: reward_for(status),
                        after: &after,
                        terminal: status.is_terminal(),
                    },
                    params,
                );
                agent_updates += 1;
            }

            let status = board.status();
            if status.is_terminal() {
                return Ok(EpisodeOutcome {
                    status,
                    agent_updates,
                });
            }
            turn = turn.opponent();
        }
    }

    pub(crate) fn notify_training_start(&mut self) -> Result<()> {
        log::info!(
            "training {} episodes (alpha={}, gamma={}, epsilon {} -> {})",
            self.config.episodes,
            self.config.learning_rate,
            self.config.discount,
            self.config.epsilon_start,
            self.config.epsilon_end
        );
        for observer in &mut self.observers {
            observer.on_training_start(self.config.episodes)?;
        }
        Ok(())
    }

    pub(crate) fn notify_training_end(&mut self, report: &TrainingReport) -> Result<()> {
        log::info!(
            "training finished: {} episodes, W/D/L {}/{}/{}, {} states",
            report.episodes,
            report.agent_wins,
            report.draws,
            report.opponent_wins,
            report.table_size_after
        );
        for observer in &mut self.observers {
            observer.on_training_end(report)?;
        }
        Ok(())
    }

    fn notify_progress(&mut self, completed: usize, total: usize) -> Result<Control> {
        let mut control = Control::Continue;
        for observer in &mut self.observers {
            if observer.on_progress(completed, total)? == Control::Stop {
                control = Control::Stop;
            }
        }
        Ok(control)
    }
}
