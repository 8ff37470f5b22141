//! Train command - train a difficulty's table against the random opponent

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    cli::{
        config::StoreArgs,
        output::{format_number, print_kv, print_report, print_section},
    },
    pipeline::{
        Anneal, ChunkedTrainer, LogObserver, ProgressObserver, StopAfter, TrainingConfig,
        TrainingLoop,
    },
    ports::ValueTableRepository,
    q_learning::TerminalValue,
};

#[derive(Parser, Debug)]
#[command(about = "Train a difficulty's value table", allow_negative_numbers = true)]
pub struct TrainArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override the preset episode count
    #[arg(long, short = 'n')]
    pub episodes: Option<usize>,

    /// Learning rate α
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Discount factor γ
    #[arg(long)]
    pub gamma: Option<f64>,

    /// Value of terminal successor states in the TD target
    #[arg(long, value_enum, default_value_t = TerminalValue::Bootstrap)]
    pub terminal_value: TerminalValue,

    /// Stop at the first batch boundary past this many episodes
    #[arg(long)]
    pub max_episodes: Option<usize>,

    /// Episodes per load-train-save chunk (defaults to a fortieth of the run)
    #[arg(long)]
    pub chunk_size: Option<usize>,

    /// Anneal exploration once over the whole run instead of once per chunk
    #[arg(long, default_value_t = false)]
    pub global_anneal: bool,

    /// Discard the stored table before training
    #[arg(long, default_value_t = false)]
    pub fresh: bool,

    /// Log batch progress instead of drawing a progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

impl TrainArgs {
    pub fn anneal(&self) -> Anneal {
        if self.global_anneal {
            Anneal::Global
        } else {
            Anneal::PerChunk
        }
    }

    /// Preset configuration with command-line overrides applied
    pub fn training_config(&self) -> TrainingConfig {
        let mut config = self.store.difficulty.training_config();
        if let Some(episodes) = self.episodes {
            config.episodes = episodes;
        }
        if let Some(alpha) = self.alpha {
            config.learning_rate = alpha;
        }
        if let Some(gamma) = self.gamma {
            config.discount = gamma;
        }
        config.seed = self.seed;
        config.terminal_value = self.terminal_value;
        config
    }
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let config = args.training_config();
    let repository = args.store.repository();

    print_section(&format!("Training {} bot", args.store.difficulty));
    print_kv("Table", &repository.path().display().to_string());
    print_kv("Episodes", &format_number(config.episodes));
    print_kv(
        "Exploration",
        &format!("{} -> {}", config.epsilon_start, config.epsilon_end),
    );
    print_kv(
        "Alpha / gamma",
        &format!("{} / {}", config.learning_rate, config.discount),
    );

    if args.fresh {
        repository
            .clear()
            .with_context(|| format!("failed to clear {}", repository.path().display()))?;
        log::info!("cleared {}", repository.path().display());
    }

    let mut training = TrainingLoop::new(config).context("invalid training configuration")?;
    training = if args.no_progress {
        training.with_observer(Box::new(LogObserver::new()))
    } else {
        training.with_observer(Box::new(ProgressObserver::new()))
    };
    if let Some(limit) = args.max_episodes {
        training = training.with_observer(Box::new(StopAfter::new(limit)));
    }

    let mut trainer = ChunkedTrainer::new(repository, training);
    if let Some(chunk_size) = args.chunk_size {
        trainer = trainer.with_chunk_size(chunk_size);
    }
    trainer = trainer.with_anneal(args.anneal());
    log::info!(
        "{} episodes per chunk, {:?} anneal",
        trainer.chunk_size(),
        trainer.anneal()
    );

    let (_, report) = trainer.run().with_context(|| {
        format!(
            "training failed; {} keeps the last completed chunk",
            trainer.repository().path().display()
        )
    })?;

    print_section("Training complete");
    print_report(&report);

    if let Some(path) = &args.summary {
        report
            .save(path)
            .with_context(|| format!("failed to write summary {}", path.display()))?;
        println!("\nSummary written to {}", path.display());
    }

    Ok(())
}
