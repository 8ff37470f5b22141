//! qttt CLI - train and play a tabular Q-learning tic-tac-toe bot
//!
//! This CLI provides:
//! - Training a difficulty's table against a random opponent
//! - Playing against a trained bot in the terminal
//! - Inspecting stored tables
//! - Clearing stored tables

use anyhow::Result;
use clap::{Parser, Subcommand};
use flexi_logger::Logger;

#[derive(Parser)]
#[command(name = "qttt")]
#[command(version, about = "Tabular Q-learning tic-tac-toe bot", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a difficulty's table against the random opponent
    Train(Box<qtictactoe::cli::commands::train::TrainArgs>),

    /// Play against a trained bot
    Play(qtictactoe::cli::commands::play::PlayArgs),

    /// Show table size or one state's action values
    Inspect(qtictactoe::cli::commands::inspect::InspectArgs),

    /// Delete a difficulty's stored table
    Clear(qtictactoe::cli::commands::clear::ClearArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _logger = Logger::try_with_env_or_str("info")?
        .format(flexi_logger::colored_default_format)
        .start()?;

    match cli.command {
        Commands::Train(args) => qtictactoe::cli::commands::train::execute(*args),
        Commands::Play(args) => qtictactoe::cli::commands::play::execute(args),
        Commands::Inspect(args) => qtictactoe::cli::commands::inspect::execute(args),
        Commands::Clear(args) => qtictactoe::cli::commands::clear::execute(args),
    }
}
