//! Play command - a human-vs-bot game in the terminal

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    Error,
    cli::{config::StoreArgs, output::print_section},
    play::{PlaySession, render_board},
    ports::ValueTableRepository,
    q_learning::QLearningAgent,
    tictactoe::{GameStatus, Player},
};

#[derive(Parser, Debug)]
#[command(about = "Play against a trained bot")]
pub struct PlayArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Random seed for the bot's exploration
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn execute(args: PlayArgs) -> Result<()> {
    let repository = args.store.repository();
    let table = repository
        .load()
        .with_context(|| format!("failed to load {}", repository.path().display()))?;

    if table.is_empty() {
        log::warn!(
            "no trained table at {}; the bot will play its first free cell",
            repository.path().display()
        );
    }

    let mut agent = QLearningAgent::for_difficulty(args.store.difficulty);
    if let Some(seed) = args.seed {
        agent = agent.with_seed(seed);
    }

    print_section(&format!("You are X against the {} bot", args.store.difficulty));
    println!("Enter a cell 0-8, 'n' for a new game, 'q' to quit.");

    let mut session = PlaySession::new(&table, agent);
    let stdin = io::stdin();
    run(&mut session, stdin.lock(), io::stdout())
}

/// Read moves from `input` until it ends or the player quits
pub fn run<R: BufRead, W: Write>(
    session: &mut PlaySession<'_>,
    input: R,
    mut output: W,
) -> Result<()> {
    writeln!(output, "{}\n", render_board(session.board()))?;

    for line in input.lines() {
        let line = line.context("failed to read input")?;
        let command = line.trim();

        match command {
            "" => continue,
            "q" | "quit" => break,
            "n" | "new" => {
                session.reset();
                writeln!(output, "New game.\n{}\n", render_board(session.board()))?;
                continue;
            }
            _ => {}
        }

        let Ok(cell) = command.parse::<usize>() else {
            writeln!(output, "Not a cell: '{command}'")?;
            continue;
        };

        match session.human_move(cell) {
            Ok(report) => {
                if let Some(bot_move) = report.bot_move {
                    writeln!(output, "Bot plays {bot_move}")?;
                }
                writeln!(output, "{}\n", render_board(&report.board))?;
                if let Some(message) = final_message(report.status) {
                    writeln!(output, "{message} 'n' for a new game, 'q' to quit.")?;
                }
            }
            Err(Error::IllegalMove { position }) => {
                writeln!(output, "Cell {position} is not free")?;
            }
            Err(Error::GameOver) => {
                writeln!(output, "Game over. 'n' for a new game, 'q' to quit.")?;
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

fn final_message(status: GameStatus) -> Option<&'static str> {
    match status {
        GameStatus::Win(Player::X) => Some("You win!"),
        GameStatus::Win(Player::O) => Some("Bot wins."),
        GameStatus::Draw => Some("Draw."),
        GameStatus::InProgress => None,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::{difficulty::Difficulty, q_learning::ValueTable};

    fn play_script(script: &str) -> String {
        let table = ValueTable::new();
        let mut session = PlaySession::for_difficulty(&table, Difficulty::Hard);
        let mut output = Vec::new();
        run(&mut session, Cursor::new(script), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_scripted_human_win() {
        let output = play_script("2\n5\n8\nq\n");
        assert!(output.contains("Bot plays 0"));
        assert!(output.contains("Bot plays 1"));
        assert!(output.contains("You win!"));
    }

    #[test]
    fn test_bad_input_is_reported_not_fatal() {
        let output = play_script("x\n4\n4\n9\n");
        assert!(output.contains("Not a cell: 'x'"));
        assert!(output.contains("Cell 4 is not free"));
        assert!(output.contains("Cell 9 is not free"));
    }

    #[test]
    fn test_moves_after_game_over() {
        let output = play_script("2\n5\n8\n3\nn\n4\n");
        assert!(output.contains("Game over."));
        assert!(output.contains("New game."));
    }
}
