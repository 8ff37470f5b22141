//! Inspect command - look into a stored table

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    cli::{
        config::StoreArgs,
        output::{format_number, format_values, print_kv, print_section},
    },
    play::render_board,
    ports::ValueTableRepository,
    q_learning::{ValueTable, greedy_action},
    tictactoe::{BOARD_SIZE, Board},
    types::StateKey,
};

#[derive(Parser, Debug)]
#[command(about = "Show table size or one state's action values")]
pub struct InspectArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// State key to show, e.g. `____X____`
    #[arg(long)]
    pub state: Option<String>,
}

/// What the table knows about one state
#[derive(Debug, Clone, PartialEq)]
pub struct StateSummary {
    pub board: Board,
    pub values: [f64; BOARD_SIZE],
    pub seen: bool,
    /// Greedy move, `None` on a finished board
    pub greedy: Option<usize>,
}

pub fn summarize_state(table: &ValueTable, key: &StateKey) -> Result<StateSummary> {
    let board = Board::from_key(key);
    let legal = board.legal_actions();
    let greedy = if board.is_terminal() {
        None
    } else {
        Some(greedy_action(table, key, &legal)?)
    };

    Ok(StateSummary {
        board,
        values: table.values(key).copied().unwrap_or([0.0; BOARD_SIZE]),
        seen: table.contains(key),
        greedy,
    })
}

pub fn execute(args: InspectArgs) -> Result<()> {
    let repository = args.store.repository();
    let table = repository
        .load()
        .with_context(|| format!("failed to load {}", repository.path().display()))?;

    print_section(&format!("{} table", args.store.difficulty));
    print_kv("File", &repository.path().display().to_string());
    print_kv("States", &format_number(table.len()));

    let Some(raw) = args.state else {
        return Ok(());
    };
    let key: StateKey = raw
        .parse()
        .with_context(|| format!("cannot inspect '{raw}'"))?;
    let summary = summarize_state(&table, &key)?;

    println!("\n{}\n", render_board(&summary.board));
    print_kv("Status", &summary.board.status().to_string());
    print_kv("Seen in training", if summary.seen { "yes" } else { "no" });
    match summary.greedy {
        Some(action) => print_kv("Greedy move", &action.to_string()),
        None => print_kv("Greedy move", "-"),
    }
    println!("\n{}", format_values(&summary.board, &summary.values));

    Ok(())
}
