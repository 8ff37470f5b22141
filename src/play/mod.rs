//! Human-vs-bot play against a learned value table

pub mod session;

use crate::tictactoe::{BOARD_SIZE, Board, Cell, LineAnalyzer};

pub use session::{MoveReport, PlaySession};

/// Render a board as a three-row grid.
///
/// Empty cells show their index so a human can pick a move; marks on a
/// completed winning line are bracketed.
pub fn render_board(board: &Board) -> String {
    let cells = board.cells();
    let line = LineAnalyzer::completed_line(cells);

    let rendered: Vec<String> = (0..BOARD_SIZE)
        .map(|pos| {
            let mark = match cells[pos] {
                Cell::Empty => pos.to_string(),
                cell => cell.to_char().to_string(),
            };
            if line.is_some_and(|l| l.contains(&pos)) {
                format!("[{mark}]")
            } else {
                format!(" {mark} ")
            }
        })
        .collect();

    rendered
        .chunks(3)
        .map(|row| row.join("|"))
        .collect::<Vec<_>>()
        .join("\n---+---+---\n")
}
