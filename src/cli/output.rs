//! Output formatting for CLI

use crate::{
    pipeline::TrainingReport,
    q_learning::ActionValues,
    tictactoe::{BOARD_SIZE, Board},
};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Print outcome counts and table growth of a training run
pub fn print_report(report: &TrainingReport) {
    let pct = |rate: f64| format!("{:.1}%", rate * 100.0);

    print_kv("Episodes", &format_number(report.episodes));
    print_kv(
        "Bot wins",
        &format!("{} ({})", report.agent_wins, pct(report.win_rate())),
    );
    print_kv(
        "Draws",
        &format!("{} ({})", report.draws, pct(report.draw_rate())),
    );
    print_kv(
        "Opponent wins",
        &format!("{} ({})", report.opponent_wins, pct(report.loss_rate())),
    );
    print_kv(
        "States",
        &format!(
            "{} -> {}",
            format_number(report.table_size_before),
            format_number(report.table_size_after)
        ),
    );
    if report.cancelled {
        print_kv("Stopped early", "yes");
    }
}

/// Lay out one state's action values as a 3x3 grid; occupied cells show
/// their mark instead of a value
pub fn format_values(board: &Board, values: &ActionValues) -> String {
    let cells: Vec<String> = (0..BOARD_SIZE)
        .map(|pos| {
            if board.is_empty(pos) {
                format!("{:>7.3}", values[pos])
            } else {
                format!("{:>7}", board.get(pos).to_char())
            }
        })
        .collect();

    cells
        .chunks(3)
        .map(|row| row.join(" "))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tictactoe::Player;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(22000), "22,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_format_values_shows_marks() {
        let board = Board::new().apply_action(4, Player::X).unwrap();
        let mut values = [0.0; BOARD_SIZE];
        values[0] = 0.5;

        let grid = format_values(&board, &values);
        let rows: Vec<&str> = grid.lines().collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].split_whitespace().next(), Some("0.500"));
        assert_eq!(rows[1].split_whitespace().nth(1), Some("X"));
    }
}
