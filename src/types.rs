//! Newtype wrappers for improved type safety and domain modeling.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::tictactoe::{BOARD_SIZE, Board, Cell};

/// Symbol used for an empty cell inside a [`StateKey`].
///
/// Distinct from both player marks so that keys stay injective.
pub const EMPTY_SYMBOL: char = '_';

/// Learning-state key derived from a board.
///
/// One symbol per cell in board order: `_` for empty, `X` and `O` for the
/// marks. No symmetry reduction is applied, so every raw configuration is its
/// own key.
///
/// # Examples
///
/// ```
/// use qtictactoe::tictactoe::{Board, Player};
/// use qtictactoe::types::StateKey;
///
/// let board = Board::new().apply_action(4, Player::X).unwrap();
/// let key = StateKey::encode(&board);
/// assert_eq!(key.as_str(), "____X____");
///
/// // Parse from string (validates the format)
/// let parsed = StateKey::parse("____X____").unwrap();
/// assert_eq!(parsed, key);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StateKey(String);

impl StateKey {
    /// Encode a board. Total, pure and deterministic.
    pub fn encode(board: &Board) -> Self {
        StateKey(board.cells().iter().map(|&c| symbol(c)).collect())
    }

    /// Parse and validate a key from a string.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidStateKey`] unless the string is exactly
    /// nine symbols drawn from `_`, `X` and `O`.
    pub fn parse(s: &str) -> Result<Self, crate::Error> {
        let len = s.chars().count();
        if len != BOARD_SIZE {
            return Err(crate::Error::InvalidStateKey {
                key: s.to_string(),
                reason: format!("expected {BOARD_SIZE} symbols, got {len}"),
            });
        }

        if let Some((position, character)) = s
            .chars()
            .enumerate()
            .find(|&(_, c)| from_symbol(c).is_none())
        {
            return Err(crate::Error::InvalidStateKey {
                key: s.to_string(),
                reason: format!("invalid symbol '{character}' at position {position}"),
            });
        }

        Ok(StateKey(s.to_string()))
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn cells(&self) -> [Cell; BOARD_SIZE] {
        let mut cells = [Cell::Empty; BOARD_SIZE];
        for (cell, c) in cells.iter_mut().zip(self.0.chars()) {
            *cell = from_symbol(c).unwrap_or(Cell::Empty);
        }
        cells
    }
}

fn symbol(cell: Cell) -> char {
    match cell {
        Cell::Empty => EMPTY_SYMBOL,
        Cell::X => 'X',
        Cell::O => 'O',
    }
}

fn from_symbol(c: char) -> Option<Cell> {
    match c {
        EMPTY_SYMBOL => Some(Cell::Empty),
        'X' => Some(Cell::X),
        'O' => Some(Cell::O),
        _ => None,
    }
}

impl AsRef<str> for StateKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StateKey {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for StateKey {
    type Error = crate::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StateKey> for String {
    fn from(key: StateKey) -> Self {
        key.0
    }
}

impl From<&Board> for StateKey {
    fn from(board: &Board) -> Self {
        Self::encode(board)
    }
}
