//! Value table for temporal difference learning

use std::collections::{BTreeMap, btree_map};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::{tictactoe::BOARD_SIZE, types::StateKey};

/// Estimated value of each cell as an action from one state
pub type ActionValues = [f64; BOARD_SIZE];

/// How the TD target treats a terminal successor state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum TerminalValue {
    /// Bootstrap from whatever vector is stored for the terminal state.
    /// Terminal states are never updated as a "before" state, so in practice
    /// this is the zero vector.
    #[default]
    Bootstrap,
    /// Treat every terminal state as worth exactly zero.
    Zero,
}

/// Learning-rate and discount pair used by [`ValueTable::td_update`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TdParams {
    /// Learning rate α
    pub learning_rate: f64,
    /// Discount factor γ
    pub discount: f64,
    pub terminal_value: TerminalValue,
}

/// One agent move as seen by the learner
#[derive(Debug, Clone, Copy)]
pub struct Transition<'a> {
    pub before: &'a StateKey,
    pub action: usize,
    pub reward: f64,
    pub after: &'a StateKey,
    pub terminal: bool,
}

/// Q-table mapping state keys to per-cell action values.
///
/// Unseen states are worth the zero vector. Reads through [`values`] never
/// insert; [`get_or_insert_zero`] materializes the zero vector explicitly.
/// Keys are kept sorted so the persisted form is deterministic.
///
/// [`values`]: ValueTable::values
/// [`get_or_insert_zero`]: ValueTable::get_or_insert_zero
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueTable {
    entries: BTreeMap<StateKey, ActionValues>,
}

impl ValueTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored vector for a state, if the state has been materialized
    pub fn values(&self, state: &StateKey) -> Option<&ActionValues> {
        self.entries.get(state)
    }

    /// Value of one action; zero for unseen states
    ///
    /// # Panics
    ///
    /// Panics if `action` is not a cell index (`>= BOARD_SIZE`).
    pub fn value(&self, state: &StateKey, action: usize) -> f64 {
        self.values(state).map_or(0.0, |values| values[action])
    }

    /// Get the vector for a state, inserting the zero vector if absent
    pub fn get_or_insert_zero(&mut self, state: &StateKey) -> &mut ActionValues {
        self.entries
            .entry(state.clone())
            .or_insert([0.0; BOARD_SIZE])
    }

    /// Set the value of one action
    ///
    /// # Panics
    ///
    /// Panics if `action` is not a cell index (`>= BOARD_SIZE`).
    pub fn set(&mut self, state: &StateKey, action: usize, value: f64) {
        self.get_or_insert_zero(state)[action] = value;
    }

    /// Maximum over all nine entries of a state's vector; zero when unseen
    pub fn max_value(&self, state: &StateKey) -> f64 {
        self.values(state).map_or(0.0, |values| max_of(values))
    }

    /// Q-learning TD(0) update.
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max Q(s') - Q(s,a)]
    ///
    /// Both states are materialized before the target is computed. Returns the
    /// updated Q(s,a).
    ///
    /// # Panics
    ///
    /// Panics if `transition.action` is not a cell index (`>= BOARD_SIZE`).
    pub fn td_update(&mut self, transition: Transition<'_>, params: TdParams) -> f64 {
        self.get_or_insert_zero(transition.before);
        let stored_next = max_of(self.get_or_insert_zero(transition.after));

        let next_value = match params.terminal_value {
            TerminalValue::Zero if transition.terminal => 0.0,
            _ => stored_next,
        };

        let current = &mut self.get_or_insert_zero(transition.before)[transition.action];
        let td_target = transition.reward + params.discount * next_value;
        let td_error = td_target - *current;
        *current += params.learning_rate * td_error;
        *current
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of distinct states stored
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, state: &StateKey) -> bool {
        self.entries.contains_key(state)
    }

    /// Iterate entries in key order
    pub fn iter(&self) -> btree_map::Iter<'_, StateKey, ActionValues> {
        self.entries.iter()
    }
}

impl FromIterator<(StateKey, ActionValues)> for ValueTable {
    fn from_iter<I: IntoIterator<Item = (StateKey, ActionValues)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

fn max_of(values: &ActionValues) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS: TdParams = TdParams {
        learning_rate: 0.5,
        discount: 0.9,
        terminal_value: TerminalValue::Bootstrap,
    };

    fn key(s: &str) -> StateKey {
        StateKey::parse(s).unwrap()
    }

    #[test]
    fn test_unseen_state_reads_as_zero() {
        let table = ValueTable::new();
        let state = key("X________");
        assert_eq!(table.value(&state, 4), 0.0);
        assert_eq!(table.max_value(&state), 0.0);
        assert!(table.values(&state).is_none());
        assert!(table.is_empty());
    }

    #[test]
    fn test_get_or_insert_zero_materializes() {
        let mut table = ValueTable::new();
        let state = key("X________");
        assert_eq!(*table.get_or_insert_zero(&state), [0.0; 9]);
        assert_eq!(table.len(), 1);
        assert!(table.contains(&state));
    }

    #[test]
    fn test_set_get() {
        let mut table = ValueTable::new();
        let state = key("X________");
        table.set(&state, 4, 1.5);
        assert_eq!(table.value(&state, 4), 1.5);
        assert_eq!(table.value(&state, 3), 0.0);
    }

    #[test]
    fn test_max_value_covers_all_entries() {
        let mut table = ValueTable::new();
        let state = key("X________");
        table.set(&state, 1, -0.5);
        table.set(&state, 2, -0.8);
        // untouched entries are still zero
        assert_eq!(table.max_value(&state), 0.0);

        table.set(&state, 0, 2.0);
        assert_eq!(table.max_value(&state), 2.0);
    }

    #[test]
    fn test_single_td_update_with_win_reward() {
        let mut table = ValueTable::new();
        let before = key("XX__O____");
        let after = key("XX__O___O");

        let updated = table.td_update(
            Transition {
                before: &before,
                action: 8,
                reward: 1.0,
                after: &after,
                terminal: false,
            },
            PARAMS,
        );

        // 0.5 * (1 + 0.9 * 0 - 0) = 0.5
        assert!((updated - 0.5).abs() < 1e-12);
        assert_eq!(table.value(&before, 8), 0.5);
        assert!(table.contains(&after));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_td_update_bootstraps_from_next_state() {
        let mut table = ValueTable::new();
        let before = key("X________");
        let after = key("X___O____");
        table.set(&after, 1, 1.0);
        table.set(&after, 2, 2.0);

        table.td_update(
            Transition {
                before: &before,
                action: 4,
                reward: 0.0,
                after: &after,
                terminal: false,
            },
            PARAMS,
        );

        // 0.5 * (0 + 0.9 * 2.0 - 0) = 0.9
        assert!((table.value(&before, 4) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_terminal_value_modes() {
        let before = key("XX_OO_X__");
        let after = key("XX_OOOX__");

        let mut bootstrap = ValueTable::new();
        bootstrap.set(&after, 0, 1.0);
        let transition = Transition {
            before: &before,
            action: 5,
            reward: 1.0,
            after: &after,
            terminal: true,
        };
        bootstrap.td_update(transition, PARAMS);
        // 0.5 * (1 + 0.9 * 1.0) = 0.95
        assert!((bootstrap.value(&before, 5) - 0.95).abs() < 1e-12);

        let mut zero = ValueTable::new();
        zero.set(&after, 0, 1.0);
        zero.td_update(
            transition,
            TdParams {
                terminal_value: TerminalValue::Zero,
                ..PARAMS
            },
        );
        assert!((zero.value(&before, 5) - 0.5).abs() < 1e-12);
    }

    #[test]
    #[should_panic]
    fn test_set_off_board_action_panics() {
        let mut table = ValueTable::new();
        table.set(&key("X________"), BOARD_SIZE, 1.0);
    }

    #[test]
    fn test_clear() {
        let mut table = ValueTable::new();
        table.set(&key("X________"), 0, 1.0);
        table.clear();
        assert!(table.is_empty());
    }

    #[test]
    fn test_serializes_as_key_to_array_map() {
        let mut table = ValueTable::new();
        table.set(&key("X________"), 1, 0.5);
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"{"X________":[0.0,0.5,0.0,0.0,0.0,0.0,0.0,0.0,0.0]}"#);

        let back: ValueTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn test_rejects_wrong_vector_length() {
        let result: Result<ValueTable, _> = serde_json::from_str(r#"{"X________":[0.0,1.0]}"#);
        assert!(result.is_err());
    }
}
