//! Common test utilities for the qtictactoe test suite.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use qtictactoe::{
    tictactoe::{Board, Player},
    types::StateKey,
};

/// Parse a state key, panicking on malformed test input
pub fn key(s: &str) -> StateKey {
    StateKey::parse(s).expect("valid test key")
}

/// Every board reachable from the empty board with X moving first, keyed by
/// its state key
pub fn reachable_boards() -> HashMap<StateKey, Board> {
    let mut seen = HashMap::new();
    let mut frontier = vec![(Board::new(), Player::X)];
    let mut visited: HashSet<StateKey> = HashSet::new();

    while let Some((board, to_move)) = frontier.pop() {
        let state = board.state_key();
        if !visited.insert(state.clone()) {
            continue;
        }
        seen.insert(state, board);

        if board.is_terminal() {
            continue;
        }
        for action in board.legal_actions() {
            let next = board
                .apply_action(action, to_move)
                .expect("legal action applies");
            frontier.push((next, to_move.opponent()));
        }
    }

    seen
}
