//! Epsilon-greedy action selection over a value table

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    error::{Error, Result},
    q_learning::q_table::ValueTable,
    tictactoe::BOARD_SIZE,
    types::StateKey,
};

pub(crate) fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Greedy argmax over `legal_actions`.
///
/// Unseen states are worth zero everywhere. Ties go to the first action in
/// `legal_actions` order (strict `>`), so with ascending legal actions the
/// lowest cell index wins a tie.
///
/// # Errors
///
/// Returns [`Error::NoLegalActions`] if `legal_actions` is empty and
/// [`Error::IllegalMove`] if it holds a position off the board.
pub fn greedy_action(
    table: &ValueTable,
    state: &StateKey,
    legal_actions: &[usize],
) -> Result<usize> {
    check_in_bounds(legal_actions)?;
    let values = table.values(state);
    let mut best: Option<(usize, f64)> = None;

    for &action in legal_actions {
        let value = values.map_or(0.0, |v| v[action]);
        match best {
            Some((_, best_value)) if value <= best_value => {}
            _ => best = Some((action, value)),
        }
    }

    best.map(|(action, _)| action).ok_or(Error::NoLegalActions)
}

fn check_in_bounds(legal_actions: &[usize]) -> Result<()> {
    match legal_actions.iter().find(|&&action| action >= BOARD_SIZE) {
        Some(&position) => Err(Error::IllegalMove { position }),
        None => Ok(()),
    }
}

/// ε-greedy action selector.
///
/// With probability ε a uniformly random legal action is returned, otherwise
/// the [`greedy_action`]. The selector owns its random number generator so
/// seeded runs are reproducible.
#[derive(Debug, Clone)]
pub struct EpsilonGreedy {
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl EpsilonGreedy {
    pub fn new() -> Self {
        Self {
            rng: build_rng(None),
            rng_seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    pub fn seed(&self) -> Option<u64> {
        self.rng_seed
    }

    /// Pick an action for `state`.
    ///
    /// `epsilon = 0` is purely greedy and draws nothing from the generator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoLegalActions`] if `legal_actions` is empty; a move
    /// must never be requested on a terminal board. Returns
    /// [`Error::IllegalMove`] if `legal_actions` holds a position off the board.
    pub fn select(
        &mut self,
        table: &ValueTable,
        state: &StateKey,
        legal_actions: &[usize],
        epsilon: f64,
    ) -> Result<usize> {
        if legal_actions.is_empty() {
            return Err(Error::NoLegalActions);
        }
        check_in_bounds(legal_actions)?;

        if epsilon > 0.0 && self.rng.random::<f64>() < epsilon {
            // Explore: random action
            legal_actions
                .choose(&mut self.rng)
                .copied()
                .ok_or(Error::NoLegalActions)
        } else {
            // Exploit: greedy action based on Q-values
            greedy_action(table, state, legal_actions)
        }
    }
}

impl Default for EpsilonGreedy {
    fn default() -> Self {
        Self::new()
    }
}
