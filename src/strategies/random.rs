//! Uniformly random legal play.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::ai::Strategy;
use crate::board::Move;
use crate::rules::legal_moves;
use crate::state::GameState;

/// Picks a uniformly random legal move. Useful as a baseline opponent and in
/// tests, where a fixed seed makes games reproducible.
pub struct Random {
    rng: StdRng,
}

impl Random {
    /// A random player seeded from the OS.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// A deterministic random player.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::new()
    }
}

impl Strategy for Random {
    fn choose_move(&mut self, state: &GameState, _budget: Duration) -> Option<Move> {
        legal_moves(state).choose(&mut self.rng).copied()
    }
}
