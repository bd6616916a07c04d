//! One-ply lookahead: take an immediate win, otherwise avoid gifting one.

use std::time::Duration;

use crate::ai::Strategy;
use crate::board::Move;
use crate::rules::{legal_moves, outcome, Outcome};
use crate::state::GameState;

/// Deterministic shallow heuristic.
///
/// Plays a winning move when one exists; otherwise prefers the first move
/// after which the opponent has no immediate winning reply; otherwise plays
/// the first legal move.
#[derive(Default)]
pub struct Greedy;

impl Greedy {
    /// Creates the greedy player.
    pub fn new() -> Self {
        Greedy
    }
}

impl Strategy for Greedy {
    fn choose_move(&mut self, state: &GameState, _budget: Duration) -> Option<Move> {
        let moves = legal_moves(state);
        let me = state.to_move();

        for &mv in &moves {
            if let Ok(next) = state.apply(mv) {
                if outcome(&next) == Outcome::Win(me) {
                    return Some(mv);
                }
            }
        }

        let safe = moves.iter().copied().find(|&mv| {
            let Ok(next) = state.apply(mv) else {
                return false;
            };
            !hands_opponent_a_win(&next)
        });

        safe.or_else(|| moves.first().copied())
    }
}

fn hands_opponent_a_win(state: &GameState) -> bool {
    let opponent = state.to_move();
    legal_moves(state).into_iter().any(|reply| {
        state
            .apply(reply)
            .map(|next| outcome(&next) == Outcome::Win(opponent))
            .unwrap_or(false)
    })
}
