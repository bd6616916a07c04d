//! Alpha-beta search with a fill-level depth schedule and a soft deadline.

use std::time::{Duration, Instant};

use tracing::trace;

use crate::ai::Strategy;
use crate::board::{Move, Player};
use crate::rules::{legal_moves, outcome, Outcome};
use crate::state::GameState;

const WIN_SCORE: i32 = 1_000;

/// Depth-limited alpha-beta player.
///
/// Searches deeper as the board fills up (the branching factor shrinks fast)
/// and cuts the search short once three quarters of the move budget is spent,
/// falling back to the static evaluation of the node it was in.
pub struct Minimax {
    seat: Player,
    nodes: u64,
}

impl Minimax {
    /// Creates an alpha-beta player for the given seat.
    pub fn new(seat: Player) -> Self {
        Self { seat, nodes: 0 }
    }

    fn depth_for(placed: usize) -> u32 {
        match placed {
            0..=3 => 2,
            4..=7 => 3,
            _ => 4,
        }
    }

    fn alphabeta(
        &mut self,
        state: &GameState,
        depth: u32,
        mut alpha: i32,
        mut beta: i32,
        deadline: Option<Instant>,
    ) -> i32 {
        self.nodes += 1;
        match outcome(state) {
            Outcome::Win(p) if p == self.seat => return WIN_SCORE + depth as i32,
            Outcome::Win(_) => return -WIN_SCORE - depth as i32,
            Outcome::Draw => return 0,
            Outcome::Ongoing => {}
        }
        let out_of_time = deadline.is_some_and(|d| Instant::now() >= d);
        if depth == 0 || out_of_time {
            return self.evaluate(state);
        }

        let maximizing = state.to_move() == self.seat;
        let mut best = if maximizing { i32::MIN } else { i32::MAX };
        for mv in legal_moves(state) {
            let Ok(next) = state.apply(mv) else {
                continue;
            };
            let score = self.alphabeta(&next, depth - 1, alpha, beta, deadline);
            if maximizing {
                best = best.max(score);
                alpha = alpha.max(best);
            } else {
                best = best.min(score);
                beta = beta.min(best);
            }
            if beta <= alpha {
                break;
            }
        }
        best
    }

    // Mobility difference: states where we keep options and the opponent
    // runs out of placements score well, which also steers toward stalemate
    // wins.
    fn evaluate(&self, state: &GameState) -> i32 {
        let mine = crate::rules::move_count(state, self.seat) as i32;
        let theirs = crate::rules::move_count(state, self.seat.opponent()) as i32;
        mine - theirs
    }
}

impl Strategy for Minimax {
    fn choose_move(&mut self, state: &GameState, budget: Duration) -> Option<Move> {
        let start = Instant::now();
        let deadline = budget
            .checked_mul(3)
            .map(|b| b / 4)
            .and_then(|soft| start.checked_add(soft));
        let depth = Self::depth_for(state.board().piece_count());
        self.nodes = 0;

        let mut best: Option<(i32, Move)> = None;
        let mut alpha = i32::MIN;
        for mv in legal_moves(state) {
            let next = state.apply(mv).ok()?;
            let score = self.alphabeta(&next, depth, alpha, i32::MAX, deadline);
            if best.map_or(true, |(s, _)| score > s) {
                best = Some((score, mv));
            }
            alpha = alpha.max(score);
            if deadline.is_some_and(|d| Instant::now() >= d) {
                break;
            }
        }
        trace!(
            nodes = self.nodes,
            depth,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "minimax done"
        );
        best.map(|(_, mv)| mv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Cell, Piece, Shape, Size};

    fn mv(owner: Player, shape: Shape, size: Size, row: u8, col: u8) -> Move {
        Move {
            piece: Piece { shape, size, owner },
            cell: Cell::new(row, col).unwrap(),
        }
    }

    #[test]
    fn finds_the_winning_placement() {
        let state = GameState::initial()
            .apply(mv(Player::One, Shape::Circle, Size::Small, 0, 0))
            .unwrap()
            .apply(mv(Player::Two, Shape::Square, Size::Small, 3, 3))
            .unwrap()
            .apply(mv(Player::One, Shape::Square, Size::Small, 0, 1))
            .unwrap()
            .apply(mv(Player::Two, Shape::Triangle, Size::Small, 2, 3))
            .unwrap()
            .apply(mv(Player::One, Shape::Triangle, Size::Small, 0, 2))
            .unwrap()
            .apply(mv(Player::Two, Shape::Circle, Size::Small, 2, 2))
            .unwrap();
        // Player 1 to move; a diamond at (0,3) completes row 0.
        let mut ai = Minimax::new(Player::One);
        let chosen = ai
            .choose_move(&state, Duration::from_millis(500))
            .unwrap();
        let next = state.apply(chosen).unwrap();
        assert_eq!(outcome(&next), Outcome::Win(Player::One));
    }

    #[test]
    fn respects_a_tiny_budget() {
        let state = GameState::initial();
        let mut ai = Minimax::new(Player::One);
        let budget = Duration::from_millis(5);
        let start = Instant::now();
        let chosen = ai.choose_move(&state, budget);
        assert!(chosen.is_some());
        // Soft deadline plus one evaluation; generous bound to stay unflaky.
        assert!(start.elapsed() < Duration::from_secs(2));
    }
}
