//! Tournament strategies used by the arena to schedule matchups.
//!
//! This module defines the [`TournamentStrategy`] trait and the built-in
//! [`RoundRobin`] format. The arena calls `add_entrants`, then repeatedly
//! calls `advance_round` until it returns no pairings; per-AI aggregation
//! happens in the [`TournamentReport`](crate::report::TournamentReport), not
//! here.
//!
//! # Implementing a custom strategy
//!
//! A strategy only decides *who plays whom next*, possibly based on the
//! results of the previous round (e.g. a Swiss-style format would pair by
//! score). Returning an empty round ends the tournament.

use std::sync::Arc;

use tracing::info;

use crate::ai::Entrant;
use crate::match_runner::{MatchResult, MatchSettings};

/// Decides the sequence of pairings in a tournament.
pub trait TournamentStrategy {
    /// Hands the strategy the registered entrants. Called once, before the
    /// first round.
    fn add_entrants(&mut self, entrants: Vec<Arc<Entrant>>);

    /// Returns the next round of pairings, given the results of the previous
    /// one. An empty list finishes the tournament.
    fn advance_round(&mut self, results: Vec<MatchResult>) -> Vec<MatchSettings>;
}

/// Every entrant plays every other entrant.
///
/// Each pairing is played `games_per_pairing` times; with alternation enabled
/// (the default) the seat order flips between repeats, cancelling the
/// first-move advantage. An odd repeat count with alternation leaves one seat
/// a one-game edge, so prefer an even count for fair rankings.
pub struct RoundRobin {
    games_per_pairing: usize,
    alternate_first_player: bool,
    entrants: Vec<Arc<Entrant>>,
    scheduled: bool,
}

impl RoundRobin {
    /// A round-robin playing each pairing `games_per_pairing` times with
    /// alternating seats.
    pub fn new(games_per_pairing: usize) -> Self {
        assert!(
            games_per_pairing >= 1,
            "must play at least one game per pairing"
        );
        Self {
            games_per_pairing,
            alternate_first_player: true,
            entrants: vec![],
            scheduled: false,
        }
    }

    /// Enables or disables seat alternation between repeats of a pairing.
    #[must_use]
    pub fn with_alternation(mut self, value: bool) -> Self {
        self.alternate_first_player = value;
        self
    }
}

impl TournamentStrategy for RoundRobin {
    fn add_entrants(&mut self, entrants: Vec<Arc<Entrant>>) {
        self.entrants = entrants;
    }

    fn advance_round(&mut self, _results: Vec<MatchResult>) -> Vec<MatchSettings> {
        if self.scheduled {
            // the single round was already played
            return vec![];
        }
        self.scheduled = true;

        let n = self.entrants.len();
        let mut pending = vec![];
        for i in 0..n {
            for j in (i + 1)..n {
                for g in 0..self.games_per_pairing {
                    let flip = self.alternate_first_player && g % 2 == 1;
                    let (first, second) = if flip { (j, i) } else { (i, j) };
                    pending.push(MatchSettings::new(
                        self.entrants[first].clone(),
                        self.entrants[second].clone(),
                    ));
                }
            }
        }
        info!(matches = pending.len(), "round robin scheduled");
        pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::StrategyRegistry;
    use crate::rules::legal_moves;
    use crate::state::GameState;
    use std::time::Duration;

    struct FirstMove;

    impl crate::ai::Strategy for FirstMove {
        fn choose_move(
            &mut self,
            state: &GameState,
            _budget: Duration,
        ) -> Option<crate::board::Move> {
            legal_moves(state).into_iter().next()
        }
    }

    fn three_entrants() -> StrategyRegistry {
        let mut registry = StrategyRegistry::new();
        for name in ["a", "b", "c"] {
            registry.register(name, |_| Box::new(FirstMove)).unwrap();
        }
        registry
    }

    #[test]
    fn all_pairs_play_the_requested_number_of_games() {
        let registry = three_entrants();
        let mut rr = RoundRobin::new(4);
        rr.add_entrants(registry.entrants().to_vec());
        let round = rr.advance_round(vec![]);
        // 3 pairs x 4 games.
        assert_eq!(round.len(), 12);
        // Second call ends the tournament.
        assert!(rr.advance_round(vec![]).is_empty());
    }

    #[test]
    fn repeats_alternate_the_first_player() {
        let registry = three_entrants();
        let mut rr = RoundRobin::new(2);
        rr.add_entrants(registry.entrants().to_vec());
        let round = rr.advance_round(vec![]);
        assert_eq!(round.len(), 6);
        let ab: Vec<_> = round
            .iter()
            .filter(|m| {
                let names: Vec<_> = m.ordered_players.iter().map(|e| e.name.as_str()).collect();
                names.contains(&"a") && names.contains(&"b")
            })
            .collect();
        assert_eq!(ab.len(), 2);
        assert_eq!(ab[0].ordered_players[0].name, "a");
        assert_eq!(ab[1].ordered_players[0].name, "b");
    }

    #[test]
    fn alternation_can_be_disabled() {
        let registry = three_entrants();
        let mut rr = RoundRobin::new(2).with_alternation(false);
        rr.add_entrants(registry.entrants().to_vec());
        let round = rr.advance_round(vec![]);
        let ab_in_order = round
            .iter()
            .filter(|m| {
                m.ordered_players[0].name == "a" && m.ordered_players[1].name == "b"
            })
            .count();
        assert_eq!(ab_in_order, 2);
    }
}
