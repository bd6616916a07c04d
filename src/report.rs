//! Aggregated tournament results: per-AI win/draw/loss/error counts, timing,
//! and the ranked final standings.
//!
//! The report is the append-only accumulator of the tournament: one
//! [`record`](TournamentReport::record) call per finished match. Failures are
//! first-class: a buggy AI shows up with its error count, not just zeros.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use crate::board::Player;
use crate::match_runner::MatchResult;

/// Aggregate statistics for one AI across all its matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AiStats {
    /// Matches won, including wins by the opponent's forfeit.
    pub wins: u32,
    /// Drawn matches.
    pub draws: u32,
    /// Matches lost, including own forfeits.
    pub losses: u32,
    /// Forfeits caused: illegal moves, resignations, timeouts, crashes,
    /// invariant violations.
    pub errors: u32,
    /// Matches played.
    pub matches: u32,
    /// Total time spent choosing moves.
    pub think_time: Duration,
    /// Slowest single decision across all matches.
    pub slowest_move: Duration,
    /// Moves actually applied to a board.
    pub moves_played: u32,
}

impl AiStats {
    /// Ranking score: two points per win, one per draw.
    pub fn score(&self) -> u32 {
        self.wins * 2 + self.draws
    }

    /// Mean time per applied move, or zero before the first move.
    pub fn mean_move_time(&self) -> Duration {
        if self.moves_played == 0 {
            Duration::ZERO
        } else {
            self.think_time / self.moves_played
        }
    }
}

impl fmt::Display for AiStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "win: {}, draw: {}, lose: {}, errors: {}, mean move: {:?}",
            self.wins,
            self.draws,
            self.losses,
            self.errors,
            self.mean_move_time()
        )
    }
}

/// The tournament accumulator: AI identity to [`AiStats`], plus every
/// individual [`MatchResult`] for diagnosis.
///
/// Serialization of the report is left to the caller; the shape (identity to
/// aggregate stats) is the contract.
#[derive(Default)]
pub struct TournamentReport {
    stats: HashMap<String, AiStats>,
    matches: Vec<MatchResult>,
}

impl TournamentReport {
    /// An empty report pre-seeded with every entrant, so AIs that never
    /// finish a match still appear in the standings.
    pub fn with_entrants(names: impl IntoIterator<Item = String>) -> Self {
        let mut report = Self::default();
        for name in names {
            report.stats.entry(name).or_default();
        }
        report
    }

    /// Folds one finished match into the aggregates. One call per match.
    pub fn record(&mut self, result: MatchResult) {
        for seat in [Player::One, Player::Two] {
            let entrant = result.entrant(seat);
            let timing = result.seats[seat.index()];
            let stats = self.stats.entry(entrant.name.clone()).or_default();
            stats.matches += 1;
            stats.think_time += timing.think_time;
            stats.slowest_move = stats.slowest_move.max(timing.slowest_move);
            stats.moves_played += timing.moves;
            match result.winner {
                Some(w) if w == seat => stats.wins += 1,
                Some(_) => stats.losses += 1,
                None => stats.draws += 1,
            }
            if result.offender == Some(seat) {
                stats.errors += 1;
            }
        }
        self.matches.push(result);
    }

    /// Stats for one AI, if it was part of the tournament.
    pub fn stats(&self, name: &str) -> Option<&AiStats> {
        self.stats.get(name)
    }

    /// All recorded matches, in completion order.
    pub fn matches(&self) -> &[MatchResult] {
        &self.matches
    }

    /// Standings sorted by score (descending), errors (ascending), then name.
    pub fn ranking(&self) -> Vec<(&str, &AiStats)> {
        let mut ranked: Vec<(&str, &AiStats)> = self
            .stats
            .iter()
            .map(|(name, stats)| (name.as_str(), stats))
            .collect();
        ranked.sort_by(|a, b| {
            b.1.score()
                .cmp(&a.1.score())
                .then(a.1.errors.cmp(&b.1.errors))
                .then(a.0.cmp(b.0))
        });
        ranked
    }
}

impl fmt::Display for TournamentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (rank, (name, stats)) in self.ranking().into_iter().enumerate() {
            writeln!(f, "{}. {name}: {stats}", rank + 1)?;
        }
        Ok(())
    }
}
