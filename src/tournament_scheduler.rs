use tracing::trace;

use crate::match_runner::{MatchResult, MatchSettings};
use crate::tournament_strategy::TournamentStrategy;
use std::mem;

/// Bookkeeping between the strategy (which decides pairings) and the arena
/// (which owns the worker threads): pending matches, a concurrency budget,
/// and round advancement.
pub(crate) struct TournamentScheduler<S: TournamentStrategy> {
    results: Vec<MatchResult>,
    slots: usize,
    pending: Vec<MatchSettings>,
    strategy: S,
    running: usize,
    is_finished: bool,
}

impl<S: TournamentStrategy> TournamentScheduler<S> {
    pub fn new(slots: usize, strategy: S) -> Self {
        TournamentScheduler {
            results: vec![],
            slots,
            pending: vec![],
            running: 0,
            strategy,
            is_finished: false,
        }
    }

    /// Matches to launch now, bounded by the free slots.
    pub fn advance(&mut self) -> Vec<MatchSettings> {
        // Generate a new round if the previous one fully drained.
        if self.running == 0 && self.pending.is_empty() && !self.is_finished {
            trace!("next round");
            self.pending = self.strategy.advance_round(mem::take(&mut self.results));

            if self.pending.is_empty() {
                // no more matches from `strategy`
                trace!("no more matches");
                self.is_finished = true;
            }
        }

        let free = self.slots.saturating_sub(self.running);
        let take = free.min(self.pending.len());
        let matches_to_run: Vec<_> = self.pending.drain(..take).collect();
        self.running += matches_to_run.len();
        matches_to_run
    }

    pub fn on_result(&mut self, result: MatchResult) -> Vec<MatchSettings> {
        self.results.push(result);
        self.running -= 1;
        self.advance()
    }

    /// All tournament matches ran and finished.
    pub fn is_finished(&self) -> bool {
        self.is_finished && self.running == 0
    }
}
