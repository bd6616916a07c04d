//! The tournament orchestrator.
//!
//! An [`Arena`] takes a populated [`StrategyRegistry`], a
//! [`TournamentStrategy`] deciding the pairings, and the [`Constraints`], then
//! plays the whole tournament: matches run on worker threads (bounded by the
//! parallel-match limit), results flow back over a channel, and the final
//! [`TournamentReport`] aggregates per-AI standings.
//!
//! One crashing or misbehaving AI never takes the tournament down; its
//! matches end as forfeits and everyone else keeps playing.
//!
//! # Example
//!
//! See the crate-level documentation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread;

use anyhow::bail;
use tracing::{info, trace};

use crate::ai::StrategyRegistry;
use crate::config::Configuration;
use crate::constraints::Constraints;
use crate::logger::init_logger;
use crate::match_runner::{run_match, MatchResult, MatchSettings};
use crate::report::TournamentReport;
use crate::tournament_scheduler::TournamentScheduler;
use crate::tournament_strategy::TournamentStrategy;

/// Cooperative tournament abort.
///
/// Clone it, hand one copy to [`Arena::run_with_abort`], keep the other, and
/// call [`trigger`](AbortSignal::trigger) from any thread (a ctrl-c handler,
/// a deadline watchdog). Matches already in flight play out and are recorded;
/// no new matches start afterwards.
#[derive(Clone, Default)]
pub struct AbortSignal(Arc<AtomicBool>);

impl AbortSignal {
    /// A signal in the not-aborted state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests the abort. Idempotent.
    pub fn trigger(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// True once [`trigger`](Self::trigger) was called.
    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Plays tournaments between registered AIs.
pub struct Arena {
    config: Configuration,
    limits: Constraints,
}

impl Arena {
    /// Creates an arena with the given behavior flags and limits.
    pub fn new(config: Configuration, limits: Constraints) -> Self {
        if config.log {
            init_logger();
        }
        trace!(?config, ?limits);
        Arena { config, limits }
    }

    /// Runs a full tournament and returns the aggregated report.
    ///
    /// # Errors
    /// Fails when fewer than two AIs are registered.
    pub fn run<T: TournamentStrategy>(
        &self,
        registry: &StrategyRegistry,
        strategy: T,
    ) -> anyhow::Result<TournamentReport> {
        self.run_with_abort(registry, strategy, AbortSignal::new())
    }

    /// Like [`run`](Self::run), but stops scheduling new matches once `abort`
    /// triggers. The partial report covers every match that finished.
    pub fn run_with_abort<T: TournamentStrategy>(
        &self,
        registry: &StrategyRegistry,
        mut strategy: T,
        abort: AbortSignal,
    ) -> anyhow::Result<TournamentReport> {
        if registry.len() < 2 {
            bail!(
                "a tournament needs at least two registered AIs, got {}",
                registry.len()
            );
        }

        strategy.add_entrants(registry.entrants().to_vec());
        let mut scheduler = TournamentScheduler::new(self.limits.parallel_matches, strategy);
        let mut report = TournamentReport::with_entrants(registry.names());
        let (tx_result, rx_result) = mpsc::channel();

        let mut in_flight = 0usize;
        for settings in scheduler.advance() {
            self.launch_match(settings, tx_result.clone());
            in_flight += 1;
        }

        while in_flight > 0 {
            // in flight > 0 <=> a result will arrive
            let result: MatchResult = rx_result.recv().expect("worker threads hold a sender");
            in_flight -= 1;
            if self.config.verbose {
                print_match_result(&result);
            }
            let newly = if abort.is_aborted() {
                vec![]
            } else {
                scheduler.on_result(result.clone())
            };
            report.record(result);
            for settings in newly {
                self.launch_match(settings, tx_result.clone());
                in_flight += 1;
            }
        }

        if abort.is_aborted() {
            info!(recorded = report.matches().len(), "tournament aborted");
        } else {
            info!(recorded = report.matches().len(), "tournament finished");
        }
        Ok(report)
    }

    fn launch_match(&self, settings: MatchSettings, tx_result: Sender<MatchResult>) {
        trace!(%settings, "launching match");
        let limits = self.limits.clone();
        thread::spawn(move || {
            let result = run_match(settings, &limits);
            // The receiver only disappears after the main loop counted us out.
            let _ = tx_result.send(result);
        });
    }
}

fn print_match_result(result: &MatchResult) {
    let settings = MatchSettings {
        ordered_players: result.players.clone(),
    };
    // green match, default reason, red offender
    match result.winning_entrant() {
        Some(winner) => println!(
            "\x1b[32m{settings}:\x1b[39m {} wins ({})",
            winner.name, result.reason
        ),
        None => println!("\x1b[32m{settings}:\x1b[39m {}", result.reason),
    }
    if let Some(offender) = result.offender {
        println!(
            "  \x1b[31moffender: {}\x1b[39m",
            result.entrant(offender).name
        );
    }
}
