//! An arena for Quantik AIs: the full rules engine, a strategy plug-in
//! contract, a forfeit-enforcing match runner, and a parallel round-robin
//! tournament scheduler.
//!
//! Quantik is a 4x4 abstract game. Each player owns eight pieces, one of each
//! shape and size combination. A piece may not be placed in a row, column, or
//! 2x2 zone where the *opponent* already has the same shape; the first player
//! to complete any row, column, or zone with four distinct shapes wins,
//! regardless of who owns them.
//!
//! # Quick start
//!
//! ```no_run
//! use std::time::Duration;
//! use quantik_arena::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut registry = StrategyRegistry::new();
//!     quantik_arena::strategies::register_builtins(&mut registry)?;
//!
//!     let limits = ConstraintsBuilder::new()
//!         .with_move_timeout(Duration::from_millis(500))
//!         .build()?;
//!     let arena = Arena::new(Configuration::new(), limits);
//!     let report = arena.run(&registry, RoundRobin::new(20))?;
//!     println!("{report}");
//!     Ok(())
//! }
//! ```
//!
//! # Writing an AI
//!
//! Implement [`Strategy`](ai::Strategy) and register a factory for it:
//!
//! ```
//! use std::time::Duration;
//! use quantik_arena::prelude::*;
//! use quantik_arena::rules::legal_moves;
//!
//! struct FirstLegal;
//!
//! impl Strategy for FirstLegal {
//!     fn choose_move(&mut self, state: &GameState, _budget: Duration) -> Option<Move> {
//!         legal_moves(state).into_iter().next()
//!     }
//! }
//!
//! let mut registry = StrategyRegistry::new();
//! registry.register("first-legal", |_seat| Box::new(FirstLegal)).unwrap();
//! ```
//!
//! The runner never trusts a strategy: every returned move is validated, and
//! an illegal move, a timeout, a resignation, or a panic forfeits the match
//! to the opponent while the rest of the tournament keeps running.

#![warn(missing_docs)]

pub mod ai;
pub mod arena;
pub mod board;
pub mod config;
pub mod constraints;
pub mod match_runner;
pub mod report;
pub mod rules;
pub mod state;
pub mod strategies;
pub mod tournament_strategy;

mod logger;
mod tournament_scheduler;

/// The types most callers need, in one import.
pub mod prelude {
    pub use crate::ai::{AiFailure, Strategy, StrategyRegistry};
    pub use crate::arena::{AbortSignal, Arena};
    pub use crate::board::{Board, Cell, Move, Piece, Player, Shape, Size};
    pub use crate::config::Configuration;
    pub use crate::constraints::{Constraints, ConstraintsBuilder};
    pub use crate::match_runner::{run_match, EndReason, MatchResult, MatchSettings};
    pub use crate::report::{AiStats, TournamentReport};
    pub use crate::rules::Outcome;
    pub use crate::state::GameState;
    pub use crate::tournament_strategy::{RoundRobin, TournamentStrategy};
}
