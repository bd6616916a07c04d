//! The strategy plug-in contract and the entrant registry.
//!
//! Every AI is a [`Strategy`]. Strategies never apply moves themselves; the
//! match runner validates whatever they return and treats an illegal move, a
//! panic, or a blown time budget as a forfeit.
//!
//! Discovery is an explicit registry: callers register a factory under a
//! stable identity string at startup. There is no directory scanning.

use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use anyhow::bail;
use thiserror::Error;

use crate::board::{Move, Player};
use crate::rules::RulesError;
use crate::state::GameState;

/// A decision procedure playing one seat of a match.
///
/// `choose_move` is handed the current state and the time budget for this
/// decision. Returning `None` resigns the game. Implementations must not
/// assume they can exceed the budget: the runner stops waiting once it
/// elapses, and a late answer is a forfeit.
pub trait Strategy: Send {
    /// Picks the next move for the player on turn.
    fn choose_move(&mut self, state: &GameState, budget: Duration) -> Option<Move>;
}

/// Creates a fresh strategy instance for the given seat.
///
/// A new instance is built per match so strategies may keep mutable
/// per-game state without leaking it across matches.
pub type StrategyFactory = Box<dyn Fn(Player) -> Box<dyn Strategy> + Send + Sync>;

/// How a strategy failed during a match.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AiFailure {
    /// The returned move failed rule validation.
    #[error("illegal move: {0}")]
    Illegal(RulesError),
    /// The strategy returned `None` while legal moves existed.
    #[error("resigned with legal moves available")]
    Resigned,
    /// No answer arrived within the time budget.
    #[error("exceeded the time budget")]
    Timeout,
    /// The strategy panicked (its seat thread died).
    #[error("strategy crashed")]
    Crashed,
    /// Applying a validated move still broke a state invariant.
    #[error("state invariant violated: {0}")]
    InvariantViolation(String),
}

/// A registered AI: identity string plus the factory that instantiates it.
pub struct Entrant {
    /// Stable identity used in pairings, logs, and the final report.
    pub name: String,
    pub(crate) id: u32,
    factory: StrategyFactory,
}

impl Entrant {
    pub(crate) fn spawn(&self, seat: Player) -> Box<dyn Strategy> {
        (self.factory)(seat)
    }
}

impl fmt::Debug for Entrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entrant")
            .field("name", &self.name)
            .field("id", &self.id)
            .finish()
    }
}

impl PartialEq for Entrant {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Entrant {}

impl Hash for Entrant {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.id.hash(state);
    }
}

/// Explicit mapping from AI identity strings to strategy factories.
///
/// Populated by [`register`](StrategyRegistry::register) calls at startup and
/// then handed to the arena.
#[derive(Default)]
pub struct StrategyRegistry {
    entrants: Vec<Arc<Entrant>>,
}

impl StrategyRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a strategy factory under `name`.
    ///
    /// # Errors
    /// Fails when `name` is already taken; identities must stay unique so the
    /// report can attribute results.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> anyhow::Result<()>
    where
        F: Fn(Player) -> Box<dyn Strategy> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.entrants.iter().any(|e| e.name == name) {
            bail!("an AI named {name:?} is already registered");
        }
        let id = self.entrants.len() as u32;
        self.entrants.push(Arc::new(Entrant {
            name,
            id,
            factory: Box::new(factory),
        }));
        Ok(())
    }

    /// Looks up a registered entrant by identity, e.g. to pair a single match
    /// by hand.
    pub fn get(&self, name: &str) -> Option<Arc<Entrant>> {
        self.entrants.iter().find(|e| e.name == name).cloned()
    }

    /// Registered identity strings, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.entrants.iter().map(|e| e.name.clone()).collect()
    }

    /// Number of registered AIs.
    pub fn len(&self) -> usize {
        self.entrants.len()
    }

    /// True when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entrants.is_empty()
    }

    pub(crate) fn entrants(&self) -> &[Arc<Entrant>] {
        &self.entrants
    }
}
