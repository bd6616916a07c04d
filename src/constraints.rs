//! Time limits for strategies and the concurrency budget for the arena.
//!
//! The main entry point is the [`ConstraintsBuilder`], a chainable builder:
//!
//! - **Per-move timeout**: how long a single `choose_move` call may take.
//!   Enforced by the match runner; a late answer is a forfeit.
//! - **Think budget**: total thinking time per player across a whole match.
//! - **Parallel matches**: how many matches the scheduler runs at once.
//!
//! ```
//! use std::time::Duration;
//! use quantik_arena::constraints::ConstraintsBuilder;
//!
//! let limits = ConstraintsBuilder::new()
//!     .with_move_timeout(Duration::from_millis(200))
//!     .with_think_budget(Duration::from_secs(60))
//!     .with_parallel_matches(4)
//!     .build()
//!     .unwrap();
//! ```
//!
//! [`ConstraintsBuilder::from_env()`] reads the same knobs from environment
//! variables for runtime configurability.

use std::{env, time::Duration};

use anyhow::bail;

/// Builder for [`Constraints`].
///
/// By default the per-move timeout is 10 seconds, the per-match think budget
/// is unlimited, and the number of parallel matches equals the number of
/// physical CPUs.
#[derive(Debug, Default)]
pub struct ConstraintsBuilder {
    move_timeout: Option<Duration>,
    think_budget: Option<Duration>,
    parallel_matches: Option<usize>,
}

impl ConstraintsBuilder {
    /// Creates a builder with every limit at its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder configured from environment variables.
    ///
    /// Read environment variables are:
    /// - `QUANTIK_MOVE_TIMEOUT_MS` (u64): per-move timeout in milliseconds
    /// - `QUANTIK_THINK_BUDGET_SECS` (u64): per-player think budget in seconds
    /// - `QUANTIK_PARALLEL_MATCHES` (usize): concurrent match count
    #[must_use]
    pub fn from_env() -> Self {
        fn parse_usize(var: &str) -> Option<usize> {
            env::var(var).ok()?.parse().ok()
        }

        fn parse_duration_millis(var: &str) -> Option<Duration> {
            env::var(var)
                .ok()?
                .parse::<u64>()
                .ok()
                .map(Duration::from_millis)
        }

        fn parse_duration_secs(var: &str) -> Option<Duration> {
            env::var(var)
                .ok()?
                .parse::<u64>()
                .ok()
                .map(Duration::from_secs)
        }

        ConstraintsBuilder {
            move_timeout: parse_duration_millis("QUANTIK_MOVE_TIMEOUT_MS"),
            think_budget: parse_duration_secs("QUANTIK_THINK_BUDGET_SECS"),
            parallel_matches: parse_usize("QUANTIK_PARALLEL_MATCHES"),
        }
    }

    /// Sets the maximum duration allowed for a single `choose_move` call.
    ///
    /// Exceeding it forfeits the match; the runner stops waiting at the
    /// deadline rather than hanging on a stuck strategy.
    #[must_use]
    pub fn with_move_timeout(self, duration: Duration) -> Self {
        Self {
            move_timeout: Some(duration),
            ..self
        }
    }

    /// Sets the total allowed thinking time for a player across one match.
    ///
    /// Acts as a clock budget: once a player's accumulated think time exceeds
    /// it, they forfeit on time.
    #[must_use]
    pub fn with_think_budget(self, duration: Duration) -> Self {
        Self {
            think_budget: Some(duration),
            ..self
        }
    }

    /// Sets how many matches the scheduler may run concurrently.
    #[must_use]
    pub fn with_parallel_matches(self, count: usize) -> Self {
        Self {
            parallel_matches: Some(count),
            ..self
        }
    }

    /// Consumes the builder and returns the constructed [`Constraints`].
    ///
    /// # Errors
    /// Returns an error when a limit is impossible (zero-duration timeout or
    /// zero parallel matches).
    pub fn build(self) -> anyhow::Result<Constraints> {
        let move_timeout = self.move_timeout.unwrap_or(Duration::from_secs(10));
        if move_timeout.is_zero() {
            bail!("move timeout must be non-zero");
        }
        let think_budget = self.think_budget.unwrap_or(Duration::MAX);
        if think_budget < move_timeout {
            bail!(
                "think budget ({think_budget:?}) is smaller than a single move timeout ({move_timeout:?})"
            );
        }
        let parallel_matches = self
            .parallel_matches
            .unwrap_or_else(|| num_cpus::get_physical().max(1));
        if parallel_matches == 0 {
            bail!("at least one parallel match is required");
        }
        Ok(Constraints {
            move_timeout,
            think_budget,
            parallel_matches,
        })
    }
}

/// Obtained using [`ConstraintsBuilder`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Constraints {
    pub(crate) move_timeout: Duration,
    pub(crate) think_budget: Duration,
    pub(crate) parallel_matches: usize,
}

impl Constraints {
    /// Creates a [`ConstraintsBuilder`].
    pub fn builder() -> ConstraintsBuilder {
        ConstraintsBuilder::new()
    }

    /// The per-move timeout handed to strategies as their budget.
    pub fn move_timeout(&self) -> Duration {
        self.move_timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let limits = ConstraintsBuilder::new().build().unwrap();
        assert_eq!(limits.move_timeout, Duration::from_secs(10));
        assert!(limits.parallel_matches >= 1);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let res = ConstraintsBuilder::new()
            .with_move_timeout(Duration::ZERO)
            .build();
        assert!(res.is_err());
    }

    #[test]
    fn budget_smaller_than_one_move_is_rejected() {
        let res = ConstraintsBuilder::new()
            .with_move_timeout(Duration::from_secs(5))
            .with_think_budget(Duration::from_secs(1))
            .build();
        assert!(res.is_err());
    }
}
