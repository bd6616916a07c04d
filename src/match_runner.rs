//! Runs one full match between two registered strategies.
//!
//! Each seat gets its own thread; the runner talks to it over channels and
//! waits with `recv_timeout`, so a stuck or slow strategy costs its owner the
//! match instead of hanging the tournament. Every returned move goes through
//! the rules engine before being applied; there is no trusted path.

use std::fmt;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, trace, warn};

use crate::ai::{AiFailure, Entrant};
use crate::board::{Move, Player};
use crate::constraints::Constraints;
use crate::rules::{is_legal, outcome, winning_group, Outcome};
use crate::state::GameState;

/// One scheduled match: who plays seat 1 and who plays seat 2.
#[derive(Clone)]
pub struct MatchSettings {
    /// Seat order; index 0 moves first.
    pub ordered_players: [Arc<Entrant>; 2],
}

impl MatchSettings {
    /// Pairs two entrants; `first` takes the opening move.
    pub fn new(first: Arc<Entrant>, second: Arc<Entrant>) -> Self {
        Self {
            ordered_players: [first, second],
        }
    }
}

impl PartialEq for MatchSettings {
    fn eq(&self, other: &Self) -> bool {
        self.ordered_players == other.ordered_players
    }
}

impl fmt::Display for MatchSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} VS {}",
            self.ordered_players[0].name, self.ordered_players[1].name
        )
    }
}

/// Why a match ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndReason {
    /// A row, column, or zone was completed with four distinct shapes.
    FourShapes,
    /// Sixteen pieces on the board and no winning group.
    BoardFull,
    /// The player on turn had pieces left but no legal move.
    Stalemate,
    /// A strategy failed; the opponent is credited with the win.
    Forfeit(AiFailure),
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndReason::FourShapes => write!(f, "four distinct shapes"),
            EndReason::BoardFull => write!(f, "draw (board full)"),
            EndReason::Stalemate => write!(f, "stalemate"),
            EndReason::Forfeit(failure) => write!(f, "forfeit ({failure})"),
        }
    }
}

/// Per-seat timing collected during a match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeatReport {
    /// Total time spent inside `choose_move`.
    pub think_time: Duration,
    /// The single slowest decision.
    pub slowest_move: Duration,
    /// Moves actually applied for this seat.
    pub moves: u32,
}

/// The outcome of one finished match.
#[derive(Debug, Clone)]
pub struct MatchResult {
    /// Seat order of the match, index 0 moved first.
    pub players: [Arc<Entrant>; 2],
    /// Winning seat, or `None` for a draw.
    pub winner: Option<Player>,
    /// How the match ended.
    pub reason: EndReason,
    /// Total moves applied to the board.
    pub moves: u32,
    /// Per-seat timing.
    pub seats: [SeatReport; 2],
    /// The seat that caused a forfeit or invariant violation, if any.
    pub offender: Option<Player>,
}

impl MatchResult {
    /// The entrant sitting at `seat`.
    pub fn entrant(&self, seat: Player) -> &Arc<Entrant> {
        &self.players[seat.index()]
    }

    /// The winning entrant, if the match was not a draw.
    pub fn winning_entrant(&self) -> Option<&Arc<Entrant>> {
        self.winner.map(|p| self.entrant(p))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    NotStarted,
    InProgress,
    Finished,
}

/// Drives a single match through `NotStarted -> InProgress -> Finished`.
pub struct MatchRunner {
    settings: MatchSettings,
    phase: Phase,
}

impl MatchRunner {
    /// Prepares a runner; nothing happens until [`run`](Self::run).
    pub fn new(settings: MatchSettings) -> Self {
        Self {
            settings,
            phase: Phase::NotStarted,
        }
    }

    /// True once the match has produced its result.
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    /// Plays the match to completion and returns its result.
    ///
    /// A strategy failure never escapes as a panic or error: illegal moves,
    /// resignations, timeouts, crashes, and invariant violations all become a
    /// forfeit result crediting the opponent. No retries: one bad move ends
    /// the match.
    pub fn run(&mut self, limits: &Constraints) -> MatchResult {
        assert_eq!(self.phase, Phase::NotStarted, "a match runs only once");
        self.phase = Phase::InProgress;
        trace!(%self.settings, "match started");

        let seats = [
            spawn_seat(self.settings.ordered_players[0].clone(), Player::One),
            spawn_seat(self.settings.ordered_players[1].clone(), Player::Two),
        ];
        let mut reports = [SeatReport::default(); 2];
        let mut state = GameState::initial();

        let (winner, reason, offender) = loop {
            match outcome(&state) {
                Outcome::Win(p) => {
                    let reason = if winning_group(&state).is_some() {
                        EndReason::FourShapes
                    } else {
                        EndReason::Stalemate
                    };
                    break (Some(p), reason, None);
                }
                Outcome::Draw => break (None, EndReason::BoardFull, None),
                Outcome::Ongoing => {}
            }

            let mover = state.to_move();
            let idx = mover.index();
            let remaining = limits
                .think_budget
                .checked_sub(reports[idx].think_time)
                .unwrap_or(Duration::ZERO);
            let budget = limits.move_timeout.min(remaining);
            if budget.is_zero() {
                break forfeit(mover, AiFailure::Timeout, &self.settings);
            }

            if seats[idx].request.send((state.clone(), budget)).is_err() {
                break forfeit(mover, AiFailure::Crashed, &self.settings);
            }
            let asked = Instant::now();
            let reply = seats[idx].response.recv_timeout(budget);
            let elapsed = asked.elapsed();
            reports[idx].think_time += elapsed;
            reports[idx].slowest_move = reports[idx].slowest_move.max(elapsed);

            let mv = match reply {
                Err(RecvTimeoutError::Timeout) => {
                    break forfeit(mover, AiFailure::Timeout, &self.settings)
                }
                Err(RecvTimeoutError::Disconnected) => {
                    break forfeit(mover, AiFailure::Crashed, &self.settings)
                }
                Ok(None) => break forfeit(mover, AiFailure::Resigned, &self.settings),
                Ok(Some(mv)) => mv,
            };

            if let Err(e) = is_legal(&state, &mv) {
                break forfeit(mover, AiFailure::Illegal(e), &self.settings);
            }
            state = match state.apply(mv) {
                Ok(next) => next,
                Err(e) => {
                    break forfeit(
                        mover,
                        AiFailure::InvariantViolation(e.to_string()),
                        &self.settings,
                    )
                }
            };
            reports[idx].moves += 1;
            trace!(%mv, "move applied");
        };

        // Closing the channels lets well-behaved seat threads exit. A
        // strategy stuck in a loop leaves its thread behind; threads cannot
        // be killed from outside.
        drop(seats);

        self.phase = Phase::Finished;
        let result = MatchResult {
            players: self.settings.ordered_players.clone(),
            winner,
            reason,
            moves: state.history().len() as u32,
            seats: reports,
            offender,
        };
        info!(
            settings = %self.settings,
            reason = %result.reason,
            winner = result.winning_entrant().map(|e| e.name.as_str()),
            moves = result.moves,
            "match finished"
        );
        result
    }
}

/// Convenience wrapper: builds a [`MatchRunner`] and plays the match.
pub fn run_match(settings: MatchSettings, limits: &Constraints) -> MatchResult {
    MatchRunner::new(settings).run(limits)
}

fn forfeit(
    offender: Player,
    failure: AiFailure,
    settings: &MatchSettings,
) -> (Option<Player>, EndReason, Option<Player>) {
    warn!(
        settings = %settings,
        offender = settings.ordered_players[offender.index()].name,
        %failure,
        "forfeit"
    );
    (
        Some(offender.opponent()),
        EndReason::Forfeit(failure),
        Some(offender),
    )
}

struct SeatHandle {
    request: Sender<(GameState, Duration)>,
    response: Receiver<Option<Move>>,
}

// One thread per seat: the strategy is instantiated inside it so a panicking
// factory shows up as a dead channel, not a dead runner.
fn spawn_seat(entrant: Arc<Entrant>, seat: Player) -> SeatHandle {
    let (request, incoming) = mpsc::channel::<(GameState, Duration)>();
    let (outgoing, response) = mpsc::channel();
    let name = format!("seat-{}", entrant.name);
    thread::Builder::new()
        .name(name)
        .spawn(move || {
            let mut strategy = entrant.spawn(seat);
            while let Ok((state, budget)) = incoming.recv() {
                let mv = strategy.choose_move(&state, budget);
                if outgoing.send(mv).is_err() {
                    break;
                }
            }
        })
        .expect("could not spawn seat thread");
    SeatHandle { request, response }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{Strategy, StrategyRegistry};
    use crate::board::{Cell, Piece, Shape, Size};
    use crate::constraints::ConstraintsBuilder;
    use crate::rules::legal_moves;
    use crate::strategies::Random;

    struct AlwaysOccupied;

    impl Strategy for AlwaysOccupied {
        fn choose_move(&mut self, state: &GameState, _budget: Duration) -> Option<Move> {
            // First move is fine; afterwards aim at the first occupied cell.
            if let Some(last) = state.last_move() {
                return Some(Move {
                    piece: Piece {
                        shape: Shape::Circle,
                        size: Size::Small,
                        owner: state.to_move(),
                    },
                    cell: last.cell,
                });
            }
            legal_moves(state).into_iter().next()
        }
    }

    struct Sleeper(Duration);

    impl Strategy for Sleeper {
        fn choose_move(&mut self, state: &GameState, _budget: Duration) -> Option<Move> {
            thread::sleep(self.0);
            legal_moves(state).into_iter().next()
        }
    }

    struct Panics;

    impl Strategy for Panics {
        fn choose_move(&mut self, _state: &GameState, _budget: Duration) -> Option<Move> {
            panic!("boom");
        }
    }

    struct GivesUp;

    impl Strategy for GivesUp {
        fn choose_move(&mut self, _state: &GameState, _budget: Duration) -> Option<Move> {
            None
        }
    }

    fn settings_for(registry: &StrategyRegistry, a: &str, b: &str) -> MatchSettings {
        MatchSettings::new(
            registry.get(a).unwrap(),
            registry.get(b).unwrap(),
        )
    }

    fn quick_limits() -> Constraints {
        ConstraintsBuilder::new()
            .with_move_timeout(Duration::from_millis(100))
            .build()
            .unwrap()
    }

    #[test]
    fn random_vs_random_reaches_a_terminal_state() {
        let mut registry = StrategyRegistry::new();
        registry
            .register("r1", |_| Box::new(Random::seeded(1)))
            .unwrap();
        registry
            .register("r2", |_| Box::new(Random::seeded(2)))
            .unwrap();
        let result = run_match(
            settings_for(&registry, "r1", "r2"),
            &ConstraintsBuilder::new().build().unwrap(),
        );
        assert!(result.moves <= 16);
        match result.reason {
            EndReason::FourShapes | EndReason::BoardFull | EndReason::Stalemate => {}
            EndReason::Forfeit(f) => panic!("random play should not forfeit: {f}"),
        }
        assert!(result.offender.is_none());
    }

    #[test]
    fn illegal_move_forfeits_to_the_opponent() {
        let mut registry = StrategyRegistry::new();
        registry
            .register("cheater", |_| Box::new(AlwaysOccupied))
            .unwrap();
        registry
            .register("honest", |_| Box::new(Random::seeded(3)))
            .unwrap();
        let result = run_match(settings_for(&registry, "cheater", "honest"), &quick_limits());
        assert!(matches!(
            result.reason,
            EndReason::Forfeit(AiFailure::Illegal(_))
        ));
        assert_eq!(result.offender, Some(Player::One));
        assert_eq!(result.winner, Some(Player::Two));
        assert_eq!(result.winning_entrant().unwrap().name, "honest");
    }

    #[test]
    fn late_reply_is_a_timeout_forfeit() {
        let mut registry = StrategyRegistry::new();
        registry
            .register("slow", |_| Box::new(Sleeper(Duration::from_millis(300))))
            .unwrap();
        registry
            .register("fast", |_| Box::new(Random::seeded(4)))
            .unwrap();
        let start = Instant::now();
        let result = run_match(settings_for(&registry, "slow", "fast"), &quick_limits());
        assert_eq!(result.reason, EndReason::Forfeit(AiFailure::Timeout));
        assert_eq!(result.offender, Some(Player::One));
        // The match ends at the deadline, not when the sleeper wakes up... but
        // give the thread machinery slack.
        assert!(start.elapsed() < Duration::from_millis(290));
    }

    #[test]
    fn panicking_strategy_forfeits_as_crashed() {
        let mut registry = StrategyRegistry::new();
        registry.register("bomb", |_| Box::new(Panics)).unwrap();
        registry
            .register("calm", |_| Box::new(Random::seeded(5)))
            .unwrap();
        let result = run_match(settings_for(&registry, "bomb", "calm"), &quick_limits());
        assert_eq!(result.reason, EndReason::Forfeit(AiFailure::Crashed));
        assert_eq!(result.winner, Some(Player::Two));
    }

    #[test]
    fn resignation_with_moves_available_forfeits() {
        let mut registry = StrategyRegistry::new();
        registry.register("quitter", |_| Box::new(GivesUp)).unwrap();
        registry
            .register("steady", |_| Box::new(Random::seeded(6)))
            .unwrap();
        let result = run_match(settings_for(&registry, "quitter", "steady"), &quick_limits());
        assert_eq!(result.reason, EndReason::Forfeit(AiFailure::Resigned));
        assert_eq!(result.offender, Some(Player::One));
    }

    #[test]
    fn think_budget_exhaustion_forfeits_on_time() {
        let mut registry = StrategyRegistry::new();
        registry
            .register("grinder", |_| Box::new(Sleeper(Duration::from_millis(40))))
            .unwrap();
        registry
            .register("brisk", |_| Box::new(Random::seeded(7)))
            .unwrap();
        let limits = ConstraintsBuilder::new()
            .with_move_timeout(Duration::from_millis(80))
            .with_think_budget(Duration::from_millis(100))
            .build()
            .unwrap();
        let result = run_match(settings_for(&registry, "grinder", "brisk"), &limits);
        assert_eq!(result.reason, EndReason::Forfeit(AiFailure::Timeout));
        assert_eq!(result.offender, Some(Player::One));
    }
}
