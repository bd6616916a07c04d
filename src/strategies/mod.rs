//! Built-in strategies: a seedable random player, a one-ply greedy player, a
//! depth-limited alpha-beta player, and a channel-fed human proxy for GUIs.

mod greedy;
mod human;
mod minimax;
mod random;

pub use greedy::Greedy;
pub use human::{HumanProxy, MoveSubmitter};
pub use minimax::Minimax;
pub use random::Random;

use crate::ai::StrategyRegistry;

/// Registers the three autonomous built-ins (`random`, `greedy`, `minimax`).
///
/// The human proxy is not included: it needs a live channel endpoint and must
/// be registered by whoever owns the other end.
pub fn register_builtins(registry: &mut StrategyRegistry) -> anyhow::Result<()> {
    registry.register("random", |_seat| Box::new(Random::new()))?;
    registry.register("greedy", |_seat| Box::new(Greedy::new()))?;
    registry.register("minimax", |seat| Box::new(Minimax::new(seat)))?;
    Ok(())
}
