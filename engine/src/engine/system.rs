use crate::types::Tick;
use crate::world::world::World;

/// Whether a system stays registered after the current pass
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SystemOutcome {
    Continue,
    /// Remove this system; takes effect within the current tick
    Detach,
}

/// A unit of per-tick game/host logic. Systems run once per tick in
/// priority order (lowest number first) and mutate component values through
/// the store APIs, which is what marks entities dirty for replication.
pub trait System {
    /// Identifying name for diagnostics
    fn name(&self) -> &str;

    fn priority(&self) -> i32 {
        0
    }

    fn run(&mut self, world: &mut World, tick: Tick) -> SystemOutcome;
}
