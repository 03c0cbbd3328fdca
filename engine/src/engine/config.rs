/// Compile-time knobs for an [`crate::Engine`] instance
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Whether corrections produced while applying inbound messages are
    /// queued for the next outbound flush. Leave on unless a relay in the
    /// topology answers corrections on this actor's behalf.
    pub send_corrections: bool,
    /// Cap applied by [`crate::Engine::define_grow_only`], which does not
    /// name one per registration
    pub default_set_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            send_corrections: true,
            default_set_capacity: 64,
        }
    }
}
