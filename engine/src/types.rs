pub type Tick = u32;

/// A per-entity-per-component Lamport clock value. Logical, never
/// wall-clock; bumped by exactly 1 each time a local mutation is flushed.
pub type Timestamp = u32;
