//! Last-write-win conflict resolution.
//!
//! Pure over its inputs; the store commits state and builds the correction
//! message only after the decision is made. Outcomes here are expected,
//! recoverable results of normal operation, never errors.

use std::cmp::Ordering;

use crate::types::Timestamp;

/// What to do with an incoming last-write-win operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Adopt the incoming timestamp and payload (or absence)
    Accept,
    /// Local state wins; answer with a correction carrying the full local
    /// state so the sender converges
    Reject,
    /// States already agree; applying again would change nothing
    Noop,
}

/// Decides an incoming PUT/DELETE against local `(timestamp, bytes)` state.
///
/// `None` payload means a delete; `None` local bytes means the entity is
/// locally absent (possibly a tombstone that kept its clock). At equal
/// timestamps the serialized bytes break the tie ordinally, absence ranking
/// below any payload. The byte-level tie-break is deliberate: every actor
/// reaches the same verdict from content alone, independent of arrival
/// order or actor identity.
pub fn resolve_last_write(
    incoming_timestamp: Timestamp,
    incoming_payload: Option<&[u8]>,
    local_timestamp: Option<Timestamp>,
    local_payload: Option<&[u8]>,
) -> Resolution {
    let Some(local_timestamp) = local_timestamp else {
        return Resolution::Accept;
    };

    if local_timestamp < incoming_timestamp {
        return Resolution::Accept;
    }
    if local_timestamp > incoming_timestamp {
        return Resolution::Reject;
    }

    // Equal clocks. A delete meeting an already-absent entity is the
    // idempotent case and must not produce a correction.
    match local_payload.cmp(&incoming_payload) {
        Ordering::Greater => Resolution::Reject,
        Ordering::Less => Resolution::Accept,
        Ordering::Equal => Resolution::Noop,
    }
}
