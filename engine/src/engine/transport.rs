//! The byte-level contract between an engine and whatever carries its
//! messages. The engine never manages sockets: outbound batches go through
//! [`Transport::send`], inbound bytes arrive via [`crate::Engine::receive`]
//! called by the transport's owner. Fire and forget: loss, duplication and
//! reordering are all tolerated by the conflict rules, so a failed send is
//! logged and dropped, never retried here.

pub struct SendError;

pub trait Transport {
    /// Identifying name for diagnostics
    fn name(&self) -> &str;

    /// Gate on sendability; a transport that returns `false` is skipped for
    /// the current batch and asked again next tick
    fn filter(&self) -> bool {
        true
    }

    /// Hands one encoded batch of wire messages to the transport
    fn send(&mut self, payload: &[u8]) -> Result<(), SendError>;
}
