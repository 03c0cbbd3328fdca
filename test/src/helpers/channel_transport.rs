use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

use concord_engine::{SendError, Transport};

/// An in-process transport endpoint backed by an unbounded channel. The
/// engine pushes batches in; the owning test drains the receiver and feeds
/// the peer engine, which is exactly the push-based byte contract real
/// socket transports implement.
pub struct ChannelTransport {
    name: String,
    sender: Sender<Vec<u8>>,
    gate: Arc<AtomicBool>,
}

impl ChannelTransport {
    /// Builds one endpoint: the transport to register with an engine, the
    /// receiver carrying everything it sends, and a gate that toggles the
    /// transport's `filter()` from outside
    pub fn endpoint(name: &str) -> (ChannelTransport, Receiver<Vec<u8>>, Arc<AtomicBool>) {
        let (sender, receiver) = channel();
        let gate = Arc::new(AtomicBool::new(true));
        (
            ChannelTransport {
                name: name.to_string(),
                sender,
                gate: gate.clone(),
            },
            receiver,
            gate,
        )
    }
}

impl Transport for ChannelTransport {
    fn name(&self) -> &str {
        &self.name
    }

    fn filter(&self) -> bool {
        self.gate.load(Ordering::Relaxed)
    }

    fn send(&mut self, payload: &[u8]) -> Result<(), SendError> {
        self.sender.send(payload.to_vec()).map_err(|_| SendError)
    }
}
