use std::sync::atomic::AtomicBool;
use std::sync::mpsc::Receiver;
use std::sync::Arc;

use concord_engine::{ComponentKind, Engine, EngineConfig, Entity, Timestamp};

use super::channel_transport::ChannelTransport;
use super::test_protocol::{register_components, TestProtocol};

/// Two engines wired back-to-back over channel transports, the smallest
/// topology that exercises the full emit/apply/correct cycle
pub struct ActorPair {
    pub left: Engine,
    pub right: Engine,
    pub protocol: TestProtocol,
    pub left_gate: Arc<AtomicBool>,
    pub right_gate: Arc<AtomicBool>,
    left_outbox: Receiver<Vec<u8>>,
    right_outbox: Receiver<Vec<u8>>,
}

impl ActorPair {
    pub fn new() -> Self {
        let mut left = Engine::new(EngineConfig::default());
        let mut right = Engine::new(EngineConfig::default());

        let protocol = register_components(&mut left);
        register_components(&mut right);

        let (left_transport, left_outbox, left_gate) = ChannelTransport::endpoint("left");
        let (right_transport, right_outbox, right_gate) = ChannelTransport::endpoint("right");
        left.register_transport(Box::new(left_transport));
        right.register_transport(Box::new(right_transport));

        Self {
            left,
            right,
            protocol,
            left_gate,
            right_gate,
            left_outbox,
            right_outbox,
        }
    }

    pub fn tick_both(&mut self) {
        self.left.tick().expect("left tick");
        self.right.tick().expect("right tick");
    }

    /// Drains everything the left engine has sent without delivering it
    pub fn drain_left(&mut self) -> Vec<Vec<u8>> {
        self.left_outbox.try_iter().collect()
    }

    pub fn drain_right(&mut self) -> Vec<Vec<u8>> {
        self.right_outbox.try_iter().collect()
    }

    /// Delivers every pending batch in both directions, in send order
    pub fn deliver(&mut self) {
        for payload in self.left_outbox.try_iter() {
            self.right.receive(&payload);
        }
        for payload in self.right_outbox.try_iter() {
            self.left.receive(&payload);
        }
    }

    /// Ticks and delivers until both sides go quiet (or the round limit
    /// runs out, which a convergence test should treat as failure)
    pub fn settle(&mut self, max_rounds: usize) -> bool {
        for _ in 0..max_rounds {
            self.tick_both();
            let left_pending: Vec<Vec<u8>> = self.left_outbox.try_iter().collect();
            let right_pending: Vec<Vec<u8>> = self.right_outbox.try_iter().collect();
            if left_pending.is_empty() && right_pending.is_empty() {
                return true;
            }
            for payload in left_pending {
                self.right.receive(&payload);
            }
            for payload in right_pending {
                self.left.receive(&payload);
            }
        }
        false
    }

    /// The `(timestamp, serialized bytes)` pair convergence is defined over
    pub fn lww_state(
        engine: &Engine,
        kind: ComponentKind,
        entity: Entity,
    ) -> (Option<Timestamp>, Option<Vec<u8>>) {
        let store = engine.world().last_write_win(kind).expect("lww store");
        let payload = store
            .get(entity)
            .map(|value| store.schema().to_payload(value).expect("serializable value"));
        (store.clock(entity), payload)
    }

    pub fn assert_lww_converged(&self, kind: ComponentKind, entity: Entity) {
        let left = Self::lww_state(&self.left, kind, entity);
        let right = Self::lww_state(&self.right, kind, entity);
        assert_eq!(
            left, right,
            "actors diverged on entity {entity} component {kind}"
        );
    }
}

impl Default for ActorPair {
    fn default() -> Self {
        Self::new()
    }
}
