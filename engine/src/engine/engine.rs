use log::{debug, warn};

use concord_serde::{ByteBuffer, Schema, Value};

use crate::engine::config::EngineConfig;
use crate::engine::error::EngineError;
use crate::engine::system::{System, SystemOutcome};
use crate::engine::transport::Transport;
use crate::messages::codec::{read_all_messages, write_all_messages};
use crate::messages::wire::WireMessage;
use crate::types::Tick;
use crate::world::component::ComponentKind;
use crate::world::entity::Entity;
use crate::world::error::EntityError;
use crate::world::store::error::StoreError;
use crate::world::store::StoreSettings;
use crate::world::world::World;

/// One actor's single-threaded cooperative replication loop.
///
/// A tick applies everything received since the previous tick, runs the
/// registered systems in priority order, drains every store's dirty set
/// into wire messages and fans the encoded batch out to every transport
/// whose filter allows sending. Concurrency across actors happens only by
/// message passing; nothing here is shared between engine instances.
pub struct Engine {
    config: EngineConfig,
    world: World,
    systems: Vec<Box<dyn System>>,
    transports: Vec<Box<dyn Transport>>,
    inbound: Vec<Vec<u8>>,
    outbound: Vec<WireMessage>,
    tick: Tick,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            world: World::new(),
            systems: Vec::new(),
            transports: Vec::new(),
            inbound: Vec::new(),
            outbound: Vec::new(),
            tick: 0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn current_tick(&self) -> Tick {
        self.tick
    }

    /// Registers a system; the ordering by priority is re-established on
    /// every registration, ties run in registration order
    pub fn register_system(&mut self, system: Box<dyn System>) {
        self.systems.push(system);
        self.systems.sort_by_key(|system| system.priority());
    }

    pub fn register_transport(&mut self, transport: Box<dyn Transport>) {
        self.transports.push(transport);
    }

    /// Registers a last-write-win component on this engine's world
    pub fn define_component(
        &mut self,
        name: &str,
        schema: Schema,
    ) -> Result<ComponentKind, StoreError> {
        self.world
            .define_component(name, StoreSettings::last_write_win(schema))
    }

    /// Registers a grow-only component, capped at the configured default
    pub fn define_grow_only(
        &mut self,
        name: &str,
        schema: Schema,
        order_key: impl Fn(&Value) -> f64 + Send + Sync + 'static,
    ) -> Result<ComponentKind, StoreError> {
        let settings =
            StoreSettings::grow_only(schema, self.config.default_set_capacity, order_key);
        self.world.define_component(name, settings)
    }

    /// Allocates a fresh entity on this engine's world
    pub fn spawn_entity(&mut self) -> Result<Entity, EntityError> {
        self.world.spawn_entity()
    }

    /// Inbound delivery callback for transport owners. Bytes are queued and
    /// applied at the start of the next tick.
    pub fn receive(&mut self, payload: &[u8]) {
        self.inbound.push(payload.to_vec());
    }

    /// Applies a full-state dump immediately, ahead of any queued deltas.
    /// Bootstrapping a new actor requires this dump followed by every delta
    /// produced from the moment the dump was taken.
    pub fn bootstrap_from(&mut self, dump: &[u8]) -> Result<(), EngineError> {
        let messages = read_all_messages(&mut ByteBuffer::from_bytes(dump))?;
        debug!("bootstrapping from dump of {} messages", messages.len());
        for message in &messages {
            let outcome = self.world.apply_message(message)?;
            if let Some(correction) = outcome.correction {
                if self.config.send_corrections {
                    self.outbound.push(correction);
                }
            }
        }
        Ok(())
    }

    /// Runs one tick to completion: apply, simulate, flush, fan out
    pub fn tick(&mut self) -> Result<Tick, EngineError> {
        self.apply_inbound()?;
        self.run_systems();
        self.flush_outbound()?;

        self.tick = self.tick.wrapping_add(1);
        Ok(self.tick)
    }

    fn apply_inbound(&mut self) -> Result<(), EngineError> {
        let batches = std::mem::take(&mut self.inbound);
        for batch in batches {
            let messages = read_all_messages(&mut ByteBuffer::from_bytes(&batch))?;
            for message in &messages {
                let outcome = self.world.apply_message(message)?;
                if let Some(correction) = outcome.correction {
                    if self.config.send_corrections {
                        self.outbound.push(correction);
                    } else {
                        debug!(
                            "dropping correction for entity {} component {}",
                            correction.entity, correction.component
                        );
                    }
                }
            }
        }
        Ok(())
    }

    fn run_systems(&mut self) {
        let mut systems = std::mem::take(&mut self.systems);
        systems.retain_mut(|system| {
            match system.run(&mut self.world, self.tick) {
                SystemOutcome::Continue => true,
                SystemOutcome::Detach => {
                    debug!("system `{}` detached at tick {}", system.name(), self.tick);
                    false
                }
            }
        });
        self.systems = systems;
    }

    fn flush_outbound(&mut self) -> Result<(), EngineError> {
        let mut messages = std::mem::take(&mut self.outbound);
        messages.extend(self.world.flush_messages()?);
        if messages.is_empty() {
            return Ok(());
        }

        let mut buffer = ByteBuffer::new();
        write_all_messages(&messages, &mut buffer)?;
        let payload = buffer.to_bytes();

        for transport in &mut self.transports {
            if !transport.filter() {
                continue;
            }
            if transport.send(&payload).is_err() {
                warn!(
                    "transport `{}` failed to send batch of {} bytes; dropping",
                    transport.name(),
                    payload.len()
                );
            }
        }
        Ok(())
    }
}
