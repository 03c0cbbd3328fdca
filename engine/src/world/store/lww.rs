use std::collections::{HashMap, HashSet};

use concord_serde::{Schema, SchemaError, Value};

use crate::messages::wire::WireMessage;
use crate::types::Timestamp;
use crate::world::component::ComponentKind;
use crate::world::entity::Entity;
use crate::world::resolve::{resolve_last_write, Resolution};
use crate::world::store::error::StoreError;
use crate::world::store::{ApplyOutcome, ReplicationScope};

/// Last-write-win component storage: one value per entity, one Lamport
/// clock per entity, and the dirty set that drives delta emission.
///
/// Clocks outlive deletion as tombstones so a late PUT at a lower clock is
/// still rejected; entity-deletion cascade is the only thing that clears
/// them.
#[derive(Debug)]
pub struct LastWriteWinStore {
    kind: ComponentKind,
    name: String,
    schema: Schema,
    scope: ReplicationScope,
    values: HashMap<Entity, Value>,
    clocks: HashMap<Entity, Timestamp>,
    dirty: HashSet<Entity>,
}

impl LastWriteWinStore {
    pub fn new(name: &str, schema: Schema, scope: ReplicationScope) -> Self {
        Self {
            kind: ComponentKind::of(name),
            name: name.to_string(),
            schema,
            scope,
            values: HashMap::new(),
            clocks: HashMap::new(),
            dirty: HashSet::new(),
        }
    }

    pub fn kind(&self) -> ComponentKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn scope(&self) -> ReplicationScope {
        self.scope
    }

    /// Creates the component on an entity; fails if it already exists
    pub fn insert(&mut self, entity: Entity, value: Value) -> Result<(), StoreError> {
        if self.values.contains_key(&entity) {
            return Err(StoreError::ComponentAlreadyExists {
                component: self.name.clone(),
                entity,
            });
        }
        self.insert_or_replace(entity, value);
        Ok(())
    }

    /// Creates or overwrites the component on an entity, idempotently
    pub fn insert_or_replace(&mut self, entity: Entity, value: Value) {
        self.values.insert(entity, value);
        self.clocks.entry(entity).or_insert(0);
        self.dirty.insert(entity);
    }

    /// Pre-populates a row without marking it dirty. Used for state every
    /// actor constructs identically on its own (the reserved entities).
    pub(crate) fn seed(&mut self, entity: Entity, value: Value) {
        self.values.insert(entity, value);
        self.clocks.entry(entity).or_insert(0);
    }

    pub fn get(&self, entity: Entity) -> Option<&Value> {
        self.values.get(&entity)
    }

    /// Mutable access marks the entity dirty; the change is flushed at the
    /// end of the owning tick
    pub fn get_mut(&mut self, entity: Entity) -> Result<&mut Value, StoreError> {
        let Some(value) = self.values.get_mut(&entity) else {
            return Err(StoreError::ComponentMissing {
                component: self.name.clone(),
                entity,
            });
        };
        self.dirty.insert(entity);
        Ok(value)
    }

    /// Removes the component from an entity. Idempotent: deleting an absent
    /// component neither errors nor re-dirties.
    pub fn remove(&mut self, entity: Entity) {
        if self.values.remove(&entity).is_some() {
            // Clock stays behind as a tombstone
            self.dirty.insert(entity);
        }
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.values.contains_key(&entity)
    }

    pub fn clock(&self, entity: Entity) -> Option<Timestamp> {
        self.clocks.get(&entity).copied()
    }

    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.values.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn is_dirty(&self, entity: Entity) -> bool {
        self.dirty.contains(&entity)
    }

    /// Drains the dirty set: per entity, bump the clock by one and emit a
    /// PUT of the current value, or a DELETE when the value is gone
    pub fn flush(&mut self, out: &mut Vec<WireMessage>) -> Result<(), SchemaError> {
        let mut pending: Vec<Entity> = self.dirty.drain().collect();
        pending.sort_unstable();

        for entity in pending {
            let clock = self.clocks.entry(entity).or_insert(0);
            *clock += 1;
            let clock = *clock;

            match self.values.get(&entity) {
                Some(value) => {
                    let payload = self.schema.to_payload(value)?;
                    out.push(WireMessage::put(
                        entity,
                        self.kind,
                        clock,
                        payload,
                        self.scope.is_network(),
                    ));
                }
                None => {
                    out.push(WireMessage::delete(
                        entity,
                        self.kind,
                        clock,
                        self.scope.is_network(),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Applies one incoming PUT/DELETE under the last-write-win rule.
    /// APPENDs are the wrong operation for this variant and no-op.
    pub fn apply(&mut self, message: &WireMessage) -> Result<ApplyOutcome, SchemaError> {
        if message.kind.has_payload() && !message.kind.is_put() {
            log::debug!(
                "store `{}` ignoring {:?} message (wrong operation for a last-write-win store)",
                self.name,
                message.kind
            );
            return Ok(ApplyOutcome::noop());
        }

        let entity = message.entity;
        let local_clock = self.clocks.get(&entity).copied();
        let local_payload = self.local_payload(entity)?;

        match resolve_last_write(
            message.timestamp,
            message.payload_bytes(),
            local_clock,
            local_payload.as_deref(),
        ) {
            Resolution::Accept => {
                // Decode before committing anything, so a corrupt payload
                // never leaves partial state behind
                match message.payload_bytes() {
                    Some(payload) => {
                        let value = self.schema.from_payload(payload)?;
                        self.values.insert(entity, value);
                    }
                    None => {
                        self.values.remove(&entity);
                    }
                }
                self.clocks.insert(entity, message.timestamp);
                // Any local pending change lost the race; do not re-emit it
                self.dirty.remove(&entity);
                Ok(ApplyOutcome::accepted())
            }
            Resolution::Reject => {
                let clock = local_clock.unwrap_or(0);
                let correction = match local_payload {
                    Some(payload) => WireMessage::put(
                        entity,
                        self.kind,
                        clock,
                        payload,
                        self.scope.is_network(),
                    ),
                    None => {
                        WireMessage::delete(entity, self.kind, clock, self.scope.is_network())
                    }
                };
                Ok(ApplyOutcome::rejected(correction))
            }
            Resolution::Noop => Ok(ApplyOutcome::noop()),
        }
    }

    /// Emits the full current state as PUTs at current clocks; the dirty
    /// set is left untouched
    pub fn dump(
        &self,
        filter: &dyn Fn(Entity) -> bool,
        out: &mut Vec<WireMessage>,
    ) -> Result<(), SchemaError> {
        let mut present: Vec<Entity> = self.values.keys().copied().collect();
        present.sort_unstable();

        for entity in present {
            if !filter(entity) {
                continue;
            }
            let value = &self.values[&entity];
            let clock = self.clocks.get(&entity).copied().unwrap_or(0);
            out.push(WireMessage::put(
                entity,
                self.kind,
                clock,
                self.schema.to_payload(value)?,
                self.scope.is_network(),
            ));
        }
        Ok(())
    }

    /// Entity-deletion cascade: drops the value, the clock tombstone and
    /// any pending dirty flag for the entity
    pub fn remove_entity(&mut self, entity: Entity) {
        self.values.remove(&entity);
        self.clocks.remove(&entity);
        self.dirty.remove(&entity);
    }

    fn local_payload(&self, entity: Entity) -> Result<Option<Vec<u8>>, SchemaError> {
        self.values
            .get(&entity)
            .map(|value| self.schema.to_payload(value))
            .transpose()
    }
}
