use std::collections::{HashMap, HashSet};

use concord_serde::{Schema, SchemaError, Value};

use crate::messages::wire::{OpKind, WireMessage};
use crate::types::Timestamp;
use crate::world::component::ComponentKind;
use crate::world::entity::Entity;
use crate::world::store::{ApplyOutcome, ReplicationScope};

/// Application-level ordering key for set entries. Not the Lamport clock:
/// callers supply it (event occurrence time, sequence number, ...) and the
/// set stays sorted ascending by it.
pub type OrderKeyFn = Box<dyn Fn(&Value) -> f64 + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub struct SetEntry {
    pub value: Value,
    pub order_key: f64,
}

/// Grow-only value-set storage: per entity, an ordered set of values capped
/// at `max_elements`, trimmed from the low-key end.
///
/// Conflict-free by construction: merge is set union, APPENDs are always
/// accepted and never corrected. Individual entries are never deleted; only
/// entity-deletion cascade clears a row.
pub struct GrowOnlySetStore {
    kind: ComponentKind,
    name: String,
    schema: Schema,
    scope: ReplicationScope,
    max_elements: usize,
    order_key: OrderKeyFn,
    values: HashMap<Entity, Vec<SetEntry>>,
    clocks: HashMap<Entity, Timestamp>,
    dirty: HashSet<Entity>,
    pending: HashMap<Entity, Vec<Value>>,
}

impl std::fmt::Debug for GrowOnlySetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GrowOnlySetStore")
            .field("kind", &self.kind)
            .field("name", &self.name)
            .field("schema", &self.schema)
            .field("scope", &self.scope)
            .field("max_elements", &self.max_elements)
            .field("order_key", &"<fn>")
            .field("values", &self.values)
            .field("clocks", &self.clocks)
            .field("dirty", &self.dirty)
            .field("pending", &self.pending)
            .finish()
    }
}

impl GrowOnlySetStore {
    pub fn new(
        name: &str,
        schema: Schema,
        scope: ReplicationScope,
        max_elements: usize,
        order_key: OrderKeyFn,
    ) -> Self {
        Self {
            kind: ComponentKind::of(name),
            name: name.to_string(),
            schema,
            scope,
            max_elements: max_elements.max(1),
            order_key,
            values: HashMap::new(),
            clocks: HashMap::new(),
            dirty: HashSet::new(),
            pending: HashMap::new(),
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

    pub fn max_elements(&self) -> usize {
        self.max_elements
    }

    /// Adds a value locally and queues it for APPEND emission. Returns
    /// `false` when an equal value is already present (set semantics keep
    /// redelivery and echo harmless).
    pub fn add_value(&mut self, entity: Entity, value: Value) -> bool {
        if !self.merge_value(entity, value.clone()) {
            return false;
        }
        self.pending.entry(entity).or_default().push(value);
        self.dirty.insert(entity);
        true
    }

    /// Frozen snapshot of an entity's set; mutation only via [`Self::add_value`]
    pub fn values(&self, entity: Entity) -> &[SetEntry] {
        self.values
            .get(&entity)
            .map(|entries| entries.as_slice())
            .unwrap_or(&[])
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

    pub fn is_dirty(&self, entity: Entity) -> bool {
        self.dirty.contains(&entity)
    }

    /// Drains queued additions: per dirty entity, bump the clock by one and
    /// emit one APPEND per queued value at that clock
    pub fn flush(&mut self, out: &mut Vec<WireMessage>) -> Result<(), SchemaError> {
        let mut pending: Vec<Entity> = self.dirty.drain().collect();
        pending.sort_unstable();

        for entity in pending {
            let clock = self.clocks.entry(entity).or_insert(0);
            *clock += 1;
            let clock = *clock;

            for value in self.pending.remove(&entity).unwrap_or_default() {
                out.push(WireMessage::append(
                    entity,
                    self.kind,
                    clock,
                    self.schema.to_payload(&value)?,
                ));
            }
        }
        Ok(())
    }

    /// APPENDs merge unconditionally; PUT/DELETE are the wrong operation
    /// for this variant and no-op without a correction
    pub fn apply(&mut self, message: &WireMessage) -> Result<ApplyOutcome, SchemaError> {
        if message.kind != OpKind::Append {
            log::debug!(
                "store `{}` ignoring {:?} message (wrong operation for a grow-only store)",
                self.name,
                message.kind
            );
            return Ok(ApplyOutcome::noop());
        }

        let payload = message.payload_bytes().unwrap_or(&[]);
        let value = self.schema.from_payload(payload)?;

        let entity = message.entity;
        self.merge_value(entity, value);

        let clock = self.clocks.entry(entity).or_insert(0);
        *clock = (*clock).max(message.timestamp);

        Ok(ApplyOutcome::accepted())
    }

    /// Emits every entry as an APPEND at the entity's current clock; the
    /// dirty set is left untouched
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
            let clock = self.clocks.get(&entity).copied().unwrap_or(0);
            for entry in &self.values[&entity] {
                out.push(WireMessage::append(
                    entity,
                    self.kind,
                    clock,
                    self.schema.to_payload(&entry.value)?,
                ));
            }
        }
        Ok(())
    }

    /// Entity-deletion cascade clears the whole row
    pub fn remove_entity(&mut self, entity: Entity) {
        self.values.remove(&entity);
        self.clocks.remove(&entity);
        self.dirty.remove(&entity);
        self.pending.remove(&entity);
    }

    // Sorted insert + cap enforcement. Returns false for an already-present
    // equal value.
    fn merge_value(&mut self, entity: Entity, value: Value) -> bool {
        let entries = self.values.entry(entity).or_default();
        if entries.iter().any(|entry| entry.value == value) {
            return false;
        }

        let order_key = (self.order_key)(&value);
        let position = entries.partition_point(|entry| entry.order_key.total_cmp(&order_key).is_le());
        entries.insert(position, SetEntry { value, order_key });

        while entries.len() > self.max_elements {
            entries.remove(0);
        }

        self.clocks.entry(entity).or_insert(0);
        true
    }
}
