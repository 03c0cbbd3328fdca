use std::collections::HashMap;

use concord_serde::{ByteBuffer, Schema, SchemaError, Value};
use log::warn;

use crate::engine::error::EngineError;
use crate::messages::codec::write_all_messages;
use crate::messages::wire::WireMessage;
use crate::world::component::ComponentKind;
use crate::world::entity::{Entity, EntityGenerator};
use crate::world::error::EntityError;
use crate::world::store::error::StoreError;
use crate::world::store::grow_only::GrowOnlySetStore;
use crate::world::store::lww::LastWriteWinStore;
use crate::world::store::{ApplyOutcome, ComponentStore, StoreSettings};

/// The component-store registry of one actor.
///
/// Exclusively owned by the engine instance that created it; all state the
/// stores use is held here per instance, never in ambient globals, so
/// multiple engines in one process stay isolated. Entity liveness is itself
/// a component: the built-in `"entity"` marker store. Deleting the marker
/// deletes the entity, cascading across every registered store.
pub struct World {
    stores: HashMap<ComponentKind, ComponentStore>,
    // Registration order; keeps flush/dump emission deterministic
    order: Vec<ComponentKind>,
    names: HashMap<String, ComponentKind>,
    generator: EntityGenerator,
}

impl World {
    pub fn new() -> Self {
        let mut world = Self {
            stores: HashMap::new(),
            order: Vec::new(),
            names: HashMap::new(),
            generator: EntityGenerator::new(),
        };

        world
            .define_component("entity", StoreSettings::last_write_win(Schema::U8))
            .expect("built-in entity marker registration cannot collide in an empty registry");

        // The reserved entities exist identically on every actor from the
        // start, so they are seeded without dirtying anything
        let marker = world.marker_store_mut();
        marker.seed(Entity::ROOT, Value::U8(1));
        marker.seed(Entity::PLAYER, Value::U8(1));
        marker.seed(Entity::CAMERA, Value::U8(1));

        world
    }

    /// Registers a component store and hands back its id, the handle used
    /// by every later lookup
    pub fn define_component(
        &mut self,
        name: &str,
        settings: StoreSettings,
    ) -> Result<ComponentKind, StoreError> {
        if self.names.contains_key(name) {
            return Err(StoreError::DuplicateRegistration {
                component: name.to_string(),
            });
        }

        let store = ComponentStore::new(name, settings);
        let kind = store.kind();
        if let Some(existing) = self.stores.get(&kind) {
            return Err(StoreError::KindCollision {
                component: name.to_string(),
                existing: existing.name().to_string(),
                kind,
            });
        }

        self.names.insert(name.to_string(), kind);
        self.order.push(kind);
        self.stores.insert(kind, store);
        Ok(kind)
    }

    pub fn component(&self, kind: ComponentKind) -> Option<&ComponentStore> {
        self.stores.get(&kind)
    }

    pub fn component_mut(&mut self, kind: ComponentKind) -> Option<&mut ComponentStore> {
        self.stores.get_mut(&kind)
    }

    pub fn component_by_name(&self, name: &str) -> Option<&ComponentStore> {
        self.names.get(name).and_then(|kind| self.stores.get(kind))
    }

    pub fn kind_of(&self, name: &str) -> Option<ComponentKind> {
        self.names.get(name).copied()
    }

    pub fn components(&self) -> impl Iterator<Item = &ComponentStore> {
        self.order.iter().filter_map(|kind| self.stores.get(kind))
    }

    /// Typed accessor for a registered last-write-win store
    pub fn last_write_win(&self, kind: ComponentKind) -> Result<&LastWriteWinStore, StoreError> {
        self.stores
            .get(&kind)
            .ok_or_else(|| StoreError::UnknownComponent {
                component: kind.to_string(),
            })?
            .last_write_win()
    }

    pub fn last_write_win_mut(
        &mut self,
        kind: ComponentKind,
    ) -> Result<&mut LastWriteWinStore, StoreError> {
        self.stores
            .get_mut(&kind)
            .ok_or_else(|| StoreError::UnknownComponent {
                component: kind.to_string(),
            })?
            .last_write_win_mut()
    }

    /// Typed accessor for a registered grow-only store
    pub fn grow_only(&self, kind: ComponentKind) -> Result<&GrowOnlySetStore, StoreError> {
        self.stores
            .get(&kind)
            .ok_or_else(|| StoreError::UnknownComponent {
                component: kind.to_string(),
            })?
            .grow_only()
    }

    pub fn grow_only_mut(
        &mut self,
        kind: ComponentKind,
    ) -> Result<&mut GrowOnlySetStore, StoreError> {
        self.stores
            .get_mut(&kind)
            .ok_or_else(|| StoreError::UnknownComponent {
                component: kind.to_string(),
            })?
            .grow_only_mut()
    }

    // Entity lifecycle

    pub fn spawn_entity(&mut self) -> Result<Entity, EntityError> {
        let entity = self.generator.generate()?;
        self.marker_store_mut()
            .insert_or_replace(entity, Value::U8(1));
        Ok(entity)
    }

    pub fn entity_exists(&self, entity: Entity) -> bool {
        self.marker_store().contains(entity)
    }

    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.marker_store().entities()
    }

    /// Deletes an entity and cascades across every store. Replicated as a
    /// DELETE of the entity marker; peers cascade on acceptance.
    pub fn despawn_entity(&mut self, entity: Entity) -> Result<(), EntityError> {
        if entity.is_reserved() {
            return Err(EntityError::ReservedEntityImmortal { entity });
        }

        self.marker_store_mut().remove(entity);
        for kind in &self.order {
            if *kind == ComponentKind::ENTITY_MARKER {
                continue;
            }
            if let Some(store) = self.stores.get_mut(kind) {
                store.remove_entity(entity);
            }
        }
        Ok(())
    }

    // Replication plumbing

    /// Drains every store's dirty set into wire messages
    pub fn flush_messages(&mut self) -> Result<Vec<WireMessage>, SchemaError> {
        let mut out = Vec::new();
        for kind in &self.order {
            if let Some(store) = self.stores.get_mut(kind) {
                store.flush(&mut out)?;
            }
        }
        Ok(out)
    }

    /// Applies one incoming operation through the store's resolution rule.
    /// Messages for unregistered components are skipped with a warning: the
    /// actor cannot decode a payload without the schema.
    pub fn apply_message(&mut self, message: &WireMessage) -> Result<ApplyOutcome, SchemaError> {
        self.generator.observe(message.entity);

        let Some(store) = self.stores.get_mut(&message.component) else {
            warn!(
                "skipping {:?} for unregistered component {} (entity {})",
                message.kind, message.component, message.entity
            );
            return Ok(ApplyOutcome::noop());
        };

        let outcome = store.apply(message)?;

        // An accepted delete of the liveness marker deletes the entity
        if message.component == ComponentKind::ENTITY_MARKER
            && message.kind.is_delete()
            && outcome.accepted
        {
            for kind in self.order.clone() {
                if kind == ComponentKind::ENTITY_MARKER {
                    continue;
                }
                if let Some(store) = self.stores.get_mut(&kind) {
                    store.remove_entity(message.entity);
                }
            }
        }

        Ok(outcome)
    }

    /// Full-state dump for bootstrapping a new actor: concatenated
    /// PUT/APPEND messages covering every present entity in every store,
    /// optionally filtered by an entity predicate
    pub fn dump_filtered(&self, filter: impl Fn(Entity) -> bool) -> Result<Vec<u8>, EngineError> {
        let mut messages = Vec::new();
        for kind in &self.order {
            if let Some(store) = self.stores.get(kind) {
                store.dump(&filter, &mut messages)?;
            }
        }

        let mut buffer = ByteBuffer::new();
        write_all_messages(&messages, &mut buffer)?;
        Ok(buffer.to_bytes())
    }

    pub fn dump(&self) -> Result<Vec<u8>, EngineError> {
        self.dump_filtered(|_| true)
    }

    fn marker_store(&self) -> &LastWriteWinStore {
        match self.stores.get(&ComponentKind::ENTITY_MARKER) {
            Some(ComponentStore::LastWriteWin(store)) => store,
            _ => unreachable!("entity marker store is registered in World::new"),
        }
    }

    fn marker_store_mut(&mut self) -> &mut LastWriteWinStore {
        match self.stores.get_mut(&ComponentKind::ENTITY_MARKER) {
            Some(ComponentStore::LastWriteWin(store)) => store,
            _ => unreachable!("entity marker store is registered in World::new"),
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
