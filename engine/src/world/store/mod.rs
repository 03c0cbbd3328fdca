pub mod error;
pub mod grow_only;
pub mod lww;

use concord_serde::{Schema, SchemaError};

use crate::messages::wire::WireMessage;
use crate::world::component::ComponentKind;
use crate::world::entity::Entity;
use crate::world::store::error::StoreError;
use crate::world::store::grow_only::{GrowOnlySetStore, OrderKeyFn};
use crate::world::store::lww::LastWriteWinStore;

/// Whether a store's operations may reach durable storage on persisting
/// hosts. Network-only stores emit the network-scoped operation kinds so
/// such hosts can filter them out; resolution is identical either way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplicationScope {
    Durable,
    NetworkOnly,
}

impl ReplicationScope {
    pub fn is_network(self) -> bool {
        matches!(self, ReplicationScope::NetworkOnly)
    }
}

/// Which storage/conflict behavior a component gets
pub enum StoreVariant {
    LastWriteWin,
    GrowOnlySet {
        max_elements: usize,
        order_key: OrderKeyFn,
    },
}

/// Registration-time description of a component store
pub struct StoreSettings {
    pub schema: Schema,
    pub variant: StoreVariant,
    pub scope: ReplicationScope,
}

impl StoreSettings {
    pub fn last_write_win(schema: Schema) -> Self {
        Self {
            schema,
            variant: StoreVariant::LastWriteWin,
            scope: ReplicationScope::Durable,
        }
    }

    pub fn grow_only(
        schema: Schema,
        max_elements: usize,
        order_key: impl Fn(&concord_serde::Value) -> f64 + Send + Sync + 'static,
    ) -> Self {
        Self {
            schema,
            variant: StoreVariant::GrowOnlySet {
                max_elements,
                order_key: Box::new(order_key),
            },
            scope: ReplicationScope::Durable,
        }
    }

    pub fn network_scoped(mut self) -> Self {
        self.scope = ReplicationScope::NetworkOnly;
        self
    }
}

/// The outcome of applying one incoming operation to a store
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyOutcome {
    /// The incoming operation changed local state
    pub accepted: bool,
    /// Full local state to send back when the incoming operation lost
    pub correction: Option<WireMessage>,
}

impl ApplyOutcome {
    pub fn accepted() -> Self {
        Self {
            accepted: true,
            correction: None,
        }
    }

    pub fn rejected(correction: WireMessage) -> Self {
        Self {
            accepted: false,
            correction: Some(correction),
        }
    }

    pub fn noop() -> Self {
        Self {
            accepted: false,
            correction: None,
        }
    }
}

/// Closed dispatch over the two store variants. They share no mutable state
/// and have fully disjoint resolution rules, so the variant is decided once
/// at the registry boundary.
pub enum ComponentStore {
    LastWriteWin(LastWriteWinStore),
    GrowOnlySet(GrowOnlySetStore),
}

impl ComponentStore {
    pub fn new(name: &str, settings: StoreSettings) -> Self {
        match settings.variant {
            StoreVariant::LastWriteWin => ComponentStore::LastWriteWin(LastWriteWinStore::new(
                name,
                settings.schema,
                settings.scope,
            )),
            StoreVariant::GrowOnlySet {
                max_elements,
                order_key,
            } => ComponentStore::GrowOnlySet(GrowOnlySetStore::new(
                name,
                settings.schema,
                settings.scope,
                max_elements,
                order_key,
            )),
        }
    }

    pub fn kind(&self) -> ComponentKind {
        match self {
            ComponentStore::LastWriteWin(store) => store.kind(),
            ComponentStore::GrowOnlySet(store) => store.kind(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ComponentStore::LastWriteWin(store) => store.name(),
            ComponentStore::GrowOnlySet(store) => store.name(),
        }
    }

    pub fn scope(&self) -> ReplicationScope {
        match self {
            ComponentStore::LastWriteWin(store) => store.scope(),
            ComponentStore::GrowOnlySet(store) => store.scope(),
        }
    }

    pub fn variant_name(&self) -> &'static str {
        match self {
            ComponentStore::LastWriteWin(_) => "last-write-win",
            ComponentStore::GrowOnlySet(_) => "grow-only",
        }
    }

    pub fn contains(&self, entity: Entity) -> bool {
        match self {
            ComponentStore::LastWriteWin(store) => store.contains(entity),
            ComponentStore::GrowOnlySet(store) => store.contains(entity),
        }
    }

    pub fn flush(&mut self, out: &mut Vec<WireMessage>) -> Result<(), SchemaError> {
        match self {
            ComponentStore::LastWriteWin(store) => store.flush(out),
            ComponentStore::GrowOnlySet(store) => store.flush(out),
        }
    }

    pub fn apply(&mut self, message: &WireMessage) -> Result<ApplyOutcome, SchemaError> {
        match self {
            ComponentStore::LastWriteWin(store) => store.apply(message),
            ComponentStore::GrowOnlySet(store) => store.apply(message),
        }
    }

    pub fn dump(
        &self,
        filter: &dyn Fn(Entity) -> bool,
        out: &mut Vec<WireMessage>,
    ) -> Result<(), SchemaError> {
        match self {
            ComponentStore::LastWriteWin(store) => store.dump(filter, out),
            ComponentStore::GrowOnlySet(store) => store.dump(filter, out),
        }
    }

    pub fn remove_entity(&mut self, entity: Entity) {
        match self {
            ComponentStore::LastWriteWin(store) => store.remove_entity(entity),
            ComponentStore::GrowOnlySet(store) => store.remove_entity(entity),
        }
    }

    pub fn last_write_win(&self) -> Result<&LastWriteWinStore, StoreError> {
        match self {
            ComponentStore::LastWriteWin(store) => Ok(store),
            ComponentStore::GrowOnlySet(store) => Err(StoreError::VariantMismatch {
                component: store.name().to_string(),
                requested: "last-write-win",
                actual: "grow-only",
            }),
        }
    }

    pub fn last_write_win_mut(&mut self) -> Result<&mut LastWriteWinStore, StoreError> {
        match self {
            ComponentStore::LastWriteWin(store) => Ok(store),
            ComponentStore::GrowOnlySet(store) => Err(StoreError::VariantMismatch {
                component: store.name().to_string(),
                requested: "last-write-win",
                actual: "grow-only",
            }),
        }
    }

    pub fn grow_only(&self) -> Result<&GrowOnlySetStore, StoreError> {
        match self {
            ComponentStore::GrowOnlySet(store) => Ok(store),
            ComponentStore::LastWriteWin(store) => Err(StoreError::VariantMismatch {
                component: store.name().to_string(),
                requested: "grow-only",
                actual: "last-write-win",
            }),
        }
    }

    pub fn grow_only_mut(&mut self) -> Result<&mut GrowOnlySetStore, StoreError> {
        match self {
            ComponentStore::GrowOnlySet(store) => Ok(store),
            ComponentStore::LastWriteWin(store) => Err(StoreError::VariantMismatch {
                component: store.name().to_string(),
                requested: "grow-only",
                actual: "last-write-win",
            }),
        }
    }
}
