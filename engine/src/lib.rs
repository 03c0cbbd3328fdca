//! # Concord Engine
//! A CRDT-replicated entity-component store. Component values live in
//! per-component stores, mutations mark entities dirty, and each tick drains
//! dirty state into wire messages that any transport can carry to any peer.
//! Peers apply messages in any order, duplicated or delayed, and converge.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use concord_serde::{
    BufferError, ByteBuffer, EnumMember, EnumSchema, Schema, SchemaError, Value,
};

mod engine;
mod messages;
mod types;
mod world;

pub use engine::{
    config::EngineConfig,
    engine::Engine,
    error::EngineError,
    system::{System, SystemOutcome},
    transport::{SendError, Transport},
};
pub use messages::{
    codec::{read_all_messages, read_message, write_all_messages, write_message},
    error::MessageError,
    wire::{OpKind, WireMessage},
};
pub use types::{Tick, Timestamp};
pub use world::{
    component::{ComponentKind, STATIC_KIND_CEILING},
    entity::{Entity, EntityGenerator},
    error::EntityError,
    resolve::{resolve_last_write, Resolution},
    store::{
        error::StoreError,
        grow_only::{GrowOnlySetStore, OrderKeyFn, SetEntry},
        lww::LastWriteWinStore,
        ApplyOutcome, ComponentStore, ReplicationScope, StoreSettings, StoreVariant,
    },
    world::World,
};
