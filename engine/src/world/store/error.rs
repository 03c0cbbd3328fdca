use thiserror::Error;

use crate::world::component::ComponentKind;
use crate::world::entity::Entity;

/// Contract violations against a component store. These are programming
/// errors on the calling side, never conflict-resolution outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// `insert` on an entity that already carries the component; use the
    /// replace variant for idempotent creation
    #[error("component `{component}` already exists on entity {entity}")]
    ComponentAlreadyExists {
        component: String,
        entity: Entity,
    },

    /// Mutable access to a value that does not exist
    #[error("cannot mutate component `{component}` on entity {entity}: no value exists")]
    ComponentMissing {
        component: String,
        entity: Entity,
    },

    /// The same component name registered twice
    #[error("component `{component}` is already registered")]
    DuplicateRegistration {
        component: String,
    },

    /// Two distinct names hashed to the same component id
    #[error("component `{component}` collides with already-registered component `{existing}` (id {kind})")]
    KindCollision {
        component: String,
        existing: String,
        kind: ComponentKind,
    },

    /// Asked a store for the wrong variant's API
    #[error("component `{component}` is a {actual} store, not a {requested} store")]
    VariantMismatch {
        component: String,
        requested: &'static str,
        actual: &'static str,
    },

    /// Looked up a component that was never registered
    #[error("no component store registered for `{component}`")]
    UnknownComponent {
        component: String,
    },
}
