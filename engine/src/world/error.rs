use thiserror::Error;

use crate::world::entity::Entity;

/// Errors raised by entity allocation and lifecycle operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityError {
    /// The session allocated every id below the reserved block
    #[error("entity id space is exhausted for this session")]
    IdSpaceExhausted,

    /// Root and the well-known singletons always exist
    #[error("entity {entity} is reserved and can never be deleted")]
    ReservedEntityImmortal {
        entity: Entity,
    },
}
