use thiserror::Error;

use concord_serde::SchemaError;

use crate::messages::error::MessageError;
use crate::world::error::EntityError;
use crate::world::store::error::StoreError;

/// Top-level engine failures. Conflict-resolution outcomes never surface
/// here; these are protocol or programming violations that abort the
/// current operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Message(#[from] MessageError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Entity(#[from] EntityError),
}
