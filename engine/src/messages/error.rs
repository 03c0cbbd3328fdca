use thiserror::Error;

use concord_serde::BufferError;

use crate::messages::wire::OpKind;

/// Errors raised while encoding or decoding wire messages
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessageError {
    /// Decoded an operation tag no known kind uses
    #[error("unknown wire operation tag {tag} (valid range: 0-4); the stream may be malformed or from an incompatible actor")]
    UnknownOpTag {
        tag: u8,
    },

    /// Encoded a payload-bearing kind with no payload attached
    #[error("{kind:?} message is missing its payload")]
    MissingPayload {
        kind: OpKind,
    },

    /// Encoded a payload onto a kind that never carries one
    #[error("{kind:?} message must not carry a payload")]
    UnexpectedPayload {
        kind: OpKind,
    },

    /// Underlying buffer failure, usually a truncated stream
    #[error(transparent)]
    Buffer(#[from] BufferError),
}
