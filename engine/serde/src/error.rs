use thiserror::Error;

/// Errors raised by [`crate::ByteBuffer`] cursor and fixed-offset accessors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    /// Attempted to read past the write cursor
    #[error("read of {requested} bytes at cursor {cursor} is outside of the bounds of written data ({written} bytes written)")]
    OutOfBounds {
        requested: usize,
        cursor: usize,
        written: usize,
    },

    /// Fixed-offset access landed beyond the reserved capacity
    #[error("fixed-offset access of {requested} bytes at offset {offset} exceeds buffer capacity ({capacity} bytes)")]
    OffsetOutOfRange {
        requested: usize,
        offset: usize,
        capacity: usize,
    },

    /// Attempted to move the read cursor past the write cursor
    #[error("cannot seek read cursor to {position}: only {written} bytes written")]
    SeekOutOfRange {
        position: usize,
        written: usize,
    },

    /// A length-prefixed string did not contain valid UTF-8
    #[error("length-prefixed string of {length} bytes is not valid UTF-8")]
    InvalidUtf8 {
        length: usize,
    },
}

/// Errors raised while constructing schemas or moving values through them
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The value handed to `serialize` does not have the schema's shape
    #[error("value of type {found} does not match schema of type {expected}")]
    ValueMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// A map value was missing a field the schema declares
    #[error("map value is missing field `{field}` declared by the schema")]
    MissingField {
        field: String,
    },

    /// Decoded a one-of tag that the schema does not declare
    #[error("one-of variant index {index} not found in the schema ({count} variants declared)")]
    UnknownOneOfIndex {
        index: u8,
        count: usize,
    },

    /// Serialized a one-of value whose variant the schema does not declare
    #[error("one-of variant `{variant}` not found in the schema")]
    UnknownOneOfVariant {
        variant: String,
    },

    /// Decoded or serialized an enum value that is not a declared member
    #[error("`{value}` is not a member of the enum")]
    UnknownEnumMember {
        value: String,
    },

    /// Enum construction with no members at all
    #[error("an enum requires at least one member")]
    EmptyEnum,

    /// Enum construction mixing integer and string members
    #[error("enum members must all share one primitive type (found both integer and string members)")]
    MixedEnumMembers,

    /// Enum construction with an integer member outside the encodable range
    #[error("integer enum member `{name}` ({value}) does not fit in a signed 32-bit range")]
    EnumMemberOutOfRange {
        name: String,
        value: i64,
    },

    /// One-of construction with no variants at all
    #[error("a one-of requires at least one variant")]
    EmptyOneOf,

    /// One-of construction with more variants than the wire tag can index
    #[error("a one-of is limited to 256 variants (got {count})")]
    TooManyVariants {
        count: usize,
    },

    /// Underlying buffer failure while encoding or decoding
    #[error(transparent)]
    Buffer(#[from] BufferError),
}
