//! # Concord Serde
//! Binary buffer and schema codec primitives shared by every concord actor.
//!
//! Everything that crosses the wire passes through [`ByteBuffer`]; every
//! component payload is shaped by a [`Schema`] over the dynamic [`Value`]
//! tree. The wire format is positional: writer and reader must agree on the
//! schema out-of-band, there are no field tags.

mod byte_buffer;
mod error;
mod schema;
mod value;

pub use byte_buffer::ByteBuffer;
pub use error::{BufferError, SchemaError};
pub use schema::{EnumMember, EnumSchema, Schema};
pub use value::Value;
