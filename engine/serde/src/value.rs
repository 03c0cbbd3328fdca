use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A dynamically typed payload value, shaped and serialized by a
/// [`crate::Schema`].
///
/// Component stores hold these; nothing in here knows about the wire. The
/// serde derives exist for tooling (state inspection, fixtures), not for
/// replication. Enum members surface as their underlying primitive (`I32`
/// or `String`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Bytes(Vec<u8>),
    String(String),
    Array(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Optional(Option<Box<Value>>),
    OneOf(String, Box<Value>),
}

impl Value {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::I8(_) => "int8",
            Value::I16(_) => "int16",
            Value::I32(_) => "int32",
            Value::I64(_) => "int64",
            Value::U8(_) => "uint8",
            Value::U16(_) => "uint16",
            Value::U32(_) => "uint32",
            Value::U64(_) => "uint64",
            Value::F32(_) => "float32",
            Value::F64(_) => "float64",
            Value::Bytes(_) => "bytes",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
            Value::Optional(_) => "optional",
            Value::OneOf(..) => "one-of",
        }
    }

    /// Widening view of any integer variant
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I8(value) => Some(*value as i64),
            Value::I16(value) => Some(*value as i64),
            Value::I32(value) => Some(*value as i64),
            Value::I64(value) => Some(*value),
            Value::U8(value) => Some(*value as i64),
            Value::U16(value) => Some(*value as i64),
            Value::U32(value) => Some(*value as i64),
            Value::U64(value) => i64::try_from(*value).ok(),
            _ => None,
        }
    }

    /// Widening view of any numeric variant
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F32(value) => Some(*value as f64),
            Value::F64(value) => Some(*value),
            other => other.as_i64().map(|value| value as f64),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(fields) => Some(fields),
            _ => None,
        }
    }

    /// Builds a map value from field pairs; keys are deduplicated last-wins
    pub fn map<const N: usize>(fields: [(&str, Value); N]) -> Value {
        Value::Map(
            fields
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        )
    }

    pub fn some(value: Value) -> Value {
        Value::Optional(Some(Box::new(value)))
    }

    pub fn none() -> Value {
        Value::Optional(None)
    }

    pub fn one_of(variant: &str, value: Value) -> Value {
        Value::OneOf(variant.to_string(), Box::new(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::F64(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::F32(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::I32(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::U32(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}
