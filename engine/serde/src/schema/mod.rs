//! Schema-driven codec over the dynamic [`Value`] tree.
//!
//! Composite schemas delegate to child schemas in field-declaration order;
//! the order is the wire format, so writer and reader must be built from the
//! same declaration. A JSON-shaped description of the declaration is
//! available via [`Schema::describe`] for tooling, but it never travels with
//! the payload bytes.

mod codec;
mod describe;

use std::collections::BTreeMap;

use crate::error::SchemaError;
use crate::value::Value;

/// A positional wire schema. Knows how to read and write itself against a
/// [`crate::ByteBuffer`] and how to produce default and extended values.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    Bytes,
    String,
    Array(Box<Schema>),
    Map(Vec<(String, Schema)>),
    Optional(Box<Schema>),
    OneOf(Vec<(String, Schema)>),
    Enum(EnumSchema),
}

/// Enum members all share one underlying primitive, validated at
/// construction time
#[derive(Debug, Clone, PartialEq)]
pub enum EnumSchema {
    Int(Vec<(String, i32)>),
    Str(Vec<String>),
}

/// Declaration-time input for [`Schema::enumeration`]
#[derive(Debug, Clone, PartialEq)]
pub enum EnumMember {
    Int { name: String, value: i64 },
    Str { name: String },
}

impl EnumMember {
    pub fn int(name: &str, value: i64) -> Self {
        EnumMember::Int {
            name: name.to_string(),
            value,
        }
    }

    pub fn str(name: &str) -> Self {
        EnumMember::Str {
            name: name.to_string(),
        }
    }
}

impl Schema {
    pub fn array(element: Schema) -> Schema {
        Schema::Array(Box::new(element))
    }

    pub fn map<const N: usize>(fields: [(&str, Schema); N]) -> Schema {
        Schema::Map(
            fields
                .into_iter()
                .map(|(name, schema)| (name.to_string(), schema))
                .collect(),
        )
    }

    pub fn optional(inner: Schema) -> Schema {
        Schema::Optional(Box::new(inner))
    }

    pub fn one_of<const N: usize>(variants: [(&str, Schema); N]) -> Result<Schema, SchemaError> {
        if N == 0 {
            return Err(SchemaError::EmptyOneOf);
        }
        if N > u8::MAX as usize + 1 {
            return Err(SchemaError::TooManyVariants { count: N });
        }
        Ok(Schema::OneOf(
            variants
                .into_iter()
                .map(|(name, schema)| (name.to_string(), schema))
                .collect(),
        ))
    }

    /// Validates that all members share one primitive type and that integer
    /// members fit in a signed 32-bit range
    pub fn enumeration(members: Vec<EnumMember>) -> Result<Schema, SchemaError> {
        if members.is_empty() {
            return Err(SchemaError::EmptyEnum);
        }

        let all_int = members
            .iter()
            .all(|member| matches!(member, EnumMember::Int { .. }));
        let all_str = members
            .iter()
            .all(|member| matches!(member, EnumMember::Str { .. }));
        if !all_int && !all_str {
            return Err(SchemaError::MixedEnumMembers);
        }

        if all_int {
            let mut converted = Vec::with_capacity(members.len());
            for member in members {
                let EnumMember::Int { name, value } = member else {
                    unreachable!()
                };
                let narrowed = i32::try_from(value)
                    .map_err(|_| SchemaError::EnumMemberOutOfRange {
                        name: name.clone(),
                        value,
                    })?;
                converted.push((name, narrowed));
            }
            return Ok(Schema::Enum(EnumSchema::Int(converted)));
        }

        Ok(Schema::Enum(EnumSchema::Str(
            members
                .into_iter()
                .map(|member| {
                    let EnumMember::Str { name } = member else {
                        unreachable!()
                    };
                    name
                })
                .collect(),
        )))
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Schema::I8 => "int8",
            Schema::I16 => "int16",
            Schema::I32 => "int32",
            Schema::I64 => "int64",
            Schema::U8 => "uint8",
            Schema::U16 => "uint16",
            Schema::U32 => "uint32",
            Schema::U64 => "uint64",
            Schema::F32 => "float32",
            Schema::F64 => "float64",
            Schema::Bytes => "bytes",
            Schema::String => "string",
            Schema::Array(_) => "array",
            Schema::Map(_) => "map",
            Schema::Optional(_) => "optional",
            Schema::OneOf(_) => "one-of",
            Schema::Enum(_) => "enum",
        }
    }

    /// The default value for this schema, built recursively
    pub fn create(&self) -> Value {
        match self {
            Schema::I8 => Value::I8(0),
            Schema::I16 => Value::I16(0),
            Schema::I32 => Value::I32(0),
            Schema::I64 => Value::I64(0),
            Schema::U8 => Value::U8(0),
            Schema::U16 => Value::U16(0),
            Schema::U32 => Value::U32(0),
            Schema::U64 => Value::U64(0),
            Schema::F32 => Value::F32(0.0),
            Schema::F64 => Value::F64(0.0),
            Schema::Bytes => Value::Bytes(Vec::new()),
            Schema::String => Value::String(String::new()),
            Schema::Array(_) => Value::Array(Vec::new()),
            Schema::Map(fields) => Value::Map(
                fields
                    .iter()
                    .map(|(name, child)| (name.clone(), child.create()))
                    .collect(),
            ),
            Schema::Optional(_) => Value::Optional(None),
            Schema::OneOf(variants) => {
                let (name, child) = &variants[0];
                Value::OneOf(name.clone(), Box::new(child.create()))
            }
            Schema::Enum(EnumSchema::Int(members)) => Value::I32(members[0].1),
            Schema::Enum(EnumSchema::Str(members)) => Value::String(members[0].clone()),
        }
    }

    /// Merge-with-defaults: the partial value wins where present, omitted
    /// map fields are filled from [`Self::create`], recursively
    pub fn extend(&self, partial: &Value) -> Result<Value, SchemaError> {
        match (self, partial) {
            (Schema::Map(fields), Value::Map(present)) => {
                let mut merged = BTreeMap::new();
                for (name, child) in fields {
                    let value = match present.get(name) {
                        Some(partial_child) => child.extend(partial_child)?,
                        None => child.create(),
                    };
                    merged.insert(name.clone(), value);
                }
                Ok(Value::Map(merged))
            }
            (Schema::Array(element), Value::Array(items)) => Ok(Value::Array(
                items
                    .iter()
                    .map(|item| element.extend(item))
                    .collect::<Result<_, _>>()?,
            )),
            (Schema::Optional(_), Value::Optional(None)) => Ok(Value::Optional(None)),
            (Schema::Optional(inner), Value::Optional(Some(present))) => {
                Ok(Value::some(inner.extend(present)?))
            }
            (Schema::OneOf(variants), Value::OneOf(variant, present)) => {
                let (_, child) = variants
                    .iter()
                    .find(|(name, _)| name == variant)
                    .ok_or_else(|| SchemaError::UnknownOneOfVariant {
                        variant: variant.clone(),
                    })?;
                Ok(Value::OneOf(variant.clone(), Box::new(child.extend(present)?)))
            }
            _ => {
                self.check_shape(partial)?;
                Ok(partial.clone())
            }
        }
    }

    /// Scalar shape agreement; composites are handled structurally by the
    /// callers above
    fn check_shape(&self, value: &Value) -> Result<(), SchemaError> {
        let matches = matches!(
            (self, value),
            (Schema::I8, Value::I8(_))
                | (Schema::I16, Value::I16(_))
                | (Schema::I32, Value::I32(_))
                | (Schema::I64, Value::I64(_))
                | (Schema::U8, Value::U8(_))
                | (Schema::U16, Value::U16(_))
                | (Schema::U32, Value::U32(_))
                | (Schema::U64, Value::U64(_))
                | (Schema::F32, Value::F32(_))
                | (Schema::F64, Value::F64(_))
                | (Schema::Bytes, Value::Bytes(_))
                | (Schema::String, Value::String(_))
                | (Schema::Enum(EnumSchema::Int(_)), Value::I32(_))
                | (Schema::Enum(EnumSchema::Str(_)), Value::String(_))
        );
        if !matches {
            return Err(SchemaError::ValueMismatch {
                expected: self.kind_name(),
                found: value.kind_name(),
            });
        }
        Ok(())
    }
}
