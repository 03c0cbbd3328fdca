use crate::byte_buffer::ByteBuffer;
use crate::error::SchemaError;
use crate::schema::{EnumSchema, Schema};
use crate::value::Value;

impl Schema {
    /// Writes `value` at the buffer's write cursor. The value must have this
    /// schema's shape; a mismatch is an error, never a coercion.
    pub fn serialize(&self, value: &Value, buffer: &mut ByteBuffer) -> Result<(), SchemaError> {
        match (self, value) {
            (Schema::I8, Value::I8(value)) => buffer.write_i8(*value),
            (Schema::I16, Value::I16(value)) => buffer.write_i16(*value),
            (Schema::I32, Value::I32(value)) => buffer.write_i32(*value),
            (Schema::I64, Value::I64(value)) => buffer.write_i64(*value),
            (Schema::U8, Value::U8(value)) => buffer.write_u8(*value),
            (Schema::U16, Value::U16(value)) => buffer.write_u16(*value),
            (Schema::U32, Value::U32(value)) => buffer.write_u32(*value),
            (Schema::U64, Value::U64(value)) => buffer.write_u64(*value),
            (Schema::F32, Value::F32(value)) => buffer.write_f32(*value),
            (Schema::F64, Value::F64(value)) => buffer.write_f64(*value),
            (Schema::Bytes, Value::Bytes(value)) => buffer.write_bytes(value),
            (Schema::String, Value::String(value)) => buffer.write_string(value),
            (Schema::Array(element), Value::Array(items)) => {
                buffer.write_u32(items.len() as u32);
                for item in items {
                    element.serialize(item, buffer)?;
                }
            }
            (Schema::Map(fields), Value::Map(present)) => {
                // Field-declaration order is the wire order
                for (name, child) in fields {
                    let field_value =
                        present
                            .get(name)
                            .ok_or_else(|| SchemaError::MissingField {
                                field: name.clone(),
                            })?;
                    child.serialize(field_value, buffer)?;
                }
            }
            (Schema::Optional(_), Value::Optional(None)) => buffer.write_u8(0),
            (Schema::Optional(inner), Value::Optional(Some(present))) => {
                buffer.write_u8(1);
                inner.serialize(present, buffer)?;
            }
            (Schema::OneOf(variants), Value::OneOf(variant, present)) => {
                let index = variants
                    .iter()
                    .position(|(name, _)| name == variant)
                    .ok_or_else(|| SchemaError::UnknownOneOfVariant {
                        variant: variant.clone(),
                    })?;
                buffer.write_u8(index as u8);
                variants[index].1.serialize(present, buffer)?;
            }
            (Schema::Enum(EnumSchema::Int(members)), Value::I32(value)) => {
                if !members.iter().any(|(_, member)| member == value) {
                    return Err(SchemaError::UnknownEnumMember {
                        value: value.to_string(),
                    });
                }
                buffer.write_i32(*value);
            }
            (Schema::Enum(EnumSchema::Str(members)), Value::String(value)) => {
                if !members.iter().any(|member| member == value) {
                    return Err(SchemaError::UnknownEnumMember {
                        value: value.clone(),
                    });
                }
                buffer.write_string(value);
            }
            (schema, value) => {
                return Err(SchemaError::ValueMismatch {
                    expected: schema.kind_name(),
                    found: value.kind_name(),
                });
            }
        }
        Ok(())
    }

    /// Reads a value of this schema's shape at the buffer's read cursor.
    /// Unknown one-of and enum tags are fatal; there is no
    /// forward-compatible skip at this layer.
    pub fn deserialize(&self, buffer: &mut ByteBuffer) -> Result<Value, SchemaError> {
        let value = match self {
            Schema::I8 => Value::I8(buffer.read_i8()?),
            Schema::I16 => Value::I16(buffer.read_i16()?),
            Schema::I32 => Value::I32(buffer.read_i32()?),
            Schema::I64 => Value::I64(buffer.read_i64()?),
            Schema::U8 => Value::U8(buffer.read_u8()?),
            Schema::U16 => Value::U16(buffer.read_u16()?),
            Schema::U32 => Value::U32(buffer.read_u32()?),
            Schema::U64 => Value::U64(buffer.read_u64()?),
            Schema::F32 => Value::F32(buffer.read_f32()?),
            Schema::F64 => Value::F64(buffer.read_f64()?),
            Schema::Bytes => Value::Bytes(buffer.read_bytes()?),
            Schema::String => Value::String(buffer.read_string()?),
            Schema::Array(element) => {
                let length = buffer.read_u32()? as usize;
                let mut items = Vec::with_capacity(length.min(4096));
                for _ in 0..length {
                    items.push(element.deserialize(buffer)?);
                }
                Value::Array(items)
            }
            Schema::Map(fields) => {
                let mut present = std::collections::BTreeMap::new();
                for (name, child) in fields {
                    present.insert(name.clone(), child.deserialize(buffer)?);
                }
                Value::Map(present)
            }
            Schema::Optional(inner) => match buffer.read_u8()? {
                0 => Value::Optional(None),
                _ => Value::some(inner.deserialize(buffer)?),
            },
            Schema::OneOf(variants) => {
                let index = buffer.read_u8()?;
                let (name, child) = variants.get(index as usize).ok_or(
                    SchemaError::UnknownOneOfIndex {
                        index,
                        count: variants.len(),
                    },
                )?;
                Value::OneOf(name.clone(), Box::new(child.deserialize(buffer)?))
            }
            Schema::Enum(EnumSchema::Int(members)) => {
                let value = buffer.read_i32()?;
                if !members.iter().any(|(_, member)| *member == value) {
                    return Err(SchemaError::UnknownEnumMember {
                        value: value.to_string(),
                    });
                }
                Value::I32(value)
            }
            Schema::Enum(EnumSchema::Str(members)) => {
                let value = buffer.read_string()?;
                if !members.iter().any(|member| *member == value) {
                    return Err(SchemaError::UnknownEnumMember { value });
                }
                Value::String(value)
            }
        };
        Ok(value)
    }

    /// Serializes into a fresh buffer and returns the payload bytes
    pub fn to_payload(&self, value: &Value) -> Result<Vec<u8>, SchemaError> {
        let mut buffer = ByteBuffer::new();
        self.serialize(value, &mut buffer)?;
        Ok(buffer.to_bytes())
    }

    /// Deserializes from standalone payload bytes
    pub fn from_payload(&self, payload: &[u8]) -> Result<Value, SchemaError> {
        let mut buffer = ByteBuffer::from_bytes(payload);
        self.deserialize(&mut buffer)
    }
}
