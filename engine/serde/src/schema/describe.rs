use serde_json::{json, Value as JsonValue};

use crate::schema::{EnumSchema, Schema};

impl Schema {
    /// JSON-shaped description of this schema, carried out-of-band for
    /// reflection and tooling. Wire decoding never consults it.
    pub fn describe(&self) -> JsonValue {
        match self {
            Schema::Array(element) => json!({
                "type": "array",
                "element": element.describe(),
            }),
            Schema::Map(fields) => json!({
                "type": "map",
                "fields": fields
                    .iter()
                    .map(|(name, child)| json!({ "name": name, "schema": child.describe() }))
                    .collect::<Vec<_>>(),
            }),
            Schema::Optional(inner) => json!({
                "type": "optional",
                "inner": inner.describe(),
            }),
            Schema::OneOf(variants) => json!({
                "type": "one-of",
                "variants": variants
                    .iter()
                    .map(|(name, child)| json!({ "name": name, "schema": child.describe() }))
                    .collect::<Vec<_>>(),
            }),
            Schema::Enum(EnumSchema::Int(members)) => json!({
                "type": "enum",
                "primitive": "int32",
                "members": members
                    .iter()
                    .map(|(name, value)| json!({ "name": name, "value": value }))
                    .collect::<Vec<_>>(),
            }),
            Schema::Enum(EnumSchema::Str(members)) => json!({
                "type": "enum",
                "primitive": "string",
                "members": members,
            }),
            primitive => json!({ "type": primitive.kind_name() }),
        }
    }
}
