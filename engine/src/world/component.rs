use std::fmt;

/// Component ids below this value are reserved for built-in components and
/// come from the static name table; everything else is hashed above it.
pub const STATIC_KIND_CEILING: u32 = 1 << 11;

// Index in this table is the component id. Room below the ceiling is left
// for hosts that ship their own built-in component schemas.
const STATIC_KINDS: &[&str] = &["entity"];

/// Identifies one component store across every actor. Derived from the
/// registered component name, never assigned at runtime, so independently
/// built actors agree on ids without negotiation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentKind(u32);

impl ComponentKind {
    /// The liveness marker component; deleting it deletes the entity
    pub const ENTITY_MARKER: ComponentKind = ComponentKind(0);

    /// Static names map to their reserved table id; any other name is
    /// CRC32-hashed over its UTF-8 bytes and offset above the ceiling
    pub fn of(name: &str) -> Self {
        if let Some(index) = STATIC_KINDS.iter().position(|known| *known == name) {
            return ComponentKind(index as u32);
        }
        ComponentKind(crc32fast::hash(name.as_bytes()).wrapping_add(STATIC_KIND_CEILING))
    }

    pub const fn from_raw(id: u32) -> Self {
        ComponentKind(id)
    }

    pub const fn to_raw(self) -> u32 {
        self.0
    }

    pub fn is_static(self) -> bool {
        self.0 < STATIC_KIND_CEILING
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}
