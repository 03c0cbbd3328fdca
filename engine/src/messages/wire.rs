use crate::types::Timestamp;
use crate::world::component::ComponentKind;
use crate::world::entity::Entity;

/// The operation tag carried by every wire message.
///
/// The network-scoped variants resolve exactly like their plain
/// counterparts; the tag marks replication that must never reach durable
/// storage, so persisting hosts can filter on it.
#[derive(Copy, Debug, Clone, Eq, PartialEq, Hash)]
pub enum OpKind {
    Put,
    Delete,
    PutNetwork,
    DeleteNetwork,
    Append,
}

impl OpKind {
    pub fn to_u8(self) -> u8 {
        match self {
            OpKind::Put => 0,
            OpKind::Delete => 1,
            OpKind::PutNetwork => 2,
            OpKind::DeleteNetwork => 3,
            OpKind::Append => 4,
        }
    }

    pub fn from_u8(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(OpKind::Put),
            1 => Some(OpKind::Delete),
            2 => Some(OpKind::PutNetwork),
            3 => Some(OpKind::DeleteNetwork),
            4 => Some(OpKind::Append),
            _ => None,
        }
    }

    /// PUT and APPEND variants carry schema-serialized bytes
    pub fn has_payload(self) -> bool {
        !self.is_delete()
    }

    pub fn is_delete(self) -> bool {
        matches!(self, OpKind::Delete | OpKind::DeleteNetwork)
    }

    pub fn is_put(self) -> bool {
        matches!(self, OpKind::Put | OpKind::PutNetwork)
    }

    pub fn is_network_scoped(self) -> bool {
        matches!(self, OpKind::PutNetwork | OpKind::DeleteNetwork)
    }
}

/// One CRDT operation as it travels between actors
#[derive(Debug, Clone, PartialEq)]
pub struct WireMessage {
    pub kind: OpKind,
    pub entity: Entity,
    pub component: ComponentKind,
    pub timestamp: Timestamp,
    /// Present exactly when `kind.has_payload()`
    pub payload: Option<Vec<u8>>,
}

impl WireMessage {
    pub fn put(
        entity: Entity,
        component: ComponentKind,
        timestamp: Timestamp,
        payload: Vec<u8>,
        network_scoped: bool,
    ) -> Self {
        Self {
            kind: if network_scoped {
                OpKind::PutNetwork
            } else {
                OpKind::Put
            },
            entity,
            component,
            timestamp,
            payload: Some(payload),
        }
    }

    pub fn delete(
        entity: Entity,
        component: ComponentKind,
        timestamp: Timestamp,
        network_scoped: bool,
    ) -> Self {
        Self {
            kind: if network_scoped {
                OpKind::DeleteNetwork
            } else {
                OpKind::Delete
            },
            entity,
            component,
            timestamp,
            payload: None,
        }
    }

    pub fn append(
        entity: Entity,
        component: ComponentKind,
        timestamp: Timestamp,
        payload: Vec<u8>,
    ) -> Self {
        Self {
            kind: OpKind::Append,
            entity,
            component,
            timestamp,
            payload: Some(payload),
        }
    }

    pub fn payload_bytes(&self) -> Option<&[u8]> {
        self.payload.as_deref()
    }
}
