//! Wire layout for one operation: kind u8, entity u32, component u32,
//! timestamp u32, then for payload-bearing kinds a u32 length followed by
//! payload bytes. Self-delimiting, so many messages concatenate into one
//! buffer with no external framing; full-state dumps and batched deltas
//! both rely on that.

use concord_serde::ByteBuffer;

use crate::messages::error::MessageError;
use crate::messages::wire::{OpKind, WireMessage};
use crate::world::component::ComponentKind;
use crate::world::entity::Entity;

pub fn write_message(message: &WireMessage, buffer: &mut ByteBuffer) -> Result<(), MessageError> {
    buffer.write_u8(message.kind.to_u8());
    buffer.write_u32(message.entity.to_raw());
    buffer.write_u32(message.component.to_raw());
    buffer.write_u32(message.timestamp);

    match (&message.payload, message.kind.has_payload()) {
        (Some(payload), true) => buffer.write_bytes(payload),
        (None, false) => {}
        (None, true) => {
            return Err(MessageError::MissingPayload { kind: message.kind });
        }
        (Some(_), false) => {
            return Err(MessageError::UnexpectedPayload { kind: message.kind });
        }
    }
    Ok(())
}

pub fn read_message(buffer: &mut ByteBuffer) -> Result<WireMessage, MessageError> {
    let tag = buffer.read_u8()?;
    let kind = OpKind::from_u8(tag).ok_or(MessageError::UnknownOpTag { tag })?;
    let entity = Entity::from_raw(buffer.read_u32()?);
    let component = ComponentKind::from_raw(buffer.read_u32()?);
    let timestamp = buffer.read_u32()?;

    let payload = if kind.has_payload() {
        Some(buffer.read_bytes()?)
    } else {
        None
    };

    Ok(WireMessage {
        kind,
        entity,
        component,
        timestamp,
        payload,
    })
}

pub fn write_all_messages(
    messages: &[WireMessage],
    buffer: &mut ByteBuffer,
) -> Result<(), MessageError> {
    for message in messages {
        write_message(message, buffer)?;
    }
    Ok(())
}

/// Drains every concatenated message left in the buffer
pub fn read_all_messages(buffer: &mut ByteBuffer) -> Result<Vec<WireMessage>, MessageError> {
    let mut messages = Vec::new();
    while buffer.remaining() > 0 {
        messages.push(read_message(buffer)?);
    }
    Ok(messages)
}
