//! Property tests: schema round-trips over arbitrary valid values, and
//! order-independence of last-write-win application over random message
//! sets.

use proptest::prelude::*;

use concord_engine::{
    ComponentKind, Entity, LastWriteWinStore, ReplicationScope, Timestamp, WireMessage,
};
use concord_serde::{ByteBuffer, Schema, Value};

fn player_schema() -> Schema {
    Schema::map([
        ("position", Schema::map([("x", Schema::F32), ("y", Schema::F32)])),
        ("name", Schema::String),
        ("tags", Schema::array(Schema::U16)),
        ("parent", Schema::optional(Schema::U32)),
    ])
}

fn arb_player_value() -> impl Strategy<Value = Value> {
    (
        -1.0e6f32..1.0e6f32,
        -1.0e6f32..1.0e6f32,
        ".{0,12}",
        prop::collection::vec(any::<u16>(), 0..4),
        prop::option::of(any::<u32>()),
    )
        .prop_map(|(x, y, name, tags, parent)| {
            Value::map([
                ("position", Value::map([("x", Value::F32(x)), ("y", Value::F32(y))])),
                ("name", Value::String(name)),
                ("tags", Value::Array(tags.into_iter().map(Value::U16).collect())),
                (
                    "parent",
                    match parent {
                        Some(id) => Value::some(Value::U32(id)),
                        None => Value::none(),
                    },
                ),
            ])
        })
}

#[derive(Debug, Clone)]
enum ArbOp {
    Put { timestamp: Timestamp, byte: u8 },
    Delete { timestamp: Timestamp },
}

fn arb_op() -> impl Strategy<Value = ArbOp> {
    prop_oneof![
        (0u32..5, any::<u8>()).prop_map(|(timestamp, byte)| ArbOp::Put { timestamp, byte }),
        (0u32..5).prop_map(|timestamp| ArbOp::Delete { timestamp }),
    ]
}

fn to_message(op: &ArbOp, entity: Entity, component: ComponentKind) -> WireMessage {
    match op {
        ArbOp::Put { timestamp, byte } => {
            let payload = Schema::U8.to_payload(&Value::U8(*byte)).unwrap();
            WireMessage::put(entity, component, *timestamp, payload, false)
        }
        ArbOp::Delete { timestamp } => WireMessage::delete(entity, component, *timestamp, false),
    }
}

fn final_state(
    ops: &[ArbOp],
    order: &[usize],
    entity: Entity,
) -> (Option<Timestamp>, Option<Vec<u8>>) {
    let mut store = LastWriteWinStore::new("health", Schema::U8, ReplicationScope::Durable);
    for index in order {
        let message = to_message(&ops[*index], entity, store.kind());
        store.apply(&message).unwrap();
    }
    let payload = store
        .get(entity)
        .map(|value| store.schema().to_payload(value).unwrap());
    (store.clock(entity), payload)
}

proptest! {
    #[test]
    fn schema_round_trip(value in arb_player_value()) {
        let schema = player_schema();
        let payload = schema.to_payload(&value).unwrap();
        prop_assert_eq!(schema.from_payload(&payload).unwrap(), value);
    }

    #[test]
    fn buffer_blob_sequences_round_trip(blobs in prop::collection::vec(
        prop::collection::vec(any::<u8>(), 0..300),
        1..8,
    )) {
        let mut buffer = ByteBuffer::new();
        for blob in &blobs {
            buffer.write_bytes(blob);
        }
        for blob in &blobs {
            prop_assert_eq!(&buffer.read_bytes().unwrap(), blob);
        }
        prop_assert_eq!(buffer.remaining(), 0);
    }

    #[test]
    fn lww_application_is_order_independent(
        ops in prop::collection::vec(arb_op(), 1..6),
        seed in any::<u64>(),
    ) {
        let entity = Entity::from_raw(1);
        let forward: Vec<usize> = (0..ops.len()).collect();

        // A cheap deterministic shuffle driven by the seed
        let mut shuffled = forward.clone();
        let mut state = seed.wrapping_add(1);
        for index in (1..shuffled.len()).rev() {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let pick = (state >> 33) as usize % (index + 1);
            shuffled.swap(index, pick);
        }

        prop_assert_eq!(
            final_state(&ops, &forward, entity),
            final_state(&ops, &shuffled, entity)
        );
    }

    #[test]
    fn lww_application_is_idempotent_under_duplication(
        ops in prop::collection::vec(arb_op(), 1..5),
    ) {
        let entity = Entity::from_raw(1);
        let forward: Vec<usize> = (0..ops.len()).collect();

        // Replay the whole sequence twice over
        let doubled: Vec<usize> = forward.iter().chain(forward.iter()).copied().collect();

        prop_assert_eq!(
            final_state(&ops, &forward, entity),
            final_state(&ops, &doubled, entity)
        );
    }
}
