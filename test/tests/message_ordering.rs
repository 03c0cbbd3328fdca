//! Order-independence of message application, checked at the store level:
//! for any fixed message set, every arrival order (with or without
//! duplicates) must land every replica on the same (timestamp, bytes) pair.

use concord_engine::{
    Entity, LastWriteWinStore, ReplicationScope, Timestamp, WireMessage,
};
use concord_serde::{Schema, Value};

fn fresh_store() -> LastWriteWinStore {
    LastWriteWinStore::new("health", Schema::U8, ReplicationScope::Durable)
}

fn state(store: &LastWriteWinStore, entity: Entity) -> (Option<Timestamp>, Option<Vec<u8>>) {
    let payload = store
        .get(entity)
        .map(|value| store.schema().to_payload(value).unwrap());
    (store.clock(entity), payload)
}

fn apply_sequence(messages: &[&WireMessage]) -> (Option<Timestamp>, Option<Vec<u8>>) {
    let mut store = fresh_store();
    for message in messages {
        store.apply(message).unwrap();
    }
    state(&store, messages[0].entity)
}

fn put(entity: Entity, timestamp: Timestamp, byte: u8) -> WireMessage {
    let payload = Schema::U8.to_payload(&Value::U8(byte)).unwrap();
    WireMessage::put(entity, concord_engine::ComponentKind::of("health"), timestamp, payload, false)
}

fn delete(entity: Entity, timestamp: Timestamp) -> WireMessage {
    WireMessage::delete(entity, concord_engine::ComponentKind::of("health"), timestamp, false)
}

#[test]
fn pairwise_commutativity() {
    let entity = Entity::from_raw(1);
    let cases = [
        (put(entity, 2, 5), put(entity, 1, 9)),
        (put(entity, 1, 4), delete(entity, 1)),
        (put(entity, 1, 2), put(entity, 1, 4)),
        (delete(entity, 3), put(entity, 2, 8)),
        (delete(entity, 2), delete(entity, 2)),
    ];

    for (first, second) in &cases {
        let forward = apply_sequence(&[first, second]);
        let backward = apply_sequence(&[second, first]);
        assert_eq!(
            forward, backward,
            "applying {first:?} / {second:?} was order-dependent"
        );
    }
}

#[test]
fn idempotence_under_redelivery() {
    let entity = Entity::from_raw(1);
    let message = put(entity, 3, 7);

    let once = apply_sequence(&[&message]);
    let thrice = apply_sequence(&[&message, &message, &message]);
    assert_eq!(once, thrice);

    let removal = delete(entity, 4);
    let single = apply_sequence(&[&message, &removal]);
    let repeated = apply_sequence(&[&message, &removal, &removal, &message]);
    assert_eq!(single, repeated);
}

#[test]
fn every_permutation_of_three_messages_converges() {
    let entity = Entity::from_raw(1);
    let a = put(entity, 1, 2);
    let b = put(entity, 1, 4);
    let c = delete(entity, 2);

    let permutations: [[&WireMessage; 3]; 6] = [
        [&a, &b, &c],
        [&a, &c, &b],
        [&b, &a, &c],
        [&b, &c, &a],
        [&c, &a, &b],
        [&c, &b, &a],
    ];

    let reference = apply_sequence(&permutations[0]);
    for permutation in &permutations[1..] {
        assert_eq!(apply_sequence(permutation), reference);
    }

    // The delete carries the highest clock, so it must have won everywhere
    assert_eq!(reference, (Some(2), None));
}

#[test]
fn equal_clock_tie_break_end_to_end() {
    // Store holds (timestamp=1, data=[2])
    let entity = Entity::from_raw(1);
    let mut store = fresh_store();
    store.apply(&put(entity, 1, 2)).unwrap();

    // Re-applying the identical put is a no-op without a correction
    let outcome = store.apply(&put(entity, 1, 2)).unwrap();
    assert!(!outcome.accepted);
    assert!(outcome.correction.is_none());

    // Wire byte 4 beats stored byte 2 at the same clock, silently
    let outcome = store.apply(&put(entity, 1, 4)).unwrap();
    assert!(outcome.accepted);
    assert_eq!(state(&store, entity), (Some(1), Some(vec![4])));

    // A delete at the same clock loses to the stored byte and draws the
    // full-state correction back out
    let outcome = store.apply(&delete(entity, 1)).unwrap();
    assert!(!outcome.accepted);
    let correction = outcome.correction.unwrap();
    assert_eq!(correction.timestamp, 1);
    assert_eq!(correction.payload, Some(vec![4]));
    assert_eq!(state(&store, entity), (Some(1), Some(vec![4])));
}
