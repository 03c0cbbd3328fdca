//! Bootstrapping a fresh actor: a full-state dump followed by incremental
//! deltas from the moment the dump was taken. Omitting the dump (or racing
//! it against deltas) is what breaks convergence, so the dump path gets its
//! own coverage.

use concord_engine::{Engine, EngineConfig, Entity};
use concord_serde::Value;

use concord_test::helpers::{
    event_value, init_logs, position_value, register_components, ActorPair,
};

#[test]
fn dump_seeds_a_fresh_actor() {
    init_logs();
    let mut pair = ActorPair::new();

    let mover = pair.left.spawn_entity().unwrap();
    let scorer = pair.left.spawn_entity().unwrap();
    {
        let world = pair.left.world_mut();
        world
            .last_write_win_mut(pair.protocol.position)
            .unwrap()
            .insert(mover, position_value(3.0, 4.0))
            .unwrap();
        world
            .last_write_win_mut(pair.protocol.health)
            .unwrap()
            .insert(scorer, Value::U8(90))
            .unwrap();
        world
            .grow_only_mut(pair.protocol.events)
            .unwrap()
            .add_value(scorer, event_value(1.0, 11));
    }
    // Establish non-zero clocks before the dump
    pair.left.tick().unwrap();
    pair.drain_left();

    let dump = pair.left.world().dump().unwrap();

    let mut newcomer = Engine::new(EngineConfig::default());
    let protocol = register_components(&mut newcomer);
    newcomer.bootstrap_from(&dump).unwrap();

    assert!(newcomer.world().entity_exists(mover));
    assert!(newcomer.world().entity_exists(scorer));
    assert_eq!(
        ActorPair::lww_state(&newcomer, protocol.position, mover),
        ActorPair::lww_state(&pair.left, pair.protocol.position, mover),
    );
    assert_eq!(
        ActorPair::lww_state(&newcomer, protocol.health, scorer),
        ActorPair::lww_state(&pair.left, pair.protocol.health, scorer),
    );
    assert_eq!(
        newcomer
            .world()
            .grow_only(protocol.events)
            .unwrap()
            .values(scorer)
            .len(),
        1
    );
}

#[test]
fn bootstrapped_actor_never_reallocates_seen_entities() {
    init_logs();
    let mut pair = ActorPair::new();

    let taken = pair.left.spawn_entity().unwrap();
    pair.left.tick().unwrap();
    pair.drain_left();

    let dump = pair.left.world().dump().unwrap();

    let mut newcomer = Engine::new(EngineConfig::default());
    register_components(&mut newcomer);
    newcomer.bootstrap_from(&dump).unwrap();

    let fresh = newcomer.spawn_entity().unwrap();
    assert!(fresh.to_raw() > taken.to_raw());
}

#[test]
fn deltas_after_the_dump_keep_converging() {
    init_logs();
    let mut pair = ActorPair::new();

    let entity = pair.left.spawn_entity().unwrap();
    pair.left
        .world_mut()
        .last_write_win_mut(pair.protocol.health)
        .unwrap()
        .insert(entity, Value::U8(10))
        .unwrap();
    pair.left.tick().unwrap();
    pair.drain_left();

    // Right boots from the dump instead of having watched history
    let dump = pair.left.world().dump().unwrap();
    pair.right.bootstrap_from(&dump).unwrap();

    *pair
        .left
        .world_mut()
        .last_write_win_mut(pair.protocol.health)
        .unwrap()
        .get_mut(entity)
        .unwrap() = Value::U8(11);

    assert!(pair.settle(8));
    pair.assert_lww_converged(pair.protocol.health, entity);
    let (_, payload) = ActorPair::lww_state(&pair.right, pair.protocol.health, entity);
    assert_eq!(payload, Some(vec![11]));
}

#[test]
fn filtered_dump_excludes_predicated_entities() {
    init_logs();
    let mut pair = ActorPair::new();

    let kept = pair.left.spawn_entity().unwrap();
    let excluded = pair.left.spawn_entity().unwrap();
    {
        let world = pair.left.world_mut();
        let health = world.last_write_win_mut(pair.protocol.health).unwrap();
        health.insert(kept, Value::U8(1)).unwrap();
        health.insert(excluded, Value::U8(2)).unwrap();
    }
    pair.left.tick().unwrap();
    pair.drain_left();

    let dump = pair
        .left
        .world()
        .dump_filtered(|entity: Entity| entity != excluded)
        .unwrap();

    let mut newcomer = Engine::new(EngineConfig::default());
    let protocol = register_components(&mut newcomer);
    newcomer.bootstrap_from(&dump).unwrap();

    assert!(newcomer.world().entity_exists(kept));
    assert!(!newcomer.world().entity_exists(excluded));
    assert!(!newcomer
        .world()
        .last_write_win(protocol.health)
        .unwrap()
        .contains(excluded));
}
