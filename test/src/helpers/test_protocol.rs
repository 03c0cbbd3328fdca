use concord_engine::{ComponentKind, Engine, StoreSettings};
use concord_serde::{Schema, Value};

/// The component set shared by every integration test actor. Registration
/// must be identical on every engine or the positional payloads will not
/// line up.
#[derive(Clone, Copy, Debug)]
pub struct TestProtocol {
    pub position: ComponentKind,
    pub health: ComponentKind,
    pub events: ComponentKind,
}

pub fn register_components(engine: &mut Engine) -> TestProtocol {
    let position = engine
        .world_mut()
        .define_component(
            "position",
            StoreSettings::last_write_win(Schema::map([("x", Schema::F32), ("y", Schema::F32)])),
        )
        .expect("position registration");

    let health = engine
        .world_mut()
        .define_component("health", StoreSettings::last_write_win(Schema::U8))
        .expect("health registration");

    let events = engine
        .world_mut()
        .define_component(
            "events",
            StoreSettings::grow_only(
                Schema::map([("at", Schema::F64), ("code", Schema::U16)]),
                8,
                |value| {
                    value
                        .as_map()
                        .and_then(|fields| fields.get("at"))
                        .and_then(Value::as_f64)
                        .unwrap_or(0.0)
                },
            ),
        )
        .expect("events registration");

    TestProtocol {
        position,
        health,
        events,
    }
}

pub fn position_value(x: f32, y: f32) -> Value {
    Value::map([("x", Value::F32(x)), ("y", Value::F32(y))])
}

pub fn event_value(at: f64, code: u16) -> Value {
    Value::map([("at", Value::F64(at)), ("code", Value::U16(code))])
}
