pub mod actor_pair;
pub mod channel_transport;
pub mod test_protocol;

pub use actor_pair::ActorPair;
pub use channel_transport::ChannelTransport;
pub use test_protocol::{event_value, position_value, register_components, TestProtocol};

/// Idempotent logger setup for integration tests
pub fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}
