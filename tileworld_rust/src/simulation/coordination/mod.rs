//! Coordination between agents over a shared broadcast bus.

mod bus;
mod gossip;
mod message;

pub use bus::MessageBus;
pub use gossip::Gossip;
pub use message::{AgentId, Message, MessageKind, Recipient};
