//! Real-time relay vocabulary: signaling events and the connection lifecycle.

mod connection_state;
mod event;

pub use connection_state::ConnectionState;
pub use event::{EventKind, InboundEvent, OutboundEvent};
