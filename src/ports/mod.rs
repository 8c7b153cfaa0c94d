//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the relay's application services and the outside world. Adapters
//! implement these ports.
//!
//! - `ConnectionRegistry` - Live connection tracking and presence
//! - `DeliveryNotifier` - Hook the message persistence collaborator calls

mod connection_registry;
mod delivery_notifier;

pub use connection_registry::{
    ConnectionHandle, ConnectionMailbox, ConnectionRegistry, PresenceSnapshot, PushOutcome,
    Registration, Unregistration,
};
pub use delivery_notifier::DeliveryNotifier;
