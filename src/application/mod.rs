//! Application layer - Presence, routing and delivery services.
//!
//! This layer coordinates the connection registry with the transports that
//! drive it. Adapters call into these services; they never touch the
//! registry's state directly.

pub mod handlers;

pub use handlers::{
    Announcement, ConnectionLifecycle, EventRouter, LiveDeliveryNotifier, PresenceBroadcaster,
    RealtimeServices, RouteOutcome,
};
