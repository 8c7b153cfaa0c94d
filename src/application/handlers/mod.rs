//! Application handlers.
//!
//! Services that orchestrate the registry port on behalf of the adapters.

pub mod realtime;

pub use realtime::{
    Announcement, ConnectionLifecycle, EventRouter, LiveDeliveryNotifier, PresenceBroadcaster,
    RealtimeServices, RouteOutcome,
};
