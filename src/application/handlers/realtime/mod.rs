//! Real-time relay handlers: presence, signaling, live delivery, lifecycle.

mod connection_lifecycle;
mod delivery_notifier;
mod event_router;
mod presence_broadcaster;
mod services;

pub use connection_lifecycle::ConnectionLifecycle;
pub use delivery_notifier::LiveDeliveryNotifier;
pub use event_router::{EventRouter, RouteOutcome};
pub use presence_broadcaster::{Announcement, PresenceBroadcaster};
pub use services::RealtimeServices;
