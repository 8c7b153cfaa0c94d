//! Wiring of the relay handlers around one shared registry.

use std::sync::Arc;

use crate::ports::{ConnectionRegistry, DeliveryNotifier};

use super::{ConnectionLifecycle, EventRouter, LiveDeliveryNotifier, PresenceBroadcaster};

/// Every relay service, sharing a single [`ConnectionRegistry`].
#[derive(Clone)]
pub struct RealtimeServices {
    pub registry: Arc<dyn ConnectionRegistry>,
    pub broadcaster: Arc<PresenceBroadcaster>,
    pub router: Arc<EventRouter>,
    pub lifecycle: Arc<ConnectionLifecycle>,
    pub notifier: Arc<dyn DeliveryNotifier>,
}

impl RealtimeServices {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        let broadcaster = Arc::new(PresenceBroadcaster::new(registry.clone()));
        Self {
            router: Arc::new(EventRouter::new(registry.clone())),
            lifecycle: Arc::new(ConnectionLifecycle::new(
                registry.clone(),
                broadcaster.clone(),
            )),
            notifier: Arc::new(LiveDeliveryNotifier::new(registry.clone())),
            broadcaster,
            registry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::registry::InMemoryConnectionRegistry;
    use crate::domain::foundation::UserId;
    use crate::ports::ConnectionHandle;

    #[tokio::test]
    async fn services_share_one_registry() {
        let services = RealtimeServices::new(Arc::new(InMemoryConnectionRegistry::new()));
        let (handle, _mailbox) = ConnectionHandle::channel(4);

        services.lifecycle.open(Some("alice"), handle).await;

        let alice = UserId::new("alice").unwrap();
        assert!(services.registry.resolve(&alice).await.is_some());
        assert!(services.notifier.notify(&alice, serde_json::json!({})).await);
    }
}
