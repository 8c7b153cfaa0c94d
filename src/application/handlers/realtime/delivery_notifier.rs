//! LiveDeliveryNotifier - Pushes freshly stored messages to connected recipients.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::foundation::UserId;
use crate::domain::realtime::OutboundEvent;
use crate::ports::{ConnectionRegistry, DeliveryNotifier};

pub struct LiveDeliveryNotifier {
    registry: Arc<dyn ConnectionRegistry>,
}

impl LiveDeliveryNotifier {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl DeliveryNotifier for LiveDeliveryNotifier {
    async fn notify(&self, recipient_id: &UserId, payload: serde_json::Value) -> bool {
        let Some(target) = self.registry.resolve(recipient_id).await else {
            tracing::trace!(recipient_id = %recipient_id, "Recipient offline, live delivery skipped");
            return false;
        };

        let outcome = target.push(OutboundEvent::NewMessage { payload });
        if !outcome.is_queued() {
            tracing::debug!(
                recipient_id = %recipient_id,
                connection_id = %target.id(),
                outcome = ?outcome,
                "New message not accepted by recipient connection"
            );
        }
        outcome.is_queued()
    }
}
