//! PresenceBroadcaster - Pushes the full online-user set to every connection.
//!
//! Each announcement is a complete snapshot rather than a diff, so the most
//! recent one a client received is always authoritative and a dropped
//! announcement heals on the next change.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::domain::foundation::UserId;
use crate::domain::realtime::OutboundEvent;
use crate::ports::ConnectionRegistry;

/// Result of one announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub online: Vec<UserId>,
    /// Connections the snapshot was offered to.
    pub audience: usize,
    /// Connections whose buffer accepted the snapshot.
    pub queued: usize,
}

pub struct PresenceBroadcaster {
    registry: Arc<dyn ConnectionRegistry>,
    /// Held across snapshot and fan-out so clients receive snapshots in the order they were taken.
    announcing: Mutex<()>,
}

impl PresenceBroadcaster {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self {
            registry,
            announcing: Mutex::new(()),
        }
    }

    /// Sends `online-set-changed` with the current online users to all live connections.
    ///
    /// Announcements are serialized: a later announcement always snapshots
    /// after an earlier one has finished pushing. The registry lock itself is
    /// released before any push.
    pub async fn announce(&self) -> Announcement {
        let _ordered = self.announcing.lock().await;
        let snapshot = self.registry.snapshot().await;

        let mut queued = 0;
        for handle in &snapshot.audience {
            let outcome = handle.push(OutboundEvent::OnlineUsers {
                user_ids: snapshot.online.clone(),
            });
            if outcome.is_queued() {
                queued += 1;
            } else {
                tracing::debug!(
                    connection_id = %handle.id(),
                    outcome = ?outcome,
                    "Presence snapshot not delivered"
                );
            }
        }

        tracing::debug!(
            online = snapshot.online.len(),
            audience = snapshot.audience.len(),
            queued,
            "Presence announced"
        );

        Announcement {
            online: snapshot.online,
            audience: snapshot.audience.len(),
            queued,
        }
    }
}
