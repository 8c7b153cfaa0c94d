//! ConnectionLifecycle - Handshake and close handling for one transport.
//!
//! Drives [`ConnectionState`] and keeps the registry and presence broadcasts
//! in step with it:
//!
//! - handshake with a valid user id: register, close any superseded
//!   connection of that user, announce presence
//! - handshake without one: attach anonymously, no announcement
//! - close: unregister, announce only if a user went offline

use std::sync::Arc;

use crate::domain::foundation::{ConnectionId, StateMachine, UserId};
use crate::domain::realtime::ConnectionState;
use crate::ports::{ConnectionHandle, ConnectionRegistry};

use super::presence_broadcaster::PresenceBroadcaster;

pub struct ConnectionLifecycle {
    registry: Arc<dyn ConnectionRegistry>,
    broadcaster: Arc<PresenceBroadcaster>,
}

impl ConnectionLifecycle {
    pub fn new(registry: Arc<dyn ConnectionRegistry>, broadcaster: Arc<PresenceBroadcaster>) -> Self {
        Self {
            registry,
            broadcaster,
        }
    }

    /// Process a successful handshake. `handshake_user_id` is the raw query value.
    pub async fn open(
        &self,
        handshake_user_id: Option<&str>,
        handle: ConnectionHandle,
    ) -> ConnectionState {
        let connection_id = handle.id();
        let target = ConnectionState::after_handshake(UserId::from_handshake(handshake_user_id));
        let state = match ConnectionState::Connecting.transition_to(target) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(connection_id = %connection_id, "Handshake transition rejected: {}", e);
                ConnectionState::Anonymous
            }
        };

        match &state {
            ConnectionState::Registered(user_id) => {
                let registration = self.registry.register(user_id.clone(), handle).await;
                if let Some(old) = registration.superseded {
                    old.request_close();
                }
                tracing::info!(user_id = %user_id, connection_id = %connection_id, "User connected");
                self.broadcaster.announce().await;
            }
            _ => {
                self.registry.attach(handle).await;
                tracing::info!(connection_id = %connection_id, "Anonymous connection opened");
            }
        }

        state
    }

    /// Process a transport close. Redundant closes are ignored.
    pub async fn close(
        &self,
        connection_id: &ConnectionId,
        state: ConnectionState,
    ) -> ConnectionState {
        if let Err(e) = state.transition_to(ConnectionState::Closed) {
            tracing::trace!(connection_id = %connection_id, "Ignoring close: {}", e);
            return ConnectionState::Closed;
        }

        let outcome = self.registry.unregister(connection_id).await;
        let remaining = self.registry.connection_count().await;
        tracing::info!(
            connection_id = %connection_id,
            user_id = ?state.user_id().map(|u| u.as_str()),
            remaining = remaining,
            "Connection closed"
        );

        if outcome.presence_changed() {
            self.broadcaster.announce().await;
        }

        ConnectionState::Closed
    }
}
