//! In-process connection registry.
//!
//! # Layout
//!
//! ```text
//! users        : user_id       → connection_id   (presence, one per user)
//! owners       : connection_id → user_id         (reverse index, O(1) removal)
//! connections  : connection_id → handle          (every live transport)
//! ```
//!
//! All three maps live behind a single `RwLock`, so every operation observes
//! them in a mutually consistent state.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{ConnectionId, UserId};
use crate::ports::{
    ConnectionHandle, ConnectionRegistry, PresenceSnapshot, Registration, Unregistration,
};

#[derive(Default)]
struct RegistryState {
    users: BTreeMap<UserId, ConnectionId>,
    owners: HashMap<ConnectionId, UserId>,
    connections: HashMap<ConnectionId, ConnectionHandle>,
}

impl RegistryState {
    /// Drops the presence binding owned by `connection_id`, if it is current.
    fn release(&mut self, connection_id: &ConnectionId) -> Option<UserId> {
        let user_id = self.owners.remove(connection_id)?;
        if self.users.get(&user_id) == Some(connection_id) {
            self.users.remove(&user_id);
        }
        Some(user_id)
    }
}

/// Registry for a single server process.
///
/// # Thread Safety
///
/// Uses one `RwLock` for the whole state. Lookups for routing and broadcast
/// take the read side, handshake and close take the write side. No lock is
/// ever held while pushing to a transport: callers receive cloned handles.
#[derive(Default)]
pub struct InMemoryConnectionRegistry {
    state: RwLock<RegistryState>,
}

impl InMemoryConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn attach(&self, handle: ConnectionHandle) {
        let mut state = self.state.write().await;
        let connection_id = handle.id();
        state.release(&connection_id);
        state.connections.insert(connection_id, handle);

        tracing::debug!(connection_id = %connection_id, "Anonymous connection attached");
    }

    async fn register(&self, user_id: UserId, handle: ConnectionHandle) -> Registration {
        let mut state = self.state.write().await;
        let connection_id = handle.id();

        // A connection carries at most one identity.
        state.release(&connection_id);
        state.connections.insert(connection_id, handle);

        let previous = state.users.insert(user_id.clone(), connection_id);
        state.owners.insert(connection_id, user_id.clone());

        let superseded = match previous {
            Some(old_id) if old_id != connection_id => {
                state.owners.remove(&old_id);
                state.connections.get(&old_id).cloned()
            }
            _ => None,
        };

        if let Some(old) = &superseded {
            tracing::info!(
                user_id = %user_id,
                connection_id = %connection_id,
                superseded = %old.id(),
                "User reconnected, previous connection superseded"
            );
        } else {
            tracing::debug!(user_id = %user_id, connection_id = %connection_id, "User registered");
        }

        Registration {
            newly_online: previous.is_none(),
            superseded,
        }
    }

    async fn unregister(&self, connection_id: &ConnectionId) -> Unregistration {
        let mut state = self.state.write().await;

        let Some(_) = state.connections.remove(connection_id) else {
            tracing::trace!(connection_id = %connection_id, "Unregister for unknown connection");
            return Unregistration::NotFound;
        };

        match state.owners.get(connection_id).cloned() {
            Some(user_id) if state.users.get(&user_id) == Some(connection_id) => {
                state.release(connection_id);
                tracing::debug!(user_id = %user_id, connection_id = %connection_id, "User unregistered");
                Unregistration::Removed(user_id)
            }
            _ => {
                state.owners.remove(connection_id);
                Unregistration::Detached
            }
        }
    }

    async fn resolve(&self, user_id: &UserId) -> Option<ConnectionHandle> {
        let state = self.state.read().await;
        state
            .users
            .get(user_id)
            .and_then(|connection_id| state.connections.get(connection_id))
            .cloned()
    }

    async fn online_user_ids(&self) -> Vec<UserId> {
        self.state.read().await.users.keys().cloned().collect()
    }

    async fn snapshot(&self) -> PresenceSnapshot {
        let state = self.state.read().await;
        PresenceSnapshot {
            online: state.users.keys().cloned().collect(),
            audience: state.connections.values().cloned().collect(),
        }
    }

    async fn connection_count(&self) -> usize {
        self.state.read().await.connections.len()
    }
}
