//! ConnectionRegistry port - Interface for tracking who is online.
//!
//! The registry is the single source of truth for live connections. It maps
//! each online user to exactly one connection and remembers every live
//! connection (anonymous ones included) so presence snapshots can reach all
//! connected clients.
//!
//! ## Use Case
//!
//! 1. Client completes the WebSocket handshake carrying `userId`
//! 2. Lifecycle registers the connection (or attaches it anonymously)
//! 3. Router resolves a target user to a [`ConnectionHandle`] and pushes to it
//! 4. Transport closes, lifecycle unregisters by [`ConnectionId`]
//!
//! The registry never owns the transport. It only holds handles that let the
//! rest of the system push events and request a close.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tokio::sync::{mpsc, Notify};

use crate::domain::foundation::{ConnectionId, UserId};
use crate::domain::realtime::OutboundEvent;

/// Result of a non-blocking push to a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// Queued on the connection's outbound buffer.
    Queued,
    /// Outbound buffer saturated; the event was dropped.
    Dropped,
    /// The writer side is gone; the transport is closing.
    Closed,
}

impl PushOutcome {
    pub fn is_queued(&self) -> bool {
        matches!(self, PushOutcome::Queued)
    }
}

/// Cheap, cloneable reference to a live transport.
///
/// Pushing never awaits, so a slow or dead peer can never hold up a caller
/// (in particular, never while a registry lock is held).
#[derive(Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    outbound: mpsc::Sender<OutboundEvent>,
    close: Arc<Notify>,
}

impl ConnectionHandle {
    /// Creates a handle and the mailbox its transport drains.
    ///
    /// `capacity` bounds the number of events buffered for a slow peer.
    pub fn channel(capacity: usize) -> (Self, ConnectionMailbox) {
        let id = ConnectionId::new();
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let close = Arc::new(Notify::new());
        (
            Self {
                id,
                outbound: tx,
                close: close.clone(),
            },
            ConnectionMailbox {
                id,
                events: rx,
                close,
            },
        )
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Best-effort, fire-and-forget delivery.
    pub fn push(&self, event: OutboundEvent) -> PushOutcome {
        match self.outbound.try_send(event) {
            Ok(()) => PushOutcome::Queued,
            Err(mpsc::error::TrySendError::Full(_)) => PushOutcome::Dropped,
            Err(mpsc::error::TrySendError::Closed(_)) => PushOutcome::Closed,
        }
    }

    /// Asks the transport to shut down. Idempotent.
    pub fn request_close(&self) {
        self.close.notify_one();
    }
}

impl fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

impl PartialEq for ConnectionHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ConnectionHandle {}

/// Transport-side end of a [`ConnectionHandle`].
pub struct ConnectionMailbox {
    id: ConnectionId,
    events: mpsc::Receiver<OutboundEvent>,
    close: Arc<Notify>,
}

impl ConnectionMailbox {
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Next queued event, or `None` once every handle is dropped.
    pub async fn recv(&mut self) -> Option<OutboundEvent> {
        self.events.recv().await
    }

    /// Non-blocking variant of [`recv`](Self::recv).
    pub fn try_recv(&mut self) -> Option<OutboundEvent> {
        self.events.try_recv().ok()
    }

    /// Completes once a close has been requested through any handle.
    pub async fn close_requested(&self) {
        self.close.notified().await
    }

    /// Splits into the event receiver and the close signal.
    pub fn into_parts(self) -> (mpsc::Receiver<OutboundEvent>, Arc<Notify>) {
        (self.events, self.close)
    }
}

/// Outcome of [`ConnectionRegistry::register`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// True when the user was offline before this registration.
    pub newly_online: bool,
    /// Older connection of the same user that is no longer routable.
    pub superseded: Option<ConnectionHandle>,
}

/// Outcome of [`ConnectionRegistry::unregister`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unregistration {
    /// The connection was the user's tracked connection; the user is offline.
    Removed(UserId),
    /// The connection was tracked without presence (anonymous or superseded).
    Detached,
    /// Unknown connection; nothing changed.
    NotFound,
}

impl Unregistration {
    /// Whether the online-user set changed.
    pub fn presence_changed(&self) -> bool {
        matches!(self, Unregistration::Removed(_))
    }
}

/// Online users and broadcast audience captured atomically.
#[derive(Debug, Clone, Default)]
pub struct PresenceSnapshot {
    /// Registered users, ascending, without duplicates.
    pub online: Vec<UserId>,
    /// Every live connection, anonymous included.
    pub audience: Vec<ConnectionHandle>,
}

/// Port for tracking live connections and the users behind them.
///
/// Implementations must serialize all mutations and reads through one
/// exclusion discipline: a completed `register` is visible to the next
/// `snapshot`, and `resolve` never returns a handle that a completed
/// `unregister` removed.
///
/// None of these operations fail: malformed input is filtered out before it
/// reaches the registry and unknown connections are no-ops.
///
/// # Example
///
/// ```ignore
/// let (handle, mailbox) = ConnectionHandle::channel(64);
/// let registration = registry.register(user_id.clone(), handle).await;
/// if let Some(old) = registration.superseded {
///     old.request_close();
/// }
/// if let Some(target) = registry.resolve(&user_id).await {
///     target.push(event);
/// }
/// registry.unregister(&mailbox.id()).await;
/// ```
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// Track a connection that carries no identity.
    ///
    /// It receives presence broadcasts but never appears in presence and
    /// cannot be resolved.
    async fn attach(&self, handle: ConnectionHandle);

    /// Bind `user_id` to `handle`, replacing any previous binding.
    async fn register(&self, user_id: UserId, handle: ConnectionHandle) -> Registration;

    /// Forget a connection after its transport closed.
    async fn unregister(&self, connection_id: &ConnectionId) -> Unregistration;

    /// Find the connection currently bound to `user_id`.
    async fn resolve(&self, user_id: &UserId) -> Option<ConnectionHandle>;

    /// Currently registered users, ascending.
    async fn online_user_ids(&self) -> Vec<UserId>;

    /// Online users plus every live connection, read under one lock.
    async fn snapshot(&self) -> PresenceSnapshot;

    /// Number of live connections, anonymous included.
    async fn connection_count(&self) -> usize;
}
