//! EventRouter - Forwards point-to-point signaling between connected users.
//!
//! Routing is at-most-once and fire-and-forget: nothing is acknowledged,
//! retried or stored. An offline target simply means the event is dropped.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::realtime::InboundEvent;
use crate::ports::{ConnectionRegistry, PushOutcome};

/// What happened to a routed event. Never reported back to the sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    Delivered,
    RecipientOffline,
    /// The originating connection has no identity to stamp on the event.
    AnonymousSender,
    /// The target was resolved but its transport did not accept the event.
    PushFailed(PushOutcome),
}

pub struct EventRouter {
    registry: Arc<dyn ConnectionRegistry>,
}

impl EventRouter {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Route `event`, sent by the user bound to the originating connection.
    pub async fn handle(&self, sender: Option<&UserId>, event: InboundEvent) -> RouteOutcome {
        let kind = event.kind();

        let Some(sender) = sender else {
            tracing::debug!(kind = %kind, "Dropping signaling from anonymous connection");
            return RouteOutcome::AnonymousSender;
        };

        let Some(target) = self.registry.resolve(event.target()).await else {
            tracing::trace!(
                kind = %kind,
                sender = %sender,
                target = %event.target(),
                "Target offline, event dropped"
            );
            return RouteOutcome::RecipientOffline;
        };

        match target.push(event.into_outbound(sender)) {
            PushOutcome::Queued => {
                tracing::trace!(kind = %kind, sender = %sender, connection_id = %target.id(), "Event routed");
                RouteOutcome::Delivered
            }
            outcome => {
                tracing::debug!(
                    kind = %kind,
                    connection_id = %target.id(),
                    outcome = ?outcome,
                    "Event not accepted by target connection"
                );
                RouteOutcome::PushFailed(outcome)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::registry::InMemoryConnectionRegistry;
    use crate::domain::foundation::MessageId;
    use crate::domain::realtime::OutboundEvent;
    use crate::ports::{ConnectionHandle, ConnectionMailbox};

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    async fn connect(
        registry: &InMemoryConnectionRegistry,
        id: &str,
    ) -> (ConnectionHandle, ConnectionMailbox) {
        let (handle, mailbox) = ConnectionHandle::channel(8);
        registry.register(user(id), handle.clone()).await;
        (handle, mailbox)
    }

    #[tokio::test]
    async fn typing_start_reaches_only_the_receiver() {
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let router = EventRouter::new(registry.clone());
        let (_a, mut alice) = connect(&registry, "alice").await;
        let (_b, mut bob) = connect(&registry, "bob").await;
        let (_c, mut carol) = connect(&registry, "carol").await;

        let outcome = router
            .handle(
                Some(&user("alice")),
                InboundEvent::TypingStart {
                    receiver_id: user("bob"),
                    sender_name: Some("Alice".to_string()),
                },
            )
            .await;

        assert_eq!(outcome, RouteOutcome::Delivered);
        assert_eq!(
            bob.try_recv(),
            Some(OutboundEvent::TypingStart {
                sender_id: user("alice"),
                sender_name: Some("Alice".to_string()),
            })
        );
        assert!(alice.try_recv().is_none());
        assert!(carol.try_recv().is_none());
    }

    #[tokio::test]
    async fn typing_to_offline_user_is_silently_dropped() {
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let router = EventRouter::new(registry.clone());
        let (_a, mut alice) = connect(&registry, "alice").await;

        for event in [
            InboundEvent::TypingStart {
                receiver_id: user("ghost"),
                sender_name: None,
            },
            InboundEvent::TypingStop {
                receiver_id: user("ghost"),
            },
        ] {
            let outcome = router.handle(Some(&user("alice")), event).await;
            assert_eq!(outcome, RouteOutcome::RecipientOffline);
        }
        assert!(alice.try_recv().is_none());
    }

    #[tokio::test]
    async fn read_receipt_goes_to_original_sender_with_reader() {
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let router = EventRouter::new(registry.clone());
        let (_a, mut alice) = connect(&registry, "alice").await;
        let (_b, mut bob) = connect(&registry, "bob").await;

        let outcome = router
            .handle(
                Some(&user("bob")),
                InboundEvent::MessageRead {
                    sender_id: user("alice"),
                    message_id: MessageId::new("msg-42").unwrap(),
                },
            )
            .await;

        assert_eq!(outcome, RouteOutcome::Delivered);
        assert_eq!(
            alice.try_recv(),
            Some(OutboundEvent::MessageRead {
                message_id: MessageId::new("msg-42").unwrap(),
                read_by: user("bob"),
            })
        );
        assert!(bob.try_recv().is_none());
    }

    #[tokio::test]
    async fn anonymous_sender_is_dropped() {
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let router = EventRouter::new(registry.clone());
        let (_b, mut bob) = connect(&registry, "bob").await;

        let outcome = router
            .handle(
                None,
                InboundEvent::TypingStop {
                    receiver_id: user("bob"),
                },
            )
            .await;

        assert_eq!(outcome, RouteOutcome::AnonymousSender);
        assert!(bob.try_recv().is_none());
    }

    #[tokio::test]
    async fn closed_target_reports_push_failure() {
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let router = EventRouter::new(registry.clone());
        let (_b, bob) = connect(&registry, "bob").await;
        drop(bob);

        let outcome = router
            .handle(
                Some(&user("alice")),
                InboundEvent::TypingStop {
                    receiver_id: user("bob"),
                },
            )
            .await;

        assert_eq!(outcome, RouteOutcome::PushFailed(PushOutcome::Closed));
    }
}
