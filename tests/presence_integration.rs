//! Integration tests for presence and signaling through the application layer.
//!
//! Each "client" is a connection handle plus its mailbox, driven through the
//! same `RealtimeServices` the WebSocket adapter uses.

use std::sync::Arc;

use serde_json::json;

use presence_relay::adapters::registry::InMemoryConnectionRegistry;
use presence_relay::application::{RealtimeServices, RouteOutcome};
use presence_relay::domain::foundation::{MessageId, UserId};
use presence_relay::domain::realtime::{ConnectionState, InboundEvent, OutboundEvent};
use presence_relay::ports::{ConnectionHandle, ConnectionMailbox};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct Client {
    handle: ConnectionHandle,
    mailbox: ConnectionMailbox,
    state: ConnectionState,
}

impl Client {
    async fn connect(services: &RealtimeServices, user_id: Option<&str>) -> Self {
        let (handle, mailbox) = ConnectionHandle::channel(16);
        let state = services.lifecycle.open(user_id, handle.clone()).await;
        Self {
            handle,
            mailbox,
            state,
        }
    }

    async fn disconnect(self, services: &RealtimeServices) {
        services.lifecycle.close(&self.handle.id(), self.state).await;
    }

    fn user_id(&self) -> Option<&UserId> {
        self.state.user_id()
    }

    fn drain(&mut self) -> Vec<OutboundEvent> {
        std::iter::from_fn(|| self.mailbox.try_recv()).collect()
    }
}

fn services() -> RealtimeServices {
    RealtimeServices::new(Arc::new(InMemoryConnectionRegistry::new()))
}

fn user(id: &str) -> UserId {
    UserId::new(id).unwrap()
}

fn online(ids: &[&str]) -> OutboundEvent {
    OutboundEvent::OnlineUsers {
        user_ids: ids.iter().map(|id| user(id)).collect(),
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn two_users_see_each_other_and_exchange_typing() {
    let services = services();

    let mut a = Client::connect(&services, Some("A")).await;
    assert_eq!(a.drain(), vec![online(&["A"])]);

    let mut b = Client::connect(&services, Some("B")).await;
    assert_eq!(a.drain(), vec![online(&["A", "B"])]);
    assert_eq!(b.drain(), vec![online(&["A", "B"])]);

    let outcome = services
        .router
        .handle(
            a.user_id(),
            InboundEvent::TypingStart {
                receiver_id: user("B"),
                sender_name: Some("Alice".to_string()),
            },
        )
        .await;
    assert_eq!(outcome, RouteOutcome::Delivered);
    assert_eq!(
        b.drain(),
        vec![OutboundEvent::TypingStart {
            sender_id: user("A"),
            sender_name: Some("Alice".to_string()),
        }]
    );
    assert!(a.drain().is_empty());

    a.disconnect(&services).await;
    assert_eq!(b.drain(), vec![online(&["B"])]);

    let outcome = services
        .router
        .handle(
            b.user_id(),
            InboundEvent::TypingStop {
                receiver_id: user("A"),
            },
        )
        .await;
    assert_eq!(outcome, RouteOutcome::RecipientOffline);
    assert!(b.drain().is_empty());
}

#[tokio::test]
async fn read_receipt_reaches_original_author() {
    let services = services();
    let mut author = Client::connect(&services, Some("alice")).await;
    let reader = Client::connect(&services, Some("bob")).await;
    author.drain();

    let outcome = services
        .router
        .handle(
            reader.user_id(),
            InboundEvent::MessageRead {
                sender_id: user("alice"),
                message_id: MessageId::new("m-42").unwrap(),
            },
        )
        .await;

    assert_eq!(outcome, RouteOutcome::Delivered);
    assert_eq!(
        author.drain(),
        vec![OutboundEvent::MessageRead {
            message_id: MessageId::new("m-42").unwrap(),
            read_by: user("bob"),
        }]
    );
}

#[tokio::test]
async fn anonymous_client_watches_presence_without_appearing() {
    let services = services();
    let mut watcher = Client::connect(&services, None).await;
    assert!(watcher.drain().is_empty());

    let alice = Client::connect(&services, Some("alice")).await;
    assert_eq!(watcher.drain(), vec![online(&["alice"])]);
    assert_eq!(services.registry.online_user_ids().await, vec![user("alice")]);

    let outcome = services
        .router
        .handle(
            watcher.user_id(),
            InboundEvent::TypingStop {
                receiver_id: user("alice"),
            },
        )
        .await;
    assert_eq!(outcome, RouteOutcome::AnonymousSender);

    alice.disconnect(&services).await;
    assert_eq!(watcher.drain(), vec![online(&[])]);

    watcher.disconnect(&services).await;
    assert_eq!(services.registry.connection_count().await, 0);
}

#[tokio::test]
async fn reconnect_supersedes_previous_connection() {
    let services = services();
    let first = Client::connect(&services, Some("alice")).await;
    let mut second = Client::connect(&services, Some("alice")).await;

    assert_eq!(services.registry.online_user_ids().await, vec![user("alice")]);

    // The first transport was told to shut down and eventually closes.
    first.mailbox.close_requested().await;
    first.disconnect(&services).await;

    assert_eq!(services.registry.online_user_ids().await, vec![user("alice")]);

    second.drain();
    let delivered = services
        .notifier
        .notify(&user("alice"), json!({"text": "still here"}))
        .await;
    assert!(delivered);
    assert_eq!(
        second.drain(),
        vec![OutboundEvent::NewMessage {
            payload: json!({"text": "still here"})
        }]
    );
}

#[tokio::test]
async fn delivery_to_offline_recipient_is_silently_skipped() {
    let services = services();
    let mut bob = Client::connect(&services, Some("bob")).await;
    bob.drain();

    let delivered = services
        .notifier
        .notify(&user("carol"), json!({"text": "hello"}))
        .await;

    assert!(!delivered);
    assert!(bob.drain().is_empty());
}

#[tokio::test]
async fn duplicate_close_does_not_announce_twice() {
    let services = services();
    let alice = Client::connect(&services, Some("alice")).await;
    let mut bob = Client::connect(&services, Some("bob")).await;
    bob.drain();

    let id = alice.handle.id();
    let state = alice.state.clone();
    alice.disconnect(&services).await;
    services.lifecycle.close(&id, state).await;

    assert_eq!(bob.drain(), vec![online(&["bob"])]);
}
