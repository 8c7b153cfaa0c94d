//! Signaling events relayed between connected clients.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{MessageId, UserId};

/// Discriminant shared by inbound and outbound events, used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventKind {
    TypingStart,
    TypingStop,
    ReadReceipt,
    OnlineSetChanged,
    NewMessage,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::TypingStart => "typing-start",
            EventKind::TypingStop => "typing-stop",
            EventKind::ReadReceipt => "read-receipt",
            EventKind::OnlineSetChanged => "online-set-changed",
            EventKind::NewMessage => "new-message",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-to-point signaling emitted by a connected client.
///
/// The sender is never part of the payload; it is the identity bound to the
/// connection the event arrived on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// The sender started typing in a conversation with `receiver_id`.
    TypingStart {
        receiver_id: UserId,
        sender_name: Option<String>,
    },
    /// The sender stopped typing.
    TypingStop { receiver_id: UserId },
    /// The sender read `message_id`, originally written by `sender_id`.
    MessageRead {
        sender_id: UserId,
        message_id: MessageId,
    },
}

impl InboundEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            InboundEvent::TypingStart { .. } => EventKind::TypingStart,
            InboundEvent::TypingStop { .. } => EventKind::TypingStop,
            InboundEvent::MessageRead { .. } => EventKind::ReadReceipt,
        }
    }

    /// The user whose connection should receive this event.
    pub fn target(&self) -> &UserId {
        match self {
            InboundEvent::TypingStart { receiver_id, .. } => receiver_id,
            InboundEvent::TypingStop { receiver_id } => receiver_id,
            InboundEvent::MessageRead { sender_id, .. } => sender_id,
        }
    }

    /// Builds the event the target receives, stamped with the originating user.
    pub fn into_outbound(self, from: &UserId) -> OutboundEvent {
        match self {
            InboundEvent::TypingStart { sender_name, .. } => OutboundEvent::TypingStart {
                sender_id: from.clone(),
                sender_name,
            },
            InboundEvent::TypingStop { .. } => OutboundEvent::TypingStop {
                sender_id: from.clone(),
            },
            InboundEvent::MessageRead { message_id, .. } => OutboundEvent::MessageRead {
                message_id,
                read_by: from.clone(),
            },
        }
    }
}

/// Event pushed from the relay to a connected client.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundEvent {
    /// Full snapshot of online users; the latest one received always wins.
    OnlineUsers { user_ids: Vec<UserId> },
    TypingStart {
        sender_id: UserId,
        sender_name: Option<String>,
    },
    TypingStop { sender_id: UserId },
    MessageRead { message_id: MessageId, read_by: UserId },
    /// A message the persistence collaborator has durably stored.
    NewMessage { payload: serde_json::Value },
}

impl OutboundEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            OutboundEvent::OnlineUsers { .. } => EventKind::OnlineSetChanged,
            OutboundEvent::TypingStart { .. } => EventKind::TypingStart,
            OutboundEvent::TypingStop { .. } => EventKind::TypingStop,
            OutboundEvent::MessageRead { .. } => EventKind::ReadReceipt,
            OutboundEvent::NewMessage { .. } => EventKind::NewMessage,
        }
    }
}
