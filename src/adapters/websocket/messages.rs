//! WebSocket message types for presence and signaling.
//!
//! Defines the protocol between server and connected clients. Event names
//! keep the colon-separated style chat clients already speak
//! (`typing:start`, `message:read`, ...).
//!
//! - Server → Client: connection status, online users, signaling, new messages, pongs
//! - Client → Server: pings, typing indicators, read receipts

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{MessageId, UserId};
use crate::domain::realtime::{InboundEvent, OutboundEvent};

// ============================================
// Server → Client Messages
// ============================================

/// All message types that can be sent from server to client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Handshake processed.
    #[serde(rename = "connected")]
    Connected(ConnectedMessage),

    /// Full list of online users.
    #[serde(rename = "getOnlineUsers")]
    OnlineUsers(OnlineUsersMessage),

    #[serde(rename = "typing:start")]
    TypingStart(TypingStartMessage),

    #[serde(rename = "typing:stop")]
    TypingStop(TypingStopMessage),

    #[serde(rename = "message:read")]
    MessageRead(MessageReadMessage),

    /// A stored message addressed to this user.
    #[serde(rename = "newMessage")]
    NewMessage(NewMessageMessage),

    /// Heartbeat response.
    #[serde(rename = "pong")]
    Pong(PongMessage),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedMessage {
    pub connection_id: String,
    /// `None` for anonymous connections.
    pub user_id: Option<String>,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineUsersMessage {
    pub user_ids: Vec<UserId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingStartMessage {
    pub sender_id: UserId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingStopMessage {
    pub sender_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageReadMessage {
    pub message_id: MessageId,
    pub read_by: UserId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMessageMessage {
    pub message: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PongMessage {
    pub timestamp: String,
}

impl From<OutboundEvent> for ServerMessage {
    fn from(event: OutboundEvent) -> Self {
        match event {
            OutboundEvent::OnlineUsers { user_ids } => {
                ServerMessage::OnlineUsers(OnlineUsersMessage { user_ids })
            }
            OutboundEvent::TypingStart {
                sender_id,
                sender_name,
            } => ServerMessage::TypingStart(TypingStartMessage {
                sender_id,
                sender_name,
            }),
            OutboundEvent::TypingStop { sender_id } => {
                ServerMessage::TypingStop(TypingStopMessage { sender_id })
            }
            OutboundEvent::MessageRead {
                message_id,
                read_by,
            } => ServerMessage::MessageRead(MessageReadMessage {
                message_id,
                read_by,
            }),
            OutboundEvent::NewMessage { payload } => {
                ServerMessage::NewMessage(NewMessageMessage { message: payload })
            }
        }
    }
}

// ============================================
// Client → Server Messages
// ============================================

/// All message types that can be received from client.
///
/// Identifier fields are validated on decode; a frame naming an empty or
/// sentinel user id fails to parse and is ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Heartbeat request.
    #[serde(rename = "ping")]
    Ping,

    #[serde(rename = "typing:start")]
    TypingStart(TypingStartPayload),

    #[serde(rename = "typing:stop")]
    TypingStop(TypingStopPayload),

    #[serde(rename = "message:read")]
    MessageRead(MessageReadPayload),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingStartPayload {
    pub receiver_id: UserId,
    #[serde(default)]
    pub sender_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingStopPayload {
    pub receiver_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageReadPayload {
    /// Author of the message that was read.
    pub sender_id: UserId,
    pub message_id: MessageId,
}

impl ClientMessage {
    /// Signaling event carried by this frame, if any.
    pub fn into_inbound(self) -> Option<InboundEvent> {
        match self {
            ClientMessage::Ping => None,
            ClientMessage::TypingStart(p) => Some(InboundEvent::TypingStart {
                receiver_id: p.receiver_id,
                sender_name: p.sender_name,
            }),
            ClientMessage::TypingStop(p) => Some(InboundEvent::TypingStop {
                receiver_id: p.receiver_id,
            }),
            ClientMessage::MessageRead(p) => Some(InboundEvent::MessageRead {
                sender_id: p.sender_id,
                message_id: p.message_id,
            }),
        }
    }
}
