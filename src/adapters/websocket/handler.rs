//! WebSocket upgrade handler for presence and signaling connections.
//!
//! Handles the HTTP → WebSocket upgrade and manages the connection lifecycle:
//! 1. Read `userId` from the handshake query (absent or `"undefined"` ⇒ anonymous)
//! 2. Upgrade to WebSocket
//! 3. Open the connection (register or attach, announce presence)
//! 4. Relay queued events out and signaling frames in until disconnect
//! 5. Close the connection (unregister, announce presence)

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use futures::{stream::SplitSink, SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::application::{ConnectionLifecycle, EventRouter, RealtimeServices};
use crate::domain::foundation::Timestamp;
use crate::ports::ConnectionHandle;

use super::messages::{ClientMessage, ConnectedMessage, PongMessage, ServerMessage};

/// Frames the receive loop answers directly (heartbeats).
const CONTROL_BUFFER: usize = 8;

/// State required for WebSocket handling.
#[derive(Clone)]
pub struct WebSocketState {
    pub lifecycle: Arc<ConnectionLifecycle>,
    pub router: Arc<EventRouter>,
    /// Per-connection outbound buffer size.
    pub outbound_buffer: usize,
}

impl WebSocketState {
    pub fn new(services: &RealtimeServices, outbound_buffer: usize) -> Self {
        Self {
            lifecycle: services.lifecycle.clone(),
            router: services.router.clone(),
            outbound_buffer,
        }
    }
}

/// Handshake query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandshakeQuery {
    pub user_id: Option<String>,
}

/// Handle WebSocket upgrade requests.
///
/// Route: `GET /ws?userId=<id>`
///
/// The identity is trusted as supplied; verifying it is the job of the
/// authentication collaborator in front of this service.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<HandshakeQuery>,
    State(state): State<WebSocketState>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, query.user_id, state))
}

/// Handle an established WebSocket connection.
///
/// This function runs for the lifetime of the connection, handling:
/// - Registering the connection
/// - Forwarding queued events to the client
/// - Routing client signaling through the event router
/// - Cleanup on disconnect or when superseded by a newer connection
async fn handle_socket(socket: WebSocket, user_id: Option<String>, state: WebSocketState) {
    let (mut sender, mut receiver) = socket.split();

    let (handle, mailbox) = ConnectionHandle::channel(state.outbound_buffer);
    let connection_id = handle.id();

    let conn_state = state.lifecycle.open(user_id.as_deref(), handle).await;
    let sender_id = conn_state.user_id().cloned();

    let connected = ServerMessage::Connected(ConnectedMessage {
        connection_id: connection_id.to_string(),
        user_id: sender_id.as_ref().map(|id| id.to_string()),
        timestamp: Timestamp::now().to_rfc3339(),
    });

    if let Err(e) = send_message(&mut sender, &connected).await {
        tracing::debug!(connection_id = %connection_id, "Failed to send connected message: {}", e);
        state.lifecycle.close(&connection_id, conn_state).await;
        return;
    }

    let (control_tx, mut control_rx) = mpsc::channel::<ServerMessage>(CONTROL_BUFFER);
    let (mut events, close) = mailbox.into_parts();

    // Forward queued events (and heartbeat replies) to the client
    let mut send_task = tokio::spawn(async move {
        loop {
            let msg = tokio::select! {
                event = events.recv() => match event {
                    Some(event) => {
                        tracing::trace!(connection_id = %connection_id, kind = %event.kind(), "Forwarding event");
                        ServerMessage::from(event)
                    }
                    None => break,
                },
                Some(control) = control_rx.recv() => control,
                _ = close.notified() => {
                    tracing::debug!(connection_id = %connection_id, "Close requested, ending connection");
                    let _ = sender.send(Message::Close(None)).await;
                    break;
                }
            };

            if let Err(e) = send_message(&mut sender, &msg).await {
                tracing::debug!(connection_id = %connection_id, "Send error, closing connection: {}", e);
                break;
            }
        }
    });

    // Handle incoming messages from client
    let router = state.router.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(ClientMessage::Ping) => {
                        let pong = ServerMessage::Pong(PongMessage {
                            timestamp: Timestamp::now().to_rfc3339(),
                        });
                        let _ = control_tx.try_send(pong);
                    }
                    Ok(client_msg) => {
                        if let Some(event) = client_msg.into_inbound() {
                            router.handle(sender_id.as_ref(), event).await;
                        }
                    }
                    Err(e) => {
                        tracing::debug!(connection_id = %connection_id, "Ignoring undecodable frame: {}", e);
                    }
                },
                Ok(Message::Binary(_)) => {
                    tracing::warn!(connection_id = %connection_id, "Received unsupported binary message");
                }
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                    // WebSocket protocol ping/pong - handled automatically by axum
                }
                Ok(Message::Close(_)) => {
                    tracing::debug!(connection_id = %connection_id, "Client sent close frame");
                    break;
                }
                Err(e) => {
                    tracing::debug!(connection_id = %connection_id, "Receive error: {}", e);
                    break;
                }
            }
        }
    });

    // Wait for either task to finish
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.lifecycle.close(&connection_id, conn_state).await;
}

/// Send a JSON message over the WebSocket.
async fn send_message(
    sender: &mut SplitSink<WebSocket, Message>,
    msg: &ServerMessage,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(msg).map_err(axum::Error::new)?;
    sender.send(Message::Text(json)).await
}

/// Create axum router for the WebSocket endpoint.
pub fn websocket_router(state: WebSocketState) -> axum::Router {
    use axum::routing::get;

    axum::Router::new()
        .route("/ws", get(ws_handler))
        .with_state(state)
}
