//! WebSocket adapters for presence and signaling.
//!
//! # Architecture
//!
//! ```text
//!   client ──typing:start / message:read──▶ recv task ──▶ EventRouter
//!                                                              │ resolve
//!                                                              ▼
//!                                                     ConnectionRegistry
//!                                                              │ handle.push
//!                                                              ▼
//!   client ◀──────── ServerMessage frames ──────── send task ◀─ mailbox
//! ```
//!
//! Each socket owns one bounded mailbox. Everything that wants to reach the
//! client (presence snapshots, routed signaling, new-message notifications)
//! pushes into it without waiting; the socket's send task drains it.
//!
//! # Components
//!
//! - [`messages`] - WebSocket message protocol types
//! - [`handler`] - Axum WebSocket upgrade handler

pub mod handler;
pub mod messages;

pub use handler::{websocket_router, ws_handler, HandshakeQuery, WebSocketState};
pub use messages::{ClientMessage, ConnectedMessage, PongMessage, ServerMessage};
