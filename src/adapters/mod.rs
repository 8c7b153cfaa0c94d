//! Adapters - Implementations of port interfaces and transport surfaces.
//!
//! Adapters connect the relay to the outside world:
//! - `registry` - In-process connection registry
//! - `websocket` - Client socket upgrade and wire protocol
//! - `http` - REST endpoints (presence query, delivery hook, health)

pub mod http;
pub mod registry;
pub mod websocket;

pub use self::http::build_router;
pub use registry::InMemoryConnectionRegistry;
pub use websocket::{websocket_router, WebSocketState};
