//! HTTP adapters - REST endpoints beside the WebSocket surface.
//!
//! - `relay` - Presence query, delivery hook, health
//! - `middleware` - Internal token guard
//! - `router` - Full application router with CORS and tracing layers

pub mod middleware;
pub mod relay;
mod router;

pub use relay::{relay_router, RelayAppState};
pub use router::build_router;
