//! HTTP adapter for relay endpoints.
//!
//! Exposes presence queries and the message delivery hook.

mod dto;
mod handlers;
mod routes;

pub use dto::{DeliveryRequest, DeliveryResponse, ErrorResponse, OnlineUsersResponse};
pub use handlers::{deliver_message, get_online_users, health, RelayApiError, RelayAppState};
pub use routes::relay_router;
