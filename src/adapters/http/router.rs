//! Top-level application router.
//!
//! Merges the WebSocket endpoint with the relay HTTP endpoints and applies
//! the cross-cutting layers (CORS, request tracing).

use axum::Router;
use http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::adapters::websocket::{websocket_router, WebSocketState};
use crate::application::RealtimeServices;
use crate::config::AppConfig;

use super::middleware::InternalToken;
use super::relay::{relay_router, RelayAppState};

/// Builds the full router for the relay service.
pub fn build_router(services: &RealtimeServices, config: &AppConfig) -> Router {
    let ws_state = WebSocketState::new(services, config.realtime.outbound_buffer);
    let token = InternalToken::new(config.realtime.delivery_token.clone());

    if !token.is_configured() {
        tracing::warn!("No delivery token configured, /internal/deliveries is unauthenticated");
    }

    websocket_router(ws_state)
        .merge(relay_router(RelayAppState::new(services), token))
        .layer(cors_layer(&config.server.cors_origins_list()))
        .layer(TraceLayer::new_for_http())
}

/// CORS restricted to the configured origins; invalid entries are skipped.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Skipping invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
