//! Route configuration for relay endpoints.

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;

use super::handlers::{deliver_message, get_online_users, health, RelayAppState};
use crate::adapters::http::middleware::{internal_auth_middleware, InternalToken};

/// Creates the relay router.
///
/// Routes:
/// - `GET /health` - Liveness probe
/// - `GET /api/presence/online` - Online user ids
/// - `POST /internal/deliveries` - Delivery hook (guarded by `token` when configured)
pub fn relay_router(state: RelayAppState, token: InternalToken) -> Router {
    let internal = Router::new()
        .route("/internal/deliveries", post(deliver_message))
        .route_layer(middleware::from_fn_with_state(token, internal_auth_middleware));

    Router::new()
        .route("/health", get(health))
        .route("/api/presence/online", get(get_online_users))
        .merge(internal)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::registry::InMemoryConnectionRegistry;
    use crate::application::RealtimeServices;
    use crate::ports::ConnectionHandle;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn services() -> RealtimeServices {
        RealtimeServices::new(Arc::new(InMemoryConnectionRegistry::new()))
    }

    fn app(services: &RealtimeServices, token: Option<&str>) -> Router {
        relay_router(
            RelayAppState::new(services),
            InternalToken::new(token.map(str::to_string)),
        )
    }

    fn delivery_request(auth: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/internal/deliveries")
            .header("Content-Type", "application/json");
        if let Some(auth) = auth {
            builder = builder.header("Authorization", auth);
        }
        builder
            .body(Body::from(r#"{"recipientId": "bob", "message": {"text": "hi"}}"#))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_returns_ok() {
        let response = app(&services(), None)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn online_users_lists_registered_users() {
        let services = services();
        let (handle, _mailbox) = ConnectionHandle::channel(4);
        services.lifecycle.open(Some("alice"), handle).await;

        let response = app(&services, None)
            .oneshot(
                Request::builder()
                    .uri("/api/presence/online")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"userIds": ["alice"]})
        );
    }

    #[tokio::test]
    async fn delivery_without_configured_token_is_open() {
        let response = app(&services(), None)
            .oneshot(delivery_request(None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"delivered": false})
        );
    }

    #[tokio::test]
    async fn delivery_with_wrong_token_is_unauthorized() {
        let response = app(&services(), Some("s3cret"))
            .oneshot(delivery_request(Some("Bearer wrong")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({
                "code": "UNAUTHORIZED",
                "message": "Invalid or missing internal token"
            })
        );
    }

    #[tokio::test]
    async fn whitespace_token_leaves_delivery_open() {
        let response = app(&services(), Some("   "))
            .oneshot(delivery_request(None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn delivery_with_token_reaches_online_recipient() {
        let services = services();
        let (handle, _mailbox) = ConnectionHandle::channel(4);
        services.lifecycle.open(Some("bob"), handle).await;

        let response = app(&services, Some("s3cret"))
            .oneshot(delivery_request(Some("Bearer s3cret")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(
            body_json(response).await,
            serde_json::json!({"delivered": true})
        );
    }

    #[tokio::test]
    async fn presence_endpoint_ignores_internal_token() {
        let response = app(&services(), Some("s3cret"))
            .oneshot(
                Request::builder()
                    .uri("/api/presence/online")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
