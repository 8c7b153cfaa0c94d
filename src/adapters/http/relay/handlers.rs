//! HTTP handlers for relay endpoints.
//!
//! These sit beside the WebSocket surface: one read-only view of presence
//! for other services, and the delivery hook the persistence collaborator
//! calls after it stores a message.

use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::RealtimeServices;
use crate::domain::foundation::{DomainError, ErrorCode, UserId, ValidationError};
use crate::ports::{ConnectionRegistry, DeliveryNotifier};

use super::dto::{DeliveryRequest, DeliveryResponse, ErrorResponse, OnlineUsersResponse};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Dependencies for the relay HTTP endpoints.
#[derive(Clone)]
pub struct RelayAppState {
    pub registry: Arc<dyn ConnectionRegistry>,
    pub notifier: Arc<dyn DeliveryNotifier>,
}

impl RelayAppState {
    pub fn new(services: &RealtimeServices) -> Self {
        Self {
            registry: services.registry.clone(),
            notifier: services.notifier.clone(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/presence/online - Current online user ids, sorted
pub async fn get_online_users(State(state): State<RelayAppState>) -> impl IntoResponse {
    let user_ids = state.registry.online_user_ids().await;
    Json(OnlineUsersResponse { user_ids })
}

/// POST /internal/deliveries - Push a stored message to its recipient if online
///
/// Always answers 202 for a well-formed request; `delivered` reports whether
/// the recipient had a live connection.
pub async fn deliver_message(
    State(state): State<RelayAppState>,
    Json(request): Json<DeliveryRequest>,
) -> Result<impl IntoResponse, RelayApiError> {
    let recipient_id = UserId::new(request.recipient_id)?;

    let delivered = state.notifier.notify(&recipient_id, request.message).await;

    tracing::debug!(recipient_id = %recipient_id, delivered, "Delivery hook handled");

    Ok((StatusCode::ACCEPTED, Json(DeliveryResponse { delivered })))
}

/// GET /health - Liveness probe
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error wrapper for relay endpoints.
#[derive(Debug)]
pub struct RelayApiError(DomainError);

impl From<DomainError> for RelayApiError {
    fn from(err: DomainError) -> Self {
        RelayApiError(err)
    }
}

impl From<ValidationError> for RelayApiError {
    fn from(err: ValidationError) -> Self {
        RelayApiError(err.into())
    }
}

impl IntoResponse for RelayApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.0.code {
            ErrorCode::EmptyField | ErrorCode::InvalidFormat => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        };
        (status, Json(ErrorResponse::from(self.0))).into_response()
    }
}
