//! Shared-secret guard for internal collaborator endpoints.
//!
//! The message persistence service calls the delivery hook server-to-server.
//! When a token is configured, requests must carry it as a Bearer token:
//!
//! ```text
//! Authorization: Bearer <token>
//! ```
//!
//! Without a configured token the guard lets every request through, which is
//! only accepted outside production (see `RealtimeConfig::validate`).

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;

use crate::adapters::http::relay::RelayApiError;
use crate::domain::foundation::{DomainError, ErrorCode};

/// Middleware state - the expected token, if any.
#[derive(Clone, Default)]
pub struct InternalToken(Option<Arc<SecretString>>);

impl InternalToken {
    /// Blank tokens count as unconfigured.
    pub fn new(token: Option<String>) -> Self {
        Self(
            token
                .filter(|t| !t.trim().is_empty())
                .map(|t| Arc::new(SecretString::new(t))),
        )
    }

    pub fn is_configured(&self) -> bool {
        self.0.is_some()
    }

    /// Constant-time comparison against the configured token.
    fn accepts(&self, provided: Option<&str>) -> bool {
        match (&self.0, provided) {
            (None, _) => true,
            (Some(_), None) => false,
            (Some(expected), Some(provided)) => {
                let expected = expected.expose_secret().as_bytes();
                expected.ct_eq(provided.as_bytes()).into()
            }
        }
    }
}

/// Rejects requests whose Bearer token does not match the configured one.
pub async fn internal_auth_middleware(
    State(token): State<InternalToken>,
    request: Request,
    next: Next,
) -> Response {
    let provided = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    if token.accepts(provided) {
        return next.run(request).await;
    }

    tracing::warn!(
        path = %request.uri().path(),
        token_present = provided.is_some(),
        "Rejected internal request"
    );

    RelayApiError::from(DomainError::new(
        ErrorCode::Unauthorized,
        "Invalid or missing internal token",
    ))
    .into_response()
}
