//! HTTP DTOs for relay endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, UserId};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Body the persistence collaborator posts after storing a message.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryRequest {
    pub recipient_id: String,
    pub message: serde_json::Value,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineUsersResponse {
    pub user_ids: Vec<UserId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryResponse {
    /// False when the recipient is offline; the message stays retrievable from storage.
    pub delivered: bool,
}

/// Error body shared by relay endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<DomainError> for ErrorResponse {
    fn from(err: DomainError) -> Self {
        let details = if err.details.is_empty() {
            None
        } else {
            serde_json::to_value(&err.details).ok()
        };
        Self {
            code: err.code.to_string(),
            message: err.message,
            details,
        }
    }
}
