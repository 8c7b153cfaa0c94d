//! DeliveryNotifier port - Entry point for the message persistence collaborator.
//!
//! After the collaborator durably stores a message it calls
//! [`DeliveryNotifier::notify`] so a connected recipient sees the message
//! immediately. Offline recipients are not an error: they fetch stored
//! messages through the collaborator's own retrieval path.

use async_trait::async_trait;

use crate::domain::foundation::UserId;

/// Port through which stored messages are announced to live recipients.
///
/// # Example
///
/// ```ignore
/// let stored = messages.insert(new_message).await?;
/// notifier.notify(&stored.receiver_id, serde_json::to_value(&stored)?).await;
/// ```
#[async_trait]
pub trait DeliveryNotifier: Send + Sync {
    /// Push `payload` to the recipient if connected.
    ///
    /// Returns true when the event was queued on the recipient's connection.
    async fn notify(&self, recipient_id: &UserId, payload: serde_json::Value) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Compile-time check that trait is object-safe
    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn DeliveryNotifier) {}
}
