//! State machine trait for lifecycle enums.
//!
//! Lifecycle states (such as a connection moving from handshake to close)
//! declare their legal transitions once and get validated transitions for free.

use super::ValidationError;

/// Trait for enums that represent a lifecycle state machine.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for ConnectionState {
///     fn can_transition_to(&self, target: &Self) -> bool { /* ... */ }
///     fn valid_transitions(&self) -> Vec<Self> { /* ... */ }
/// }
///
/// let state = ConnectionState::Connecting.transition_to(ConnectionState::Anonymous)?;
/// ```
pub trait StateMachine: Sized + Clone + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns the valid target states from current state.
    ///
    /// Targets that carry data cannot be enumerated and are omitted;
    /// `can_transition_to` remains the authority for them.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("Cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
