//! Per-connection lifecycle.
//!
//! ```text
//! Connecting ──handshake with user id──▶ Registered(user)
//!     │      ──handshake without id───▶ Anonymous
//!     └──────────────┬───────────────────────┘
//!                    ▼
//!                 Closed (terminal)
//! ```

use crate::domain::foundation::{StateMachine, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    /// Transport accepted, handshake not yet processed.
    Connecting,
    /// Handshake carried a valid user id; the user is in presence.
    Registered(UserId),
    /// Handshake carried no usable identity.
    Anonymous,
    /// Transport closed.
    Closed,
}

impl ConnectionState {
    /// State a successful handshake leads to.
    pub fn after_handshake(user_id: Option<UserId>) -> Self {
        match user_id {
            Some(user_id) => ConnectionState::Registered(user_id),
            None => ConnectionState::Anonymous,
        }
    }

    /// The user bound to this connection, if any.
    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            ConnectionState::Registered(user_id) => Some(user_id),
            _ => None,
        }
    }
}

impl StateMachine for ConnectionState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use ConnectionState::*;
        matches!(
            (self, target),
            (Connecting, Registered(_))
                | (Connecting, Anonymous)
                | (Connecting, Closed)
                | (Registered(_), Closed)
                | (Anonymous, Closed)
        )
    }

    /// `Connecting → Registered(_)` is accepted by `can_transition_to` but
    /// not listed, since it depends on the handshake identity.
    fn valid_transitions(&self) -> Vec<Self> {
        use ConnectionState::*;
        match self {
            Connecting => vec![Anonymous, Closed],
            Registered(_) | Anonymous => vec![Closed],
            Closed => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> UserId {
        UserId::new("alice").unwrap()
    }

    #[test]
    fn handshake_with_identity_registers() {
        let next = ConnectionState::after_handshake(Some(alice()));
        assert_eq!(next, ConnectionState::Registered(alice()));
        assert!(ConnectionState::Connecting.transition_to(next).is_ok());
    }

    #[test]
    fn handshake_without_identity_is_anonymous() {
        let next = ConnectionState::after_handshake(None);
        assert_eq!(next, ConnectionState::Anonymous);
        assert!(next.user_id().is_none());
    }

    #[test]
    fn both_live_states_close() {
        assert!(ConnectionState::Registered(alice())
            .transition_to(ConnectionState::Closed)
            .is_ok());
        assert!(ConnectionState::Anonymous
            .transition_to(ConnectionState::Closed)
            .is_ok());
    }

    #[test]
    fn closed_is_terminal() {
        assert!(ConnectionState::Closed.is_terminal());
        assert!(ConnectionState::Closed
            .transition_to(ConnectionState::Anonymous)
            .is_err());
    }

    #[test]
    fn registered_cannot_become_anonymous() {
        let result = ConnectionState::Registered(alice()).transition_to(ConnectionState::Anonymous);
        assert!(result.is_err());
    }

    #[test]
    fn connecting_lists_only_identity_free_targets() {
        let listed = ConnectionState::Connecting.valid_transitions();
        assert_eq!(listed, vec![ConnectionState::Anonymous, ConnectionState::Closed]);
        assert!(!ConnectionState::Connecting.is_terminal());
        assert!(ConnectionState::Connecting.can_transition_to(&ConnectionState::Registered(alice())));
    }

    #[test]
    fn can_transition_to_is_consistent_with_valid_transitions() {
        for state in [
            ConnectionState::Connecting,
            ConnectionState::Registered(alice()),
            ConnectionState::Anonymous,
            ConnectionState::Closed,
        ] {
            for target in state.valid_transitions() {
                assert!(
                    state.can_transition_to(&target),
                    "can_transition_to should accept {:?} -> {:?}",
                    state,
                    target
                );
            }
        }
    }
}
