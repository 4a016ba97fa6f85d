//! Connection state machine.
//!
//! Two-valued reachability belief with edge detection: subscribers are told
//! about transitions, never about repeated observations of the same state.
//!
//! ```text
//! Disconnected + success → Connected    (transition)
//! Connected    + failure → Disconnected (transition)
//! Disconnected + failure → Disconnected (no transition)
//! Connected    + success → Connected    (no transition)
//! ```

/// Current reachability belief about the monitored service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connected,
}

impl ConnectionStatus {
    pub fn is_connected(self) -> bool {
        matches!(self, ConnectionStatus::Connected)
    }

    /// Fold one probe outcome into the status.
    ///
    /// Returns the new status and whether it differs from the old one; only
    /// a `true` second element should trigger subscriber notification.
    pub(crate) fn apply(self, success: bool) -> (ConnectionStatus, bool) {
        let next = if success {
            ConnectionStatus::Connected
        } else {
            ConnectionStatus::Disconnected
        };
        (next, next != self)
    }
}

#[cfg(test)]
mod tests {
    use super::ConnectionStatus::{Connected, Disconnected};

    #[test]
    fn success_from_disconnected_transitions() {
        assert_eq!(Disconnected.apply(true), (Connected, true));
    }

    #[test]
    fn failure_from_connected_transitions() {
        assert_eq!(Connected.apply(false), (Disconnected, true));
    }

    #[test]
    fn repeated_failure_does_not_transition() {
        assert_eq!(Disconnected.apply(false), (Disconnected, false));
    }

    #[test]
    fn repeated_success_does_not_transition() {
        assert_eq!(Connected.apply(true), (Connected, false));
    }
}
