//! Peer link handshake state, separate from the engine's LOCAL/REMOTE/
//! CONTROLLED state machine in [`crate::engine`] (spec.md §4.2, §4.5).

/// State of the handshake/keep-alive lifecycle for one peer link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// TCP connected but the handshake has not started.
    Connected,
    /// `hello` sent, waiting for `connected`.
    HelloSent,
    /// Handshake complete; ping/pong keep-alive running.
    Ready,
    /// Sent or received `disconnect`, tearing down.
    Disconnecting,
}

impl SessionState {
    /// Whether the link is past the handshake and usable by the transfer engine.
    #[must_use]
    pub fn is_ready(self) -> bool {
        self == Self::Ready
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connected => write!(f, "Connected"),
            Self::HelloSent => write!(f, "HelloSent"),
            Self::Ready => write!(f, "Ready"),
            Self::Disconnecting => write!(f, "Disconnecting"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_ready_is_usable() {
        assert!(!SessionState::Connected.is_ready());
        assert!(!SessionState::HelloSent.is_ready());
        assert!(SessionState::Ready.is_ready());
        assert!(!SessionState::Disconnecting.is_ready());
    }

    #[test]
    fn display_matches_variant_names() {
        assert_eq!(SessionState::Connected.to_string(), "Connected");
        assert_eq!(SessionState::Ready.to_string(), "Ready");
    }
}
