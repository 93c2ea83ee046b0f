//! Transport Events
//!
//! Socket lifecycle as delivered to the view.

/// One transport lifecycle event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Connection established
    Open,
    /// A complete text frame
    Message(String),
    /// Connect or receive failure; always followed by `Closed`
    Error(String),
    /// Connection ended. Emitted exactly once per session.
    Closed,
}

impl TransportEvent {
    /// Whether this event ends the session
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransportEvent::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_closed_is_terminal() {
        assert!(TransportEvent::Closed.is_terminal());
        assert!(!TransportEvent::Open.is_terminal());
        assert!(!TransportEvent::Error("x".into()).is_terminal());
        assert!(!TransportEvent::Message("{}".into()).is_terminal());
    }
}
