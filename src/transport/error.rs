//! Transport error types

use thiserror::Error;

/// Errors that can occur on the telemetry socket
#[derive(Error, Debug)]
pub enum TransportError {
    /// Connecting to the telemetry source failed
    #[error("Failed to connect to {url}: {error}")]
    Connect { url: String, error: String },

    /// Receiving from an established connection failed
    #[error("WebSocket receive error: {0}")]
    Receive(String),

    /// The event consumer went away
    #[error("Event channel closed")]
    ChannelClosed,
}

/// Result type alias for transport operations
pub type TransportResult<T> = Result<T, TransportError>;
