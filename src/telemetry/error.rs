//! Telemetry view error types
//!
//! Defines the errors that can occur while handling inbound frames.

use thiserror::Error;

/// Errors that can occur in the telemetry view
#[derive(Error, Debug)]
pub enum ViewError {
    /// Inbound frame was not a JSON document
    #[error("Malformed frame: {0}")]
    MalformedFrame(String),

    /// Parsed document could not be rendered back to text
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ViewError {
    fn from(err: serde_json::Error) -> Self {
        ViewError::MalformedFrame(err.to_string())
    }
}

/// Result type alias for view operations
pub type ViewResult<T> = Result<T, ViewError>;
