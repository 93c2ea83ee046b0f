//! Agent error types

use thiserror::Error;

/// Errors that can occur while running the agent
#[derive(Error, Debug)]
pub enum AgentError {
    /// Binding or serving the socket failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A frame could not be serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Server loop ended with an error
    #[error("Server error: {0}")]
    Server(String),
}

/// Result type alias for agent operations
pub type AgentResult<T> = Result<T, AgentError>;
