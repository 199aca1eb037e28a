//! Error types for request composition and transport

use std::time::Duration;

/// Failure to turn user input into a sendable request
#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    /// Non-GET body text that does not parse as JSON
    #[error("Invalid JSON in request body: {0}")]
    InvalidRequestBody(#[source] serde_json::Error),
}

/// Failure reported by a transport before any HTTP status was received
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    #[error("Request timed out ({}s)", .0.as_secs())]
    Timeout(Duration),
    #[error("Connection failed: {0}")]
    Connect(String),
    #[error("Request failed: {0}")]
    Request(String),
    #[error("Error reading body: {0}")]
    Body(String),
    /// Free-form failure message, displayed as-is
    #[error("{0}")]
    Other(String),
}
