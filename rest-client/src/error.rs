//! Error types for the session layer

use thiserror::Error;

/// Errors that can occur while creating sessions or executing requests
#[derive(Debug, Error)]
pub enum RestError {
    /// Credentials are missing, so no cloud session can ever be created
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The OAuth2 token request failed
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The server answered with a non-2xx status
    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    /// Network or HTTP transport error
    #[error("Network/HTTP error: {0}")]
    Network(String),

    /// Response body was not valid JSON
    #[error("JSON parsing error: {0}")]
    Parse(String),
}

impl RestError {
    /// HTTP status code, if the error carries one
    pub fn status(&self) -> Option<u16> {
        match self {
            RestError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
