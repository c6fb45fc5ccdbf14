//! Error types for the discovery system.

use std::fmt;

/// Error type for discovery operations.
///
/// Only failures of the discovery machinery itself are errors. A round that
/// collects no responses, or a candidate whose description cannot be
/// fetched, is a normal outcome and never surfaces here.
#[derive(Debug)]
pub enum DiscoveryError {
    /// Network-related errors (socket creation, sending the M-SEARCH, HTTP client setup)
    NetworkError(String),
    /// Parsing errors (device description XML)
    ParseError(String),
    /// Description document lacks data required to identify the device
    InvalidDevice(String),
}

impl fmt::Display for DiscoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            DiscoveryError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            DiscoveryError::InvalidDevice(msg) => write!(f, "Invalid device: {}", msg),
        }
    }
}

impl std::error::Error for DiscoveryError {}

/// Convenience Result type alias for discovery operations.
pub type Result<T> = std::result::Result<T, DiscoveryError>;
