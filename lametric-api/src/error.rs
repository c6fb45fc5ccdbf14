use rest_client::RestError;
use thiserror::Error;

use crate::operation::ValidationError;

/// High-level API errors for LaMetric operations
///
/// Wraps the session layer's failures in domain terms and adds the errors
/// raised while resolving app actions, all of which occur before any request
/// is sent.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Credentials are missing or unusable
    ///
    /// Raised before any network traffic; no later operation can succeed
    /// until the configuration is fixed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The OAuth2 token request failed
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The device or cloud answered with a non-2xx status
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Network communication error
    ///
    /// Connection refused, TLS failure, timeout or the device being
    /// unreachable.
    #[error("Network error: {0}")]
    Network(String),

    /// Response parsing error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid parameter value, rejected before the request was built
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// The package is not installed on the current device
    #[error("Unknown app package '{0}'")]
    UnknownPackage(String),

    /// The package declares no widget to address
    #[error("App '{0}' has no widgets")]
    NoWidget(String),

    /// The package does not declare the requested action
    #[error("Action '{action}' is not supported by app '{package}'")]
    UnsupportedAction { package: String, action: String },
}

impl ApiError {
    /// HTTP status code, if the error carries one
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Type alias for results that can return an ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

impl From<RestError> for ApiError {
    fn from(error: RestError) -> Self {
        match error {
            RestError::Configuration(msg) => ApiError::Configuration(msg),
            RestError::Authentication(msg) => ApiError::Authentication(msg),
            RestError::Status { status, body } => ApiError::Http { status, body },
            RestError::Network(msg) => ApiError::Network(msg),
            RestError::Parse(msg) => ApiError::Parse(msg),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(validation_error: ValidationError) -> Self {
        ApiError::InvalidParameter(validation_error.to_string())
    }
}
