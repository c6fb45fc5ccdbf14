use lametric_api::{ApiError, ValidationError};
use lametric_discovery::DiscoveryError;
use rest_client::RestError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum SdkError {
    #[error("API error: {0}")]
    ApiError(#[from] ApiError),

    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("No device selected, call set_device first")]
    NoDeviceSelected,

    #[error("Device cache error: {0}")]
    DeviceCache(String),
}

impl SdkError {
    /// Whether the error is a setup problem no retry can fix
    ///
    /// Binaries should exit with the error message, which names the
    /// credential sources or the config file to edit.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SdkError::Config(_) | SdkError::ApiError(ApiError::Configuration(_))
        )
    }
}

impl From<RestError> for SdkError {
    fn from(error: RestError) -> Self {
        SdkError::ApiError(error.into())
    }
}

impl From<ValidationError> for SdkError {
    fn from(error: ValidationError) -> Self {
        SdkError::ApiError(error.into())
    }
}
