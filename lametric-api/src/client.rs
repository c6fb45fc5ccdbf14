use rest_client::{BasicAuth, LocalSessionProvider, SessionProvider};
use serde_json::Value;
use tracing::debug;

use crate::apps::ActionRequest;
use crate::endpoint::Endpoint;
use crate::error::Result;
use crate::models::Device;

/// Port of the local device REST API
pub const DEVICE_API_PORT: u16 = 4343;

/// Basic auth user name of the local device REST API
pub const DEVICE_API_USER: &str = "dev";

/// Where the device REST API listens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceApiConfig {
    pub scheme: String,
    pub port: u16,
}

impl DeviceApiConfig {
    /// API root of the device at `ip`
    pub fn base_url(&self, ip: &str) -> String {
        format!("{}://{}:{}/api/v2", self.scheme, ip, self.port)
    }
}

impl Default for DeviceApiConfig {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            port: DEVICE_API_PORT,
        }
    }
}

/// A client for executing requests against LaMetric devices
///
/// Requests go through one cached local session and authenticate per call
/// with the target device's API key.
///
/// # Example
/// ```no_run
/// use lametric_api::{Device, Endpoint, LaMetricClient};
///
/// let client = LaMetricClient::new();
/// let device = Device::new("192.168.1.50", "my-api-key");
/// let volume = client.call(Endpoint::Audio, &device)?;
/// println!("{}", volume);
/// # Ok::<(), lametric_api::ApiError>(())
/// ```
#[derive(Debug)]
pub struct LaMetricClient {
    sessions: LocalSessionProvider,
    config: DeviceApiConfig,
}

impl LaMetricClient {
    /// Client for `https://<ip>:4343` without certificate verification
    pub fn new() -> Self {
        Self::with_config(DeviceApiConfig::default(), false)
    }

    pub fn with_config(config: DeviceApiConfig, verify_certificates: bool) -> Self {
        Self {
            sessions: LocalSessionProvider::with_certificate_verification(verify_certificates),
            config,
        }
    }

    pub fn config(&self) -> &DeviceApiConfig {
        &self.config
    }

    /// Absolute URL of `path` on `device`
    pub fn url(&self, device: &Device, path: &str) -> String {
        let base = self.config.base_url(&device.ipv4_internal);
        if path == "/" {
            base
        } else {
            format!("{}{}", base, path)
        }
    }

    /// Execute a request against a device and return the parsed JSON body
    ///
    /// # Errors
    /// `ApiError::Http` for a non-2xx answer, `ApiError::Network` when the
    /// device cannot be reached, `ApiError::Parse` for a non-JSON body.
    pub fn execute(&self, request: &ActionRequest, device: &Device) -> Result<Value> {
        let url = self.url(device, &request.path);
        debug!(method = %request.method, %url, "device request");

        let auth = BasicAuth::new(DEVICE_API_USER, device.api_key.as_str());
        let session = self.sessions.session()?;

        Ok(session.execute(request.method, &url, Some(&auth), request.body.as_ref())?)
    }

    /// Execute a body-less request to `endpoint`
    pub fn call(&self, endpoint: Endpoint, device: &Device) -> Result<Value> {
        self.execute(&ActionRequest::from(endpoint), device)
    }
}

impl Default for LaMetricClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DeviceApiConfig::default();
        assert_eq!(config.base_url("192.168.1.50"), "https://192.168.1.50:4343/api/v2");
    }

    #[test]
    fn test_url_building() {
        let client = LaMetricClient::new();
        let device = Device::new("10.0.0.7", "key");

        assert_eq!(client.url(&device, "/"), "https://10.0.0.7:4343/api/v2");
        assert_eq!(client.url(&device, "/device/apps/"), "https://10.0.0.7:4343/api/v2/device/apps/");
    }

    #[test]
    fn test_custom_config() {
        let client = LaMetricClient::with_config(
            DeviceApiConfig {
                scheme: "http".to_string(),
                port: 8080,
            },
            true,
        );
        let device = Device::new("127.0.0.1", "key");
        assert_eq!(client.url(&device, "/device"), "http://127.0.0.1:8080/api/v2/device");
    }
}
