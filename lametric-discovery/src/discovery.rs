//! Core discovery logic.
//!
//! This module implements the discovery algorithm that:
//! 1. Sends SSDP M-SEARCH requests, optionally over several rounds
//! 2. Collects and parses responses until a gap exceeds the timeout
//! 3. Fetches each responder's description document via HTTP
//! 4. Keeps the devices whose model name matches, keyed by UDN

use std::collections::HashMap;
use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;

use tracing::{debug, warn};

use crate::device::{DescriptionDocument, DeviceDetails};
use crate::error::{DiscoveryError, Result};
use crate::ssdp::{DiscoveredEndpoint, SearchRequest, SsdpClient, SSDP_MULTICAST_ADDR};

/// Default MX value sent with every M-SEARCH
pub const DEFAULT_MX: u32 = 1;

/// Search target matching every UPnP root device
pub const ROOT_DEVICE_TARGET: &str = "upnp:rootdevice";

/// SSDP discovery engine.
///
/// Each call opens its own socket, so an engine can be reused freely; the
/// socket is closed when the call returns.
///
/// # Examples
///
/// ```no_run
/// use lametric_discovery::DiscoveryEngine;
/// use std::time::Duration;
///
/// let engine = DiscoveryEngine::new();
/// let devices = engine
///     .get_filtered_devices("LaMetric", "upnp:rootdevice", Duration::from_secs(2))
///     .unwrap_or_default();
/// for (udn, details) in devices {
///     println!("{} -> {:?}", udn, details.friendly_name);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DiscoveryEngine {
    target: SocketAddr,
    mx: u32,
    max_retries: usize,
}

impl DiscoveryEngine {
    /// Engine that multicasts to `239.255.255.250:1900`
    pub fn new() -> Self {
        let target = SSDP_MULTICAST_ADDR
            .parse()
            .unwrap_or_else(|_| SocketAddr::from(([239, 255, 255, 250], 1900)));
        Self::with_target(target)
    }

    /// Engine that sends its M-SEARCH requests to `target` instead of the
    /// multicast group
    pub fn with_target(target: SocketAddr) -> Self {
        Self {
            target,
            mx: DEFAULT_MX,
            max_retries: 1,
        }
    }

    /// Resolve `target` (e.g. `"127.0.0.1:1900"`) and use it as the M-SEARCH destination
    pub fn with_target_addr(target: impl ToSocketAddrs) -> Result<Self> {
        let target = target
            .to_socket_addrs()
            .map_err(|e| DiscoveryError::NetworkError(format!("Invalid target address: {}", e)))?
            .next()
            .ok_or_else(|| DiscoveryError::NetworkError("Target address did not resolve".to_string()))?;
        Ok(Self::with_target(target))
    }

    pub fn with_mx(mut self, mx: u32) -> Self {
        self.mx = mx;
        self
    }

    /// Number of rounds used by [`DiscoveryEngine::get_filtered_devices`]
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Discover SSDP responders, keyed by USN.
    ///
    /// Every round sends one M-SEARCH and collects responses until no
    /// response arrives for `timeout` (at least one millisecond). A round's
    /// results replace those of the previous round. A round that yields
    /// nothing is retried, so discovery stops after the first non-empty round
    /// or after `max_retries` rounds, whichever comes first. A `max_retries`
    /// of 0 still runs one round. Collecting nothing is not an error.
    pub fn discover(
        &self,
        search_target: &str,
        timeout: Duration,
        max_retries: usize,
    ) -> Result<HashMap<String, DiscoveredEndpoint>> {
        let client = SsdpClient::new(self.target, timeout)?;
        let request = SearchRequest::new(search_target, self.mx);

        let mut endpoints = HashMap::new();
        for round in 1..=max_retries.max(1) {
            endpoints = HashMap::new();

            for response in client.search(&request)? {
                match response {
                    Ok(endpoint) => {
                        endpoints.insert(endpoint.usn.clone(), endpoint);
                    }
                    Err(e) => {
                        warn!(round, error = %e, "SSDP round ended by socket error");
                    }
                }
            }

            debug!(round, found = endpoints.len(), "SSDP round finished");
            if !endpoints.is_empty() {
                break;
            }
        }

        Ok(endpoints)
    }

    /// Discover devices whose description declares a model name containing
    /// `model_name`, keyed by UDN.
    pub fn get_filtered_devices(
        &self,
        model_name: &str,
        search_target: &str,
        timeout: Duration,
    ) -> Result<HashMap<String, DeviceDetails>> {
        let endpoints = self.discover(search_target, timeout, self.max_retries)?;
        self.filter_endpoints(endpoints.values(), model_name, timeout)
    }

    /// Fetch the description of each endpoint and keep the matching ones.
    ///
    /// A candidate that cannot be fetched within `timeout`, answers with a
    /// non-2xx status or serves an unusable document is logged and skipped;
    /// the remaining candidates are still evaluated.
    pub fn filter_endpoints<'a>(
        &self,
        endpoints: impl IntoIterator<Item = &'a DiscoveredEndpoint>,
        model_name: &str,
        timeout: Duration,
    ) -> Result<HashMap<String, DeviceDetails>> {
        let http = reqwest::blocking::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| DiscoveryError::NetworkError(format!("Failed to create HTTP client: {}", e)))?;

        let mut devices = HashMap::new();
        for endpoint in endpoints {
            let Some(location) = endpoint.location.as_deref() else {
                debug!(usn = %endpoint.usn, "endpoint has no location, skipping");
                continue;
            };

            let document = match fetch_description(&http, location) {
                Ok(Some(document)) => document,
                Ok(None) => continue,
                Err(e) => {
                    warn!(location, error = %e, "skipping device");
                    continue;
                }
            };

            if !document.matches_model(model_name) {
                debug!(location, model_name, "model name does not match");
                continue;
            }

            match document.udn() {
                Ok(udn) => {
                    devices.insert(udn, document.to_details());
                }
                Err(e) => warn!(location, error = %e, "skipping device"),
            }
        }

        Ok(devices)
    }
}

impl Default for DiscoveryEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetch and parse a description document.
///
/// `Ok(None)` means the responder answered with a non-success status.
fn fetch_description(
    http: &reqwest::blocking::Client,
    location: &str,
) -> Result<Option<DescriptionDocument>> {
    let response = http.get(location).send().map_err(|e| {
        if e.is_timeout() {
            DiscoveryError::NetworkError(format!("Timeout for '{}'", location))
        } else {
            DiscoveryError::NetworkError(format!("Failed to fetch device description: {}", e))
        }
    })?;

    if !response.status().is_success() {
        debug!(location, status = response.status().as_u16(), "description request failed");
        return Ok(None);
    }

    let xml = response
        .text()
        .map_err(|e| DiscoveryError::NetworkError(format!("Failed to read response body: {}", e)))?;

    DescriptionDocument::from_xml(&xml).map(Some)
}
