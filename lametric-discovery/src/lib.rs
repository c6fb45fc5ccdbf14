//! LaMetric device discovery library
//!
//! This crate finds LaMetric devices on a local network using SSDP (Simple
//! Service Discovery Protocol) and the UPnP description document every
//! responder publishes.
//!
//! # Quick Start
//!
//! ```no_run
//! use lametric_discovery::discover_lametric_devices;
//!
//! let devices = discover_lametric_devices().unwrap_or_default();
//! for (udn, details) in devices {
//!     println!("Found {} ({:?})", udn, details.friendly_name);
//! }
//! ```
//!
//! # Raw SSDP results
//!
//! [`DiscoveryEngine`] exposes both steps separately:
//!
//! ```no_run
//! use lametric_discovery::DiscoveryEngine;
//! use std::time::Duration;
//!
//! let engine = DiscoveryEngine::new();
//! let endpoints = engine.discover("ssdp:all", Duration::from_secs(2), 3)?;
//! for endpoint in endpoints.values() {
//!     println!("{} at {:?}", endpoint.usn, endpoint.location);
//! }
//!
//! let lametric = engine.filter_endpoints(endpoints.values(), "LaMetric", Duration::from_secs(2))?;
//! println!("{} LaMetric devices", lametric.len());
//! # Ok::<(), lametric_discovery::DiscoveryError>(())
//! ```

mod error;
mod ssdp;
pub mod device;
mod discovery;

pub use device::{DescriptionDocument, DeviceDetails};
pub use discovery::{DiscoveryEngine, DEFAULT_MX, ROOT_DEVICE_TARGET};
pub use error::{DiscoveryError, Result};
pub use ssdp::{DiscoveredEndpoint, SearchRequest, SSDP_MULTICAST_ADDR};

use std::collections::HashMap;
use std::time::Duration;

/// Model name substring identifying LaMetric devices
pub const LAMETRIC_MODEL_NAME: &str = "LaMetric";

/// Default time to wait for SSDP responses and description documents
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Discover LaMetric devices with the default 2-second timeout.
///
/// Returns the descriptive attributes of every device found, keyed by UDN.
pub fn discover_lametric_devices() -> Result<HashMap<String, DeviceDetails>> {
    discover_lametric_devices_with_timeout(DEFAULT_TIMEOUT)
}

/// Discover LaMetric devices with a custom timeout.
///
/// `timeout` bounds both the gap between SSDP responses and each description
/// fetch.
///
/// # Examples
///
/// ```no_run
/// use lametric_discovery::discover_lametric_devices_with_timeout;
/// use std::time::Duration;
///
/// let devices = discover_lametric_devices_with_timeout(Duration::from_secs(5))?;
/// println!("{} devices", devices.len());
/// # Ok::<(), lametric_discovery::DiscoveryError>(())
/// ```
pub fn discover_lametric_devices_with_timeout(
    timeout: Duration,
) -> Result<HashMap<String, DeviceDetails>> {
    DiscoveryEngine::new().get_filtered_devices(LAMETRIC_MODEL_NAME, ROOT_DEVICE_TARGET, timeout)
}
