use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A LaMetric device as returned by the cloud device list
///
/// Only the local address and API key are needed to talk to the device.
/// Every other field the cloud returns (id, name, serial number, MAC, ...) is
/// kept as-is so a device list survives a round-trip through the cache file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub ipv4_internal: String,
    pub api_key: String,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl Device {
    pub fn new(ipv4_internal: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            ipv4_internal: ipv4_internal.into(),
            api_key: api_key.into(),
            other: Map::new(),
        }
    }

    /// User-assigned device name, if the record carries one
    pub fn name(&self) -> Option<&str> {
        self.other.get("name").and_then(Value::as_str)
    }

    /// Look up any other vendor field
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.other.get(key)
    }
}
