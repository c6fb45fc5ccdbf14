//! Device description parsing.
//!
//! This module handles parsing the UPnP self-description document a
//! responder publishes at its SSDP `LOCATION` and extracting the
//! descriptive attributes used for filtering.

use crate::error::{DiscoveryError, Result};
use serde::{Deserialize, Serialize};

/// UPnP device description root element.
#[derive(Debug, Deserialize)]
pub struct DescriptionDocument {
    #[serde(rename = "URLBase", default)]
    pub url_base: Option<String>,
    pub device: DeviceDescription,
}

/// The `<device>` element of a description document.
///
/// Every field is optional; the filter only needs `modelName` and `UDN`.
#[derive(Debug, Default, Deserialize)]
pub struct DeviceDescription {
    #[serde(rename = "deviceType", default)]
    pub device_type: Option<String>,
    #[serde(rename = "friendlyName", default)]
    pub friendly_name: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(rename = "manufacturerURL", default)]
    pub manufacturer_url: Option<String>,
    #[serde(rename = "modelDescription", default)]
    pub model_description: Option<String>,
    #[serde(rename = "modelName", default)]
    pub model_name: Option<String>,
    #[serde(rename = "modelNumber", default)]
    pub model_number: Option<String>,
    #[serde(rename = "UDN", default)]
    pub udn: Option<String>,
}

/// Descriptive attributes of a device that passed the model filter.
///
/// Serializes with the element names used in the description document, and
/// only for attributes the document actually declared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDetails {
    #[serde(rename = "URLBase", skip_serializing_if = "Option::is_none", default)]
    pub url_base: Option<String>,
    #[serde(rename = "deviceType", skip_serializing_if = "Option::is_none", default)]
    pub device_type: Option<String>,
    #[serde(rename = "friendlyName", skip_serializing_if = "Option::is_none", default)]
    pub friendly_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub manufacturer: Option<String>,
    #[serde(rename = "manufacturerURL", skip_serializing_if = "Option::is_none", default)]
    pub manufacturer_url: Option<String>,
    #[serde(rename = "modelDescription", skip_serializing_if = "Option::is_none", default)]
    pub model_description: Option<String>,
    #[serde(rename = "modelName", skip_serializing_if = "Option::is_none", default)]
    pub model_name: Option<String>,
    #[serde(rename = "modelNumber", skip_serializing_if = "Option::is_none", default)]
    pub model_number: Option<String>,
}

impl DescriptionDocument {
    /// Parse a description document from XML.
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError::ParseError` if the XML is malformed or has no
    /// `<device>` element.
    pub fn from_xml(xml: &str) -> Result<Self> {
        quick_xml::de::from_str(xml)
            .map_err(|e| DiscoveryError::ParseError(format!("Failed to parse device XML: {}", e)))
    }

    /// Whether the declared model name contains `model_name`
    pub fn matches_model(&self, model_name: &str) -> bool {
        self.device
            .model_name
            .as_deref()
            .is_some_and(|declared| declared.contains(model_name))
    }

    /// Unique device name, used as the key of filtered results
    pub fn udn(&self) -> Result<String> {
        self.device
            .udn
            .as_deref()
            .map(str::trim)
            .filter(|udn| !udn.is_empty())
            .map(str::to_string)
            .ok_or_else(|| DiscoveryError::InvalidDevice("description has no UDN".to_string()))
    }

    /// Extract the descriptive attributes, trimmed
    pub fn to_details(&self) -> DeviceDetails {
        let device = &self.device;
        DeviceDetails {
            url_base: self.url_base.clone(),
            device_type: trimmed(&device.device_type),
            friendly_name: trimmed(&device.friendly_name),
            manufacturer: trimmed(&device.manufacturer),
            manufacturer_url: trimmed(&device.manufacturer_url),
            model_description: trimmed(&device.model_description),
            model_name: trimmed(&device.model_name),
            model_number: trimmed(&device.model_number),
        }
    }
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value.as_deref().map(|v| v.trim().to_string())
}
