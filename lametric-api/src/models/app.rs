use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::{ApiError, Result};

/// An app installed on a device
///
/// Built field-by-field from the JSON the device returns: unknown keys are
/// ignored and missing or mistyped keys fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppDescriptor {
    pub package: String,
    pub vendor: String,
    pub version: String,
    pub version_code: String,
    /// Widget id to widget info, ordered by id
    pub widgets: BTreeMap<String, Value>,
    /// Action name to action info
    pub actions: BTreeMap<String, Value>,
}

impl AppDescriptor {
    pub fn from_value(value: &Value) -> Self {
        Self {
            package: string_field(value, "package"),
            vendor: string_field(value, "vendor"),
            version: string_field(value, "version"),
            version_code: string_field(value, "version_code"),
            widgets: map_field(value, "widgets"),
            actions: map_field(value, "actions"),
        }
    }

    /// Widget addressed by app actions: the lexicographically smallest id
    pub fn widget_id(&self) -> Option<&str> {
        self.widgets.keys().next().map(String::as_str)
    }

    pub fn supports(&self, action: &str) -> bool {
        self.actions.contains_key(action)
    }
}

fn string_field(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn map_field(value: &Value, key: &str) -> BTreeMap<String, Value> {
    value
        .get(key)
        .and_then(Value::as_object)
        .map(|object| object.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
        .unwrap_or_default()
}

/// The apps installed on the current device, keyed by package
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppInventory {
    apps: BTreeMap<String, AppDescriptor>,
}

impl AppInventory {
    /// Build the inventory from the body of `GET /device/apps/`
    ///
    /// The body maps package names to app objects. An app object without a
    /// `package` field takes its key as package name.
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| ApiError::Parse(format!("expected an object of apps, got: {}", value)))?;

        let apps = object
            .iter()
            .map(|(key, app)| {
                let mut descriptor = AppDescriptor::from_value(app);
                if descriptor.package.is_empty() {
                    descriptor.package = key.clone();
                }
                (descriptor.package.clone(), descriptor)
            })
            .collect();

        Ok(Self { apps })
    }

    pub fn get(&self, package: &str) -> Option<&AppDescriptor> {
        self.apps.get(package)
    }

    pub fn packages(&self) -> impl Iterator<Item = &str> {
        self.apps.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AppDescriptor> {
        self.apps.values()
    }

    pub fn len(&self) -> usize {
        self.apps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// Look up a package, failing with `UnknownPackage`
    pub fn app(&self, package: &str) -> Result<&AppDescriptor> {
        self.get(package)
            .ok_or_else(|| ApiError::UnknownPackage(package.to_string()))
    }

    /// Widget id of a package, failing with `UnknownPackage` or `NoWidget`
    pub fn widget_id(&self, package: &str) -> Result<&str> {
        self.app(package)?
            .widget_id()
            .ok_or_else(|| ApiError::NoWidget(package.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn apps_body() -> Value {
        json!({
            "com.lametric.clock": {
                "package": "com.lametric.clock",
                "vendor": "LaMetric",
                "version": "1.0.20",
                "version_code": "21",
                "title": "Clock",
                "actions": {
                    "clock.alarm": {
                        "enabled": {"data_type": "bool", "name": "enabled", "required": false},
                        "time": {"data_type": "string", "format": "^[0-9]{2}:[0-9]{2}(?::[0-9]{2})?$", "name": "time", "required": false},
                        "wake_with_radio": {"data_type": "bool", "name": "wake_with_radio", "required": false}
                    }
                },
                "widgets": {
                    "f03ea1ae1ae5f7b2a2a8e6eb5d6e9b4a": {"index": 1, "package": "com.lametric.clock"},
                    "08b8eac21074f8f7e5a29f2855ba8060": {"index": 0, "package": "com.lametric.clock"}
                }
            },
            "com.lametric.radio": {
                "vendor": "LaMetric",
                "version_code": 7,
                "actions": {"radio.play": {}, "radio.stop": {}},
                "widgets": {}
            }
        })
    }

    #[test]
    fn test_descriptor_from_value() {
        let inventory = AppInventory::from_value(&apps_body()).unwrap();
        let clock = inventory.get("com.lametric.clock").unwrap();

        assert_eq!(clock.vendor, "LaMetric");
        assert_eq!(clock.version, "1.0.20");
        assert_eq!(clock.version_code, "21");
        assert!(clock.supports("clock.alarm"));
        assert!(!clock.supports("radio.play"));
    }

    #[test]
    fn test_missing_fields_default() {
        let descriptor = AppDescriptor::from_value(&json!({"unknown": true}));
        assert_eq!(descriptor, AppDescriptor::default());

        let descriptor = AppDescriptor::from_value(&json!({"widgets": "not a map"}));
        assert!(descriptor.widgets.is_empty());
    }

    #[test]
    fn test_package_falls_back_to_key() {
        let inventory = AppInventory::from_value(&apps_body()).unwrap();
        let radio = inventory.get("com.lametric.radio").unwrap();

        assert_eq!(radio.package, "com.lametric.radio");
        assert_eq!(radio.version_code, "7");
        assert_eq!(inventory.packages().collect::<Vec<_>>(), vec![
            "com.lametric.clock",
            "com.lametric.radio"
        ]);
    }

    #[test]
    fn test_widget_id_is_smallest() {
        let inventory = AppInventory::from_value(&apps_body()).unwrap();
        assert_eq!(
            inventory.widget_id("com.lametric.clock").unwrap(),
            "08b8eac21074f8f7e5a29f2855ba8060"
        );
    }

    #[test]
    fn test_widget_id_errors() {
        let inventory = AppInventory::from_value(&apps_body()).unwrap();
        assert!(matches!(
            inventory.widget_id("com.lametric.radio"),
            Err(ApiError::NoWidget(_))
        ));
        assert!(matches!(
            inventory.widget_id("com.example.missing"),
            Err(ApiError::UnknownPackage(_))
        ));
    }

    #[test]
    fn test_inventory_requires_object() {
        assert!(matches!(
            AppInventory::from_value(&json!([1, 2, 3])),
            Err(ApiError::Parse(_))
        ));
        assert!(AppInventory::from_value(&json!({})).unwrap().is_empty());
    }
}
