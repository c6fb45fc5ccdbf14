//! Local cache of the cloud device list
//!
//! The cache is a JSON array of device records so the cloud only has to be
//! queried once.

use std::fs;
use std::path::{Path, PathBuf};

use lametric_api::Device;
use tracing::debug;

use crate::config::expand_home;
use crate::error::SdkError;

/// Default location of the device cache
pub const DEFAULT_DEVICES_FILE: &str = "~/.lmdevices";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceCache {
    path: PathBuf,
}

impl DeviceCache {
    /// Cache stored at `path` (`~` is expanded)
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: expand_home(path),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read the cached devices; a missing file yields an empty list
    pub fn load(&self) -> Result<Vec<Device>, SdkError> {
        if !self.exists() {
            return Ok(Vec::new());
        }

        debug!(path = %self.path.display(), "loading devices");
        let content = fs::read_to_string(&self.path)
            .map_err(|e| self.error("read", e))?;
        serde_json::from_str(&content).map_err(|e| self.error("parse", e))
    }

    /// Write `devices`; an empty list leaves the file untouched
    pub fn save(&self, devices: &[Device]) -> Result<(), SdkError> {
        if devices.is_empty() {
            return Ok(());
        }

        debug!(path = %self.path.display(), count = devices.len(), "saving devices");
        let content = serde_json::to_string(devices).map_err(|e| self.error("serialize", e))?;
        fs::write(&self.path, content).map_err(|e| self.error("write", e))
    }

    fn error(&self, action: &str, error: impl std::fmt::Display) -> SdkError {
        SdkError::DeviceCache(format!(
            "failed to {} '{}': {}",
            action,
            self.path.display(),
            error
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let cache = DeviceCache::new(dir.path().join("devices.json"));

        let devices = vec![
            Device::new("192.168.1.50", "key-1"),
            Device::new("192.168.1.51", "key-2"),
        ];
        cache.save(&devices).unwrap();

        assert!(cache.exists());
        assert_eq!(cache.load().unwrap(), devices);
    }

    #[test]
    fn test_empty_list_is_not_written() {
        let dir = TempDir::new().unwrap();
        let cache = DeviceCache::new(dir.path().join("devices.json"));

        cache.save(&[]).unwrap();
        assert!(!cache.exists());
        assert!(cache.load().unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_cache() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("devices.json");
        fs::write(&path, "{not json").unwrap();

        let error = DeviceCache::new(&path).load().unwrap_err();
        assert!(matches!(error, SdkError::DeviceCache(_)));
    }
}
