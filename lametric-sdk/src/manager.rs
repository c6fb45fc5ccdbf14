//! LaMetricManager - Main entry point for the SDK
//!
//! Provides a sync-first API over the LaMetric cloud and one selected device.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use lametric_api::{
    app_action, app_activate, ActionRequest, ApiError, AppInventory, BluetoothUpdate,
    BrightnessMode, Device, DeviceApiConfig, DisplayUpdate, Endpoint, LaMetricClient,
    Notification, ScreensaverMode, ScreensaverUpdate, VolumeUpdate,
};
use lametric_discovery::{DeviceDetails, DiscoveryEngine, LAMETRIC_MODEL_NAME, ROOT_DEVICE_TARGET};
use parking_lot::RwLock;
use rest_client::{CloudSessionProvider, Credentials, SessionProvider, DEFAULT_CLOUD_BASE_URL};
use serde_json::Value;
use tracing::{debug, warn};

use crate::cache::{DeviceCache, DEFAULT_DEVICES_FILE};
use crate::config::{resolve_credentials, Config, ConfigError, DEFAULT_CONFIG_FILE};
use crate::SdkError;

/// Constructor arguments for [`LaMetricManager`]
#[derive(Debug, Clone)]
pub struct ManagerOptions {
    /// Explicit cloud credentials; missing fields fall back to the
    /// environment, then the config file
    pub credentials: Credentials,
    /// Write an empty config template when the file is missing
    pub auto_create_config: bool,
    /// Read credentials from the config file
    pub auto_load_config: bool,
    pub config_path: PathBuf,
    pub devices_path: PathBuf,
    pub cloud_base_url: String,
    pub device_api: DeviceApiConfig,
    /// Verify the device's TLS certificate (LaMetric devices use a
    /// self-signed one)
    pub verify_certificates: bool,
    pub discovery: DiscoveryEngine,
    pub discovery_timeout: Duration,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            credentials: Credentials::default(),
            auto_create_config: false,
            auto_load_config: true,
            config_path: PathBuf::from(DEFAULT_CONFIG_FILE),
            devices_path: PathBuf::from(DEFAULT_DEVICES_FILE),
            cloud_base_url: DEFAULT_CLOUD_BASE_URL.to_string(),
            device_api: DeviceApiConfig::default(),
            verify_certificates: false,
            discovery: DiscoveryEngine::new(),
            discovery_timeout: lametric_discovery::DEFAULT_TIMEOUT,
        }
    }
}

/// Main SDK entry point
///
/// The manager talks to the cloud for the user's device list and to one
/// selected device for everything else. All methods take `&self`.
///
/// # Example
///
/// ```rust,no_run
/// use lametric_sdk::{Frame, LaMetricManager, Model, Notification};
///
/// fn main() -> Result<(), lametric_sdk::SdkError> {
///     let manager = LaMetricManager::new()?;
///
///     let devices = manager.get_devices(false, true)?;
///     let device = devices.into_iter().next().ok_or(lametric_sdk::SdkError::NoDeviceSelected)?;
///     manager.set_device(device)?;
///
///     let model = Model::new(vec![Frame::simple("i210", "Hello World!")], 1, None)?;
///     manager.send_notification(&Notification::new(model))?;
///
///     Ok(())
/// }
/// ```
pub struct LaMetricManager {
    cloud: CloudSessionProvider,
    client: LaMetricClient,
    discovery: DiscoveryEngine,
    discovery_timeout: Duration,

    device: RwLock<Option<Device>>,
    inventory: RwLock<AppInventory>,
    devices: RwLock<Vec<Device>>,
    cache: RwLock<DeviceCache>,
}

impl LaMetricManager {
    /// Create a manager reading credentials from the environment and
    /// `~/.lmconfig`
    pub fn new() -> Result<Self, SdkError> {
        Self::with_options(ManagerOptions::default())
    }

    /// Create a manager from explicit options
    ///
    /// # Errors
    /// `ConfigError::Created` when a config template was just written,
    /// `ConfigError::Parse` for an unreadable config file, unless explicit
    /// and environment credentials are already complete.
    pub fn with_options(options: ManagerOptions) -> Result<Self, SdkError> {
        let config = match Config::load(
            &options.config_path,
            options.auto_create_config,
            options.auto_load_config,
        ) {
            Ok(config) => config,
            // The file is not needed when arguments and environment cover both fields
            Err(error @ ConfigError::Parse { .. })
                if options
                    .credentials
                    .clone()
                    .or(Credentials::from_env())
                    .is_complete() =>
            {
                warn!(%error, "ignoring unreadable config file");
                Config::default()
            }
            Err(error) => return Err(error.into()),
        };
        let credentials = resolve_credentials(options.credentials, &config);
        debug!(
            complete = credentials.is_complete(),
            "resolved cloud credentials"
        );

        Ok(Self {
            cloud: CloudSessionProvider::with_base_url(credentials, options.cloud_base_url),
            client: LaMetricClient::with_config(options.device_api, options.verify_certificates),
            discovery: options.discovery,
            discovery_timeout: options.discovery_timeout,
            device: RwLock::new(None),
            inventory: RwLock::new(AppInventory::default()),
            devices: RwLock::new(Vec::new()),
            cache: RwLock::new(DeviceCache::new(&options.devices_path)),
        })
    }

    /// The cloud session provider, e.g. to replace the credentials
    pub fn cloud(&self) -> &CloudSessionProvider {
        &self.cloud
    }

    /// The device client
    pub fn client(&self) -> &LaMetricClient {
        &self.client
    }

    // ========================================================================
    // Cloud
    // ========================================================================

    fn cloud_get(&self, path: &str) -> Result<Value, SdkError> {
        let session = self.cloud.session()?;
        Ok(session.get(&self.cloud.url(path))?)
    }

    /// Information about the user owning the cloud credentials
    pub fn get_user(&self) -> Result<Value, SdkError> {
        debug!("get_user");
        self.cloud_get("/users/me")
    }

    /// The user's devices
    ///
    /// The cached list is returned when the cache file exists and
    /// `force_reload` is false. Otherwise the cloud is queried and, with
    /// `save_devices`, the answer is written to the cache.
    pub fn get_devices(&self, force_reload: bool, save_devices: bool) -> Result<Vec<Device>, SdkError> {
        let cached = self.cache.read().exists();
        debug!(force_reload, save_devices, cached, "get_devices");

        if cached && !force_reload {
            return self.load_devices();
        }

        let value = self.cloud_get("/users/me/devices")?;
        let devices: Vec<Device> = serde_json::from_value(value)
            .map_err(|e| ApiError::Parse(format!("invalid device list: {}", e)))?;

        *self.devices.write() = devices.clone();
        if save_devices {
            self.save_devices()?;
        }
        Ok(devices)
    }

    /// Replace the in-memory device list with the cache file contents
    pub fn load_devices(&self) -> Result<Vec<Device>, SdkError> {
        let devices = self.cache.read().load()?;
        *self.devices.write() = devices.clone();
        Ok(devices)
    }

    /// Write the in-memory device list to the cache file, unless it is empty
    pub fn save_devices(&self) -> Result<(), SdkError> {
        let devices = self.devices.read();
        self.cache.read().save(&devices)
    }

    /// Use another device cache file (`~` is expanded)
    pub fn set_devices_filename(&self, path: impl AsRef<Path>) {
        *self.cache.write() = DeviceCache::new(path);
    }

    pub fn devices_filename(&self) -> PathBuf {
        self.cache.read().path().to_path_buf()
    }

    /// Find LaMetric devices on the local network with SSDP
    pub fn discover_devices(&self) -> Result<HashMap<String, DeviceDetails>, SdkError> {
        debug!("discover_devices");
        Ok(self.discovery.get_filtered_devices(
            LAMETRIC_MODEL_NAME,
            ROOT_DEVICE_TARGET,
            self.discovery_timeout,
        )?)
    }

    // ========================================================================
    // Device selection
    // ========================================================================

    /// Select the device all further device calls go to
    ///
    /// Fetches the device's installed apps once and replaces the app
    /// inventory with them. The previous device's inventory is dropped even
    /// when the fetch fails; `refresh_apps` retries it.
    pub fn set_device(&self, device: Device) -> Result<(), SdkError> {
        debug!(ip = %device.ipv4_internal, "set_device");
        *self.device.write() = Some(device);
        *self.inventory.write() = AppInventory::default();
        self.refresh_apps()?;
        Ok(())
    }

    /// The selected device
    pub fn device(&self) -> Option<Device> {
        self.device.read().clone()
    }

    fn current_device(&self) -> Result<Device, SdkError> {
        self.device.read().clone().ok_or(SdkError::NoDeviceSelected)
    }

    fn execute(&self, request: &ActionRequest) -> Result<Value, SdkError> {
        let device = self.current_device()?;
        Ok(self.client.execute(request, &device)?)
    }

    fn call(&self, endpoint: Endpoint) -> Result<Value, SdkError> {
        self.execute(&ActionRequest::from(endpoint))
    }

    // ========================================================================
    // Device state
    // ========================================================================

    /// API version and the map of available endpoints
    pub fn get_endpoint_map(&self) -> Result<Value, SdkError> {
        debug!("get_endpoint_map");
        self.call(Endpoint::EndpointMap)
    }

    pub fn get_device_state(&self) -> Result<Value, SdkError> {
        debug!("get_device_state");
        self.call(Endpoint::DeviceState)
    }

    pub fn get_display(&self) -> Result<Value, SdkError> {
        debug!("get_display");
        self.call(Endpoint::Display)
    }

    /// Set brightness (0-100) and brightness mode
    pub fn set_display(&self, brightness: u8, mode: BrightnessMode) -> Result<Value, SdkError> {
        debug!(brightness, mode = mode.as_str(), "set_display");
        self.current_device()?;
        let body = DisplayUpdate::new(brightness, mode)?;
        self.execute(&ActionRequest::from(Endpoint::SetDisplay).with_json(&body)?)
    }

    /// Configure the screensaver
    ///
    /// `TimeBased` requires `start_time` and `end_time` as `HH:MM[:SS]`.
    pub fn set_screensaver(
        &self,
        mode: ScreensaverMode,
        mode_enabled: bool,
        start_time: Option<&str>,
        end_time: Option<&str>,
        screensaver_enabled: bool,
    ) -> Result<Value, SdkError> {
        debug!(?mode, mode_enabled, screensaver_enabled, "set_screensaver");
        self.current_device()?;
        let body =
            ScreensaverUpdate::new(mode, mode_enabled, start_time, end_time, screensaver_enabled)?;
        self.execute(&ActionRequest::from(Endpoint::SetDisplay).with_json(&body)?)
    }

    pub fn get_volume(&self) -> Result<Value, SdkError> {
        debug!("get_volume");
        self.call(Endpoint::Audio)
    }

    /// Set the volume (0-100)
    pub fn set_volume(&self, volume: u8) -> Result<Value, SdkError> {
        debug!(volume, "set_volume");
        self.current_device()?;
        let body = VolumeUpdate::new(volume)?;
        self.execute(&ActionRequest::from(Endpoint::SetAudio).with_json(&body)?)
    }

    pub fn get_bluetooth_state(&self) -> Result<Value, SdkError> {
        debug!("get_bluetooth_state");
        self.call(Endpoint::Bluetooth)
    }

    /// Switch bluetooth on or off and/or rename it; at least one is required
    pub fn set_bluetooth(&self, active: Option<bool>, name: Option<String>) -> Result<Value, SdkError> {
        debug!(?active, ?name, "set_bluetooth");
        self.current_device()?;
        let body = BluetoothUpdate::new(active, name)?;
        self.execute(&ActionRequest::from(Endpoint::SetBluetooth).with_json(&body)?)
    }

    pub fn get_wifi_state(&self) -> Result<Value, SdkError> {
        debug!("get_wifi_state");
        self.call(Endpoint::Wifi)
    }

    // ========================================================================
    // Notifications
    // ========================================================================

    /// Push a notification to the device queue
    pub fn send_notification(&self, notification: &Notification) -> Result<Value, SdkError> {
        debug!(priority = ?notification.priority(), "send_notification");
        self.execute(&ActionRequest::from(Endpoint::SendNotification).with_json(notification)?)
    }

    pub fn get_notifications(&self) -> Result<Value, SdkError> {
        debug!("get_notifications");
        self.call(Endpoint::Notifications)
    }

    pub fn get_current_notification(&self) -> Result<Value, SdkError> {
        debug!("get_current_notification");
        self.call(Endpoint::CurrentNotification)
    }

    pub fn get_notification(&self, id: &str) -> Result<Value, SdkError> {
        debug!(id, "get_notification");
        self.call(Endpoint::Notification(id.to_string()))
    }

    /// Remove a notification from the queue, or dismiss it if visible
    pub fn remove_notification(&self, id: &str) -> Result<Value, SdkError> {
        debug!(id, "remove_notification");
        self.call(Endpoint::RemoveNotification(id.to_string()))
    }

    // ========================================================================
    // Apps
    // ========================================================================

    /// Snapshot of the selected device's installed apps
    pub fn apps(&self) -> AppInventory {
        self.inventory.read().clone()
    }

    /// Fetch the installed apps and replace the inventory
    pub fn refresh_apps(&self) -> Result<AppInventory, SdkError> {
        debug!("refresh_apps");
        let value = self.call(Endpoint::Apps)?;
        let inventory = AppInventory::from_value(&value)?;
        *self.inventory.write() = inventory.clone();
        Ok(inventory)
    }

    /// Bring `package` to the foreground
    pub fn switch_to_app(&self, package: &str) -> Result<Value, SdkError> {
        debug!(package, "switch_to_app");
        self.current_device()?;
        let request = app_activate(&self.inventory.read(), package)?;
        self.execute(&request)
    }

    pub fn switch_to_next_app(&self) -> Result<Value, SdkError> {
        debug!("switch_to_next_app");
        self.call(Endpoint::NextApp)
    }

    pub fn switch_to_prev_app(&self) -> Result<Value, SdkError> {
        debug!("switch_to_prev_app");
        self.call(Endpoint::PrevApp)
    }

    /// Execute `action` of `package`
    ///
    /// Nothing is sent unless the package is installed, declares the action
    /// and has a widget.
    pub fn app_exec(&self, package: &str, action: &str, params: Option<Value>) -> Result<Value, SdkError> {
        debug!(package, action, "app_exec");
        self.current_device()?;
        let request = app_action(&self.inventory.read(), package, action, params)?;
        self.execute(&request)
    }
}

impl std::fmt::Debug for LaMetricManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LaMetricManager")
            .field("cloud", &self.cloud)
            .field("device", &*self.device.read())
            .field("apps", &self.inventory.read().len())
            .field("devices_path", &self.cache.read().path())
            .finish()
    }
}
