//! Typed API for LaMetric devices
//!
//! This crate turns device operations into concrete REST requests and runs
//! them against a device on the local network. It uses the private
//! `rest-client` crate for the underlying sessions.
//!
//! # App actions
//!
//! Built-in apps (radio, clock, countdown, stopwatch) are driven through
//! actions resolved against the device's installed-app inventory:
//!
//! ```no_run
//! use lametric_api::{app_action, AppInventory, Device, Endpoint, LaMetricClient};
//!
//! let client = LaMetricClient::new();
//! let device = Device::new("192.168.1.50", "my-api-key");
//!
//! let apps = client.call(Endpoint::Apps, &device)?;
//! let inventory = AppInventory::from_value(&apps)?;
//!
//! let request = app_action(&inventory, "com.lametric.radio", "radio.play", None)?;
//! client.execute(&request, &device)?;
//! # Ok::<(), lametric_api::ApiError>(())
//! ```

pub mod apps;
pub mod client;
pub mod endpoint;
pub mod error;
pub mod models;
pub mod operation;

pub use apps::{app_action, app_activate, ActionRequest};
pub use client::{DeviceApiConfig, LaMetricClient, DEVICE_API_PORT, DEVICE_API_USER};
pub use endpoint::Endpoint;
pub use error::{ApiError, Result};
pub use models::{
    AppDescriptor, AppInventory, Device, Frame, GoalData, IconType, Model, Notification, Priority,
    Sound, SoundCategory,
};
pub use operation::{
    validate_time, BluetoothUpdate, BrightnessMode, DisplayUpdate, ScreensaverMode,
    ScreensaverUpdate, ValidationError, VolumeUpdate,
};
pub use rest_client::HttpMethod;
