//! # LaMetric SDK - sync-first control of LaMetric Time devices
//!
//! Fetch the user's devices from the LaMetric cloud, select one, then talk
//! to it directly on the local network:
//!
//! ```rust,no_run
//! use lametric_sdk::{Frame, LaMetricManager, Model, Notification, Priority};
//!
//! fn main() -> Result<(), lametric_sdk::SdkError> {
//!     let manager = LaMetricManager::new()?;
//!
//!     for device in manager.get_devices(false, true)? {
//!         manager.set_device(device)?;
//!
//!         let model = Model::new(vec![Frame::simple("i210", "Hello World!")], 1, None)?;
//!         let notification = Notification::new(model).with_priority(Priority::Info);
//!         manager.send_notification(&notification)?;
//!
//!         manager.set_volume(30)?;
//!         manager.radio_play()?;
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Credentials
//!
//! The cloud needs an OAuth2 client id and secret. Each field is taken from
//! [`ManagerOptions::credentials`], then `LAMETRIC_CLIENT_ID` /
//! `LAMETRIC_CLIENT_SECRET`, then the `[lametric]` section of `~/.lmconfig`.
//! Device calls only need the device's API key, which the cloud device list
//! (or a hand-built [`Device`]) carries.
//!
//! ## Architecture
//!
//! ```text
//! lametric-sdk (LaMetricManager)
//!     ↓
//! lametric-api (endpoints, request bodies, app actions)   lametric-discovery (SSDP)
//!     ↓
//! rest-client (cloud OAuth2 and local Basic-auth sessions)
//! ```

// Main exports
pub use error::SdkError;
pub use manager::{LaMetricManager, ManagerOptions};

// Re-export commonly used types from the lower layers
pub use lametric_api::{
    ApiError, AppDescriptor, AppInventory, BrightnessMode, Device, DeviceApiConfig, Frame,
    GoalData, IconType, Model, Notification, Priority, ScreensaverMode, Sound, SoundCategory,
    ValidationError,
};
pub use lametric_discovery::{DeviceDetails, DiscoveryEngine, DiscoveryError};
pub use rest_client::{Credentials, SessionProvider};

pub mod cache;
pub mod config;
pub mod logging;

mod apps;
mod error;
mod manager;
