//! Data types exchanged with the cloud and the device

mod app;
mod device;
pub mod notification;

pub use app::{AppDescriptor, AppInventory};
pub use device::Device;
pub use notification::{
    Frame, GoalData, IconType, Model, Notification, Priority, Sound, SoundCategory, ALARM_IDS,
    SOUND_IDS,
};
