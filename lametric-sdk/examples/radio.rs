//! Play the radio on the first LaMetric device for a while, then stop it
//!
//! Run with: cargo run -p lametric-sdk --example radio [seconds]

use std::thread;
use std::time::Duration;

use lametric_sdk::logging::init_logging_from_env;
use lametric_sdk::{LaMetricManager, SdkError};

fn main() -> Result<(), SdkError> {
    let _ = init_logging_from_env();

    let seconds = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(10);

    let manager = LaMetricManager::new()?;
    let device = manager
        .get_devices(false, true)?
        .into_iter()
        .next()
        .ok_or(SdkError::NoDeviceSelected)?;
    manager.set_device(device)?;

    println!("Switching to the radio");
    manager.switch_to_app("com.lametric.radio")?;
    manager.radio_play()?;

    thread::sleep(Duration::from_secs(seconds));
    println!("Next station");
    manager.radio_next()?;

    thread::sleep(Duration::from_secs(seconds));
    manager.radio_stop()?;
    println!("Stopped");

    Ok(())
}
