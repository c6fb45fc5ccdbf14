//! Print the state of the first LaMetric device of the account
//!
//! Run with: cargo run -p lametric-sdk --example device_info

use lametric_sdk::logging::{init_logging, LoggingMode};
use lametric_sdk::{LaMetricManager, SdkError};

fn main() -> Result<(), SdkError> {
    let _ = init_logging(LoggingMode::Development);

    let manager = LaMetricManager::new()?;

    println!("User:");
    println!("{:#}", manager.get_user()?);

    let device = match manager.get_devices(false, true)?.into_iter().next() {
        Some(device) => device,
        None => {
            println!("No LaMetric devices registered with this account");
            return Ok(());
        }
    };

    println!("\nUsing {} ({})", device.name().unwrap_or("unnamed"), device.ipv4_internal);
    manager.set_device(device)?;

    println!("\nDevice: {:#}", manager.get_device_state()?);
    println!("\nDisplay: {:#}", manager.get_display()?);
    println!("\nVolume: {:#}", manager.get_volume()?);
    println!("\nBluetooth: {:#}", manager.get_bluetooth_state()?);
    println!("\nWi-Fi: {:#}", manager.get_wifi_state()?);

    println!("\nInstalled apps:");
    for app in manager.apps().iter() {
        let actions: Vec<&str> = app.actions.keys().map(String::as_str).collect();
        println!("  {} {} [{}]", app.package, app.version, actions.join(", "));
    }

    Ok(())
}
