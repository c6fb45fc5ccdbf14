//! Send "Hello World!" to every LaMetric device of the account
//!
//! Needs the cloud credentials in LAMETRIC_CLIENT_ID / LAMETRIC_CLIENT_SECRET
//! or in ~/.lmconfig (created on first run).
//!
//! Run with: cargo run -p lametric-sdk --example hello_world

use lametric_sdk::logging::init_logging_from_env;
use lametric_sdk::{Frame, LaMetricManager, ManagerOptions, Model, Notification, SdkError};

fn run() -> Result<(), SdkError> {
    let manager = LaMetricManager::with_options(ManagerOptions {
        auto_create_config: true,
        ..ManagerOptions::default()
    })?;

    let devices = manager.get_devices(false, true)?;
    if devices.is_empty() {
        println!("No LaMetric devices registered with this account");
        return Ok(());
    }

    for device in devices {
        println!(
            "Sending to {} ({})",
            device.name().unwrap_or("unnamed"),
            device.ipv4_internal
        );
        manager.set_device(device)?;

        let model = Model::new(vec![Frame::simple("i210", "Hello World!")], 1, None)?;
        manager.send_notification(&Notification::new(model))?;
    }

    Ok(())
}

fn main() {
    if let Err(e) = init_logging_from_env() {
        eprintln!("Logging disabled: {}", e);
    }

    if let Err(e) = run() {
        eprintln!("{}", e);
        std::process::exit(if e.is_fatal() { 2 } else { 1 });
    }
}
