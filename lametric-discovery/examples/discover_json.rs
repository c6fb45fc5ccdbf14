//! LaMetric discovery that outputs JSON for scripting
//!
//! Usage: cargo run -p lametric-sdk-discovery --example discover_json [timeout-secs]

use lametric_discovery::discover_lametric_devices_with_timeout;
use std::time::Duration;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let timeout = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(5);

    let devices = discover_lametric_devices_with_timeout(Duration::from_secs(timeout))?;

    println!("{}", serde_json::to_string_pretty(&devices)?);
    Ok(())
}
