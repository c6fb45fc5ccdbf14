//! Built-in app shortcuts
//!
//! Thin wrappers over [`LaMetricManager::app_exec`] for the apps every
//! LaMetric Time ships with.

use lametric_api::apps::{CLOCK_PACKAGE, COUNTDOWN_PACKAGE, RADIO_PACKAGE, STOPWATCH_PACKAGE};
use lametric_api::validate_time;
use serde_json::{json, Value};

use crate::{LaMetricManager, SdkError};

impl LaMetricManager {
    // ========================================================================
    // Radio
    // ========================================================================

    pub fn radio_play(&self) -> Result<Value, SdkError> {
        self.app_exec(RADIO_PACKAGE, "radio.play", None)
    }

    pub fn radio_stop(&self) -> Result<Value, SdkError> {
        self.app_exec(RADIO_PACKAGE, "radio.stop", None)
    }

    /// Switch to the previous station
    pub fn radio_prev(&self) -> Result<Value, SdkError> {
        self.app_exec(RADIO_PACKAGE, "radio.prev", None)
    }

    /// Switch to the next station
    pub fn radio_next(&self) -> Result<Value, SdkError> {
        self.app_exec(RADIO_PACKAGE, "radio.next", None)
    }

    // ========================================================================
    // Clock
    // ========================================================================

    /// Enable the alarm at `time` (`HH:MM` or `HH:MM:SS`)
    pub fn alarm_set(&self, time: &str, wake_with_radio: bool) -> Result<Value, SdkError> {
        let time = validate_time("time", time)?;
        let params = json!({
            "enabled": true,
            "time": time,
            "wake_with_radio": wake_with_radio,
        });
        self.app_exec(CLOCK_PACKAGE, "clock.alarm", Some(params))
    }

    pub fn alarm_disable(&self) -> Result<Value, SdkError> {
        self.app_exec(CLOCK_PACKAGE, "clock.alarm", Some(json!({ "enabled": false })))
    }

    // ========================================================================
    // Countdown
    // ========================================================================

    pub fn countdown_start(&self) -> Result<Value, SdkError> {
        self.app_exec(COUNTDOWN_PACKAGE, "countdown.start", None)
    }

    pub fn countdown_pause(&self) -> Result<Value, SdkError> {
        self.app_exec(COUNTDOWN_PACKAGE, "countdown.pause", None)
    }

    pub fn countdown_reset(&self) -> Result<Value, SdkError> {
        self.app_exec(COUNTDOWN_PACKAGE, "countdown.reset", None)
    }

    /// Set the countdown to `duration` seconds, optionally starting it
    pub fn countdown_set(&self, duration: u32, start_now: bool) -> Result<Value, SdkError> {
        let params = json!({ "duration": duration, "start_now": start_now });
        self.app_exec(COUNTDOWN_PACKAGE, "countdown.configure", Some(params))
    }

    // ========================================================================
    // Stopwatch
    // ========================================================================

    pub fn stopwatch_start(&self) -> Result<Value, SdkError> {
        self.app_exec(STOPWATCH_PACKAGE, "stopwatch.start", None)
    }

    pub fn stopwatch_pause(&self) -> Result<Value, SdkError> {
        self.app_exec(STOPWATCH_PACKAGE, "stopwatch.pause", None)
    }

    pub fn stopwatch_reset(&self) -> Result<Value, SdkError> {
        self.app_exec(STOPWATCH_PACKAGE, "stopwatch.reset", None)
    }
}
