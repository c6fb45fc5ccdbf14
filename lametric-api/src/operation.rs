//! Validated request bodies for the device settings endpoints
//!
//! Every constructor checks its parameters before a body exists, so an
//! invalid value is rejected before any request can be issued.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::Serialize;

/// Validation error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Parameter '{parameter}' value '{value}' is out of range ({min}..={max})")]
    RangeError {
        parameter: String,
        value: String,
        min: String,
        max: String,
    },

    #[error("Parameter '{parameter}' value '{value}' is invalid: {reason}")]
    InvalidValue {
        parameter: String,
        value: String,
        reason: String,
    },

    #[error("Required parameter '{parameter}' is missing")]
    MissingParameter { parameter: String },
}

impl ValidationError {
    pub fn range_error(
        parameter: &str,
        min: impl fmt::Display,
        max: impl fmt::Display,
        value: impl fmt::Display,
    ) -> Self {
        Self::RangeError {
            parameter: parameter.to_string(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }

    pub fn invalid_value(parameter: &str, value: impl fmt::Display, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            parameter: parameter.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn missing(parameter: &str) -> Self {
        Self::MissingParameter {
            parameter: parameter.to_string(),
        }
    }
}

/// Upper bound shared by brightness and volume
pub const MAX_LEVEL: u8 = 100;

fn check_level(parameter: &str, value: u8) -> Result<u8, ValidationError> {
    if value > MAX_LEVEL {
        return Err(ValidationError::range_error(parameter, 0, MAX_LEVEL, value));
    }
    Ok(value)
}

/// Validate a time of day in `HH:MM` or `HH:MM:SS` form
pub fn validate_time(parameter: &str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    let valid = NaiveTime::parse_from_str(trimmed, "%H:%M:%S").is_ok()
        || NaiveTime::parse_from_str(trimmed, "%H:%M").is_ok();

    if valid {
        Ok(trimmed.to_string())
    } else {
        Err(ValidationError::invalid_value(parameter, value, "expected HH:MM or HH:MM:SS"))
    }
}

/// How the display chooses its brightness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BrightnessMode {
    Auto,
    Manual,
}

impl BrightnessMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BrightnessMode::Auto => "auto",
            BrightnessMode::Manual => "manual",
        }
    }
}

impl FromStr for BrightnessMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(BrightnessMode::Auto),
            "manual" => Ok(BrightnessMode::Manual),
            other => Err(ValidationError::invalid_value(
                "brightness_mode",
                other,
                "expected one of: auto, manual",
            )),
        }
    }
}

/// Body of `PUT /device/display` changing the brightness
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayUpdate {
    brightness: u8,
    brightness_mode: BrightnessMode,
}

impl DisplayUpdate {
    pub fn new(brightness: u8, brightness_mode: BrightnessMode) -> Result<Self, ValidationError> {
        Ok(Self {
            brightness: check_level("brightness", brightness)?,
            brightness_mode,
        })
    }

    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn brightness_mode(&self) -> BrightnessMode {
        self.brightness_mode
    }
}

/// Body of `PUT /device/audio`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VolumeUpdate {
    volume: u8,
}

impl VolumeUpdate {
    pub fn new(volume: u8) -> Result<Self, ValidationError> {
        Ok(Self {
            volume: check_level("volume", volume)?,
        })
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }
}

/// Body of `PUT /device/bluetooth`; at least one field is set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BluetoothUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    active: Option<bool>,
}

impl BluetoothUpdate {
    pub fn new(active: Option<bool>, name: Option<String>) -> Result<Self, ValidationError> {
        if active.is_none() && name.is_none() {
            return Err(ValidationError::missing("active or name"));
        }
        Ok(Self { name, active })
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn active(&self) -> Option<bool> {
        self.active
    }
}

/// When the screensaver kicks in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreensaverMode {
    WhenDark,
    TimeBased,
}

impl FromStr for ScreensaverMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "when_dark" => Ok(ScreensaverMode::WhenDark),
            "time_based" => Ok(ScreensaverMode::TimeBased),
            other => Err(ValidationError::invalid_value(
                "mode",
                other,
                "expected one of: when_dark, time_based",
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreensaverModeParams {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Screensaver {
    pub enabled: bool,
    pub mode: ScreensaverMode,
    pub mode_params: ScreensaverModeParams,
}

/// Body of `PUT /device/display` changing the screensaver
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreensaverUpdate {
    screensaver: Screensaver,
}

impl ScreensaverUpdate {
    /// Build a screensaver update.
    ///
    /// `TimeBased` requires both times; they are ignored for `WhenDark`.
    pub fn new(
        mode: ScreensaverMode,
        mode_enabled: bool,
        start_time: Option<&str>,
        end_time: Option<&str>,
        screensaver_enabled: bool,
    ) -> Result<Self, ValidationError> {
        let (start_time, end_time) = match mode {
            ScreensaverMode::WhenDark => (None, None),
            ScreensaverMode::TimeBased => {
                let start = start_time.ok_or_else(|| ValidationError::missing("start_time"))?;
                let end = end_time.ok_or_else(|| ValidationError::missing("end_time"))?;
                (
                    Some(validate_time("start_time", start)?),
                    Some(validate_time("end_time", end)?),
                )
            }
        };

        Ok(Self {
            screensaver: Screensaver {
                enabled: screensaver_enabled,
                mode,
                mode_params: ScreensaverModeParams {
                    enabled: mode_enabled,
                    start_time,
                    end_time,
                },
            },
        })
    }

    pub fn screensaver(&self) -> &Screensaver {
        &self.screensaver
    }
}
