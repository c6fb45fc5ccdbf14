//! Notification payload models
//!
//! A [`Notification`] wraps a [`Model`]: frames shown one after another,
//! repeated `cycles` times, optionally with a [`Sound`].

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::operation::ValidationError;

/// Sounds available in the `notifications` category
pub const SOUND_IDS: &[&str] = &[
    "bicycle",
    "car",
    "cash",
    "cat",
    "dog",
    "dog2",
    "energy",
    "knock-knock",
    "letter_email",
    "lose1",
    "lose2",
    "negative1",
    "negative2",
    "negative3",
    "negative4",
    "negative5",
    "notification",
    "notification2",
    "notification3",
    "notification4",
    "open_door",
    "positive1",
    "positive2",
    "positive3",
    "positive4",
    "positive5",
    "positive6",
    "statistic",
    "thunder",
    "water1",
    "water2",
    "win",
    "win2",
    "wind",
    "wind_short",
];

/// Sounds available in the `alarms` category
pub const ALARM_IDS: &[&str] = &[
    "alarm1", "alarm2", "alarm3", "alarm4", "alarm5", "alarm6", "alarm7", "alarm8", "alarm9",
    "alarm10", "alarm11", "alarm12", "alarm13",
];

/// Progress shown by a goal frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalData {
    pub start: i64,
    pub current: i64,
    pub end: i64,
    pub unit: String,
}

impl Default for GoalData {
    fn default() -> Self {
        Self {
            start: 0,
            current: 0,
            end: 100,
            unit: "%".to_string(),
        }
    }
}

/// One frame of a notification
///
/// `icon` is either an icon id such as `i210` or a `data:image/png;base64,`
/// URI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Frame {
    Simple {
        icon: String,
        text: String,
    },
    Goal {
        icon: String,
        #[serde(rename = "goalData")]
        goal_data: GoalData,
    },
    SpikeChart {
        #[serde(rename = "chartData")]
        chart_data: Vec<i64>,
    },
}

impl Frame {
    pub fn simple(icon: impl Into<String>, text: impl Into<String>) -> Self {
        Frame::Simple {
            icon: icon.into(),
            text: text.into(),
        }
    }

    pub fn goal(icon: impl Into<String>, goal_data: GoalData) -> Self {
        Frame::Goal {
            icon: icon.into(),
            goal_data,
        }
    }

    pub fn spike_chart(chart_data: Vec<i64>) -> Self {
        Frame::SpikeChart { chart_data }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundCategory {
    Notifications,
    Alarms,
}

impl SoundCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCategory::Notifications => "notifications",
            SoundCategory::Alarms => "alarms",
        }
    }

    /// Sound ids valid in this category
    pub fn ids(&self) -> &'static [&'static str] {
        match self {
            SoundCategory::Notifications => SOUND_IDS,
            SoundCategory::Alarms => ALARM_IDS,
        }
    }
}

impl FromStr for SoundCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "notifications" => Ok(SoundCategory::Notifications),
            "alarms" => Ok(SoundCategory::Alarms),
            other => Err(ValidationError::invalid_value(
                "category",
                other,
                "expected one of: notifications, alarms",
            )),
        }
    }
}

/// A sound played with a notification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawSound")]
pub struct Sound {
    category: SoundCategory,
    id: String,
    repeat: u32,
}

#[derive(Deserialize)]
struct RawSound {
    category: SoundCategory,
    id: String,
    repeat: u32,
}

impl TryFrom<RawSound> for Sound {
    type Error = ValidationError;

    fn try_from(raw: RawSound) -> Result<Self, Self::Error> {
        Sound::new(raw.category, raw.id, raw.repeat)
    }
}

impl Sound {
    /// Create a sound; `id` must belong to `category` and `repeat` must be positive
    pub fn new(category: SoundCategory, id: impl Into<String>, repeat: u32) -> Result<Self, ValidationError> {
        let id = id.into();
        if !category.ids().contains(&id.as_str()) {
            return Err(ValidationError::invalid_value(
                "id",
                &id,
                format!("not a sound of category '{}'", category.as_str()),
            ));
        }
        if repeat == 0 {
            return Err(ValidationError::invalid_value("repeat", repeat, "must be greater than 0"));
        }
        Ok(Self { category, id, repeat })
    }

    pub fn category(&self) -> SoundCategory {
        self.category
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn repeat(&self) -> u32 {
        self.repeat
    }
}

/// Frames, repetition count and optional sound of a notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    cycles: u32,
    frames: Vec<Frame>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    sound: Option<Sound>,
}

impl Model {
    /// Create a model; `cycles` of 0 repeats until dismissed, negative values are rejected
    pub fn new(frames: Vec<Frame>, cycles: i64, sound: Option<Sound>) -> Result<Self, ValidationError> {
        let cycles = u32::try_from(cycles)
            .map_err(|_| ValidationError::range_error("cycles", 0, u32::MAX, cycles))?;
        Ok(Self { cycles, frames, sound })
    }

    /// Repetitions; 0 repeats until dismissed
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn sound(&self) -> Option<&Sound> {
        self.sound.as_ref()
    }

    pub fn add_frame(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    pub fn add_frames(&mut self, frames: impl IntoIterator<Item = Frame>) {
        self.frames.extend(frames);
    }
}

impl Default for Model {
    fn default() -> Self {
        Self {
            cycles: 1,
            frames: Vec::new(),
            sound: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Info,
    #[default]
    Warning,
    Critical,
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "info" => Ok(Priority::Info),
            "warning" => Ok(Priority::Warning),
            "critical" => Ok(Priority::Critical),
            other => Err(ValidationError::invalid_value(
                "priority",
                other,
                "expected one of: info, warning, critical",
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconType {
    None,
    Info,
    Alert,
}

impl FromStr for IconType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(IconType::None),
            "info" => Ok(IconType::Info),
            "alert" => Ok(IconType::Alert),
            other => Err(ValidationError::invalid_value(
                "icon_type",
                other,
                "expected one of: none, info, alert",
            )),
        }
    }
}

/// Body of `POST /device/notifications`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNotification")]
pub struct Notification {
    model: Model,
    priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    icon_type: Option<IconType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    lifetime: Option<u64>,
}

#[derive(Deserialize)]
struct RawNotification {
    model: Model,
    #[serde(default)]
    priority: Priority,
    #[serde(default)]
    icon_type: Option<IconType>,
    #[serde(default)]
    lifetime: Option<u64>,
}

impl TryFrom<RawNotification> for Notification {
    type Error = ValidationError;

    fn try_from(raw: RawNotification) -> Result<Self, Self::Error> {
        let notification = Notification::new(raw.model).with_priority(raw.priority);
        let notification = match raw.icon_type {
            Some(icon_type) => notification.with_icon_type(icon_type),
            None => notification,
        };
        match raw.lifetime {
            Some(lifetime) => notification.with_lifetime(lifetime),
            None => Ok(notification),
        }
    }
}

impl Notification {
    /// A `warning` notification without icon type or lifetime
    pub fn new(model: Model) -> Self {
        Self {
            model,
            priority: Priority::default(),
            icon_type: None,
            lifetime: None,
        }
    }

    /// Build a notification from string parameters, validating each one
    pub fn parse(
        model: Model,
        priority: &str,
        icon_type: Option<&str>,
        lifetime: Option<u64>,
    ) -> Result<Self, ValidationError> {
        let notification = Self::new(model).with_priority(priority.parse()?);
        let notification = match icon_type {
            Some(icon_type) => notification.with_icon_type(icon_type.parse()?),
            None => notification,
        };
        match lifetime {
            Some(lifetime) => notification.with_lifetime(lifetime),
            None => Ok(notification),
        }
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn icon_type(&self) -> Option<IconType> {
        self.icon_type
    }

    /// Milliseconds the notification stays in the queue
    pub fn lifetime(&self) -> Option<u64> {
        self.lifetime
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_icon_type(mut self, icon_type: IconType) -> Self {
        self.icon_type = Some(icon_type);
        self
    }

    pub fn with_lifetime(mut self, lifetime: u64) -> Result<Self, ValidationError> {
        if lifetime == 0 {
            return Err(ValidationError::invalid_value("lifetime", lifetime, "must be greater than 0"));
        }
        self.lifetime = Some(lifetime);
        Ok(self)
    }
}
