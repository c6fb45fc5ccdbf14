use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use rest_client::HttpMethod;

/// Bytes escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

fn segment(value: &str) -> String {
    utf8_percent_encode(value, SEGMENT).to_string()
}

/// Routes of the local device REST API
///
/// Every route is relative to the device's API root
/// (`https://<ip>:4343/api/v2`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// API version and endpoint map
    EndpointMap,
    /// Full device state
    DeviceState,
    /// Display state, e.g. brightness
    Display,
    /// Modify display state (brightness, screensaver)
    SetDisplay,
    /// Current volume
    Audio,
    /// Change the volume
    SetAudio,
    /// Bluetooth state
    Bluetooth,
    /// Activate/deactivate bluetooth, change its name
    SetBluetooth,
    /// Wi-Fi state
    Wifi,
    /// Notifications in the queue
    Notifications,
    /// Push a new notification
    SendNotification,
    /// The notification that is currently visible
    CurrentNotification,
    /// One notification by id
    Notification(String),
    /// Remove a notification from the queue, or dismiss it if visible
    RemoveNotification(String),
    /// Installed apps
    Apps,
    /// Switch to the next app
    NextApp,
    /// Switch to the previous app
    PrevApp,
    /// Bring a widget to the foreground
    ActivateWidget { package: String, widget: String },
    /// Execute an action on a widget
    WidgetAction { package: String, widget: String },
}

impl Endpoint {
    /// HTTP method of this route
    pub fn method(&self) -> HttpMethod {
        match self {
            Endpoint::EndpointMap
            | Endpoint::DeviceState
            | Endpoint::Display
            | Endpoint::Audio
            | Endpoint::Bluetooth
            | Endpoint::Wifi
            | Endpoint::Notifications
            | Endpoint::CurrentNotification
            | Endpoint::Notification(_)
            | Endpoint::Apps => HttpMethod::Get,
            Endpoint::SetDisplay
            | Endpoint::SetAudio
            | Endpoint::SetBluetooth
            | Endpoint::NextApp
            | Endpoint::PrevApp
            | Endpoint::ActivateWidget { .. } => HttpMethod::Put,
            Endpoint::SendNotification | Endpoint::WidgetAction { .. } => HttpMethod::Post,
            Endpoint::RemoveNotification(_) => HttpMethod::Delete,
        }
    }

    /// Path of this route below the API root, parameters substituted
    pub fn path(&self) -> String {
        match self {
            Endpoint::EndpointMap => "/".to_string(),
            Endpoint::DeviceState => "/device".to_string(),
            Endpoint::Display | Endpoint::SetDisplay => "/device/display".to_string(),
            Endpoint::Audio | Endpoint::SetAudio => "/device/audio".to_string(),
            Endpoint::Bluetooth | Endpoint::SetBluetooth => "/device/bluetooth".to_string(),
            Endpoint::Wifi => "/device/wifi".to_string(),
            Endpoint::Notifications | Endpoint::SendNotification => {
                "/device/notifications".to_string()
            }
            Endpoint::CurrentNotification => "/device/notifications/current".to_string(),
            Endpoint::Notification(id) | Endpoint::RemoveNotification(id) => {
                format!("/device/notifications/{}", segment(id))
            }
            Endpoint::Apps => "/device/apps/".to_string(),
            Endpoint::NextApp => "/device/apps/next".to_string(),
            Endpoint::PrevApp => "/device/apps/prev".to_string(),
            Endpoint::ActivateWidget { package, widget } => {
                format!(
                    "/device/apps/{}/widgets/{}/activate",
                    segment(package),
                    segment(widget)
                )
            }
            Endpoint::WidgetAction { package, widget } => {
                format!(
                    "/device/apps/{}/widgets/{}/action",
                    segment(package),
                    segment(widget)
                )
            }
        }
    }
}
