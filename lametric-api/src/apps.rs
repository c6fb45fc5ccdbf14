//! Resolution of app actions into device requests
//!
//! An app action is addressed by package and action name. Resolution checks
//! both against the current [`AppInventory`], picks the package's widget and
//! yields the concrete [`ActionRequest`]; nothing is sent until the request
//! is executed.

use serde::Serialize;
use serde_json::{json, Value};

use crate::endpoint::Endpoint;
use crate::error::{ApiError, Result};
use crate::models::AppInventory;
use rest_client::HttpMethod;

/// Built-in clock app (alarm)
pub const CLOCK_PACKAGE: &str = "com.lametric.clock";
/// Built-in radio app
pub const RADIO_PACKAGE: &str = "com.lametric.radio";
/// Built-in countdown app
pub const COUNTDOWN_PACKAGE: &str = "com.lametric.countdown";
/// Built-in stopwatch app
pub const STOPWATCH_PACKAGE: &str = "com.lametric.stopwatch";

/// A concrete device request: method, path below the API root, JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRequest {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
}

impl ActionRequest {
    pub fn new(endpoint: &Endpoint) -> Self {
        Self {
            method: endpoint.method(),
            path: endpoint.path(),
            body: None,
        }
    }

    /// Attach a JSON body
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach a serializable body
    pub fn with_json<T: Serialize>(self, body: &T) -> Result<Self> {
        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::Parse(format!("Failed to serialize request body: {}", e)))?;
        Ok(self.with_body(body))
    }
}

impl From<Endpoint> for ActionRequest {
    fn from(endpoint: Endpoint) -> Self {
        Self::new(&endpoint)
    }
}

/// Resolve `action` of `package` into `POST .../widgets/{widget}/action`.
///
/// Fails with `UnknownPackage`, `UnsupportedAction` or `NoWidget` without
/// touching the network.
pub fn app_action(
    inventory: &AppInventory,
    package: &str,
    action: &str,
    params: Option<Value>,
) -> Result<ActionRequest> {
    let app = inventory.app(package)?;
    if !app.supports(action) {
        return Err(ApiError::UnsupportedAction {
            package: package.to_string(),
            action: action.to_string(),
        });
    }
    let widget = inventory.widget_id(package)?;

    let mut body = json!({ "id": action });
    if let Some(params) = params {
        body["params"] = params;
    }

    let endpoint = Endpoint::WidgetAction {
        package: package.to_string(),
        widget: widget.to_string(),
    };
    Ok(ActionRequest::new(&endpoint).with_body(body))
}

/// Resolve `PUT .../widgets/{widget}/activate` bringing `package` to the foreground
pub fn app_activate(inventory: &AppInventory, package: &str) -> Result<ActionRequest> {
    let widget = inventory.widget_id(package)?;
    let endpoint = Endpoint::ActivateWidget {
        package: package.to_string(),
        widget: widget.to_string(),
    };
    Ok(ActionRequest::new(&endpoint))
}
