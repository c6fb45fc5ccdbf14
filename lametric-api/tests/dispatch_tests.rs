//! Integration tests for request dispatch against a mock device
//!
//! The mock server stands in for the device REST API; the client is pointed
//! at it with a plain-HTTP `DeviceApiConfig`.

use lametric_api::{
    app_action, ActionRequest, ApiError, AppInventory, Device, DeviceApiConfig, Endpoint,
    LaMetricClient, VolumeUpdate,
};
use mockito::{Matcher, Server, ServerGuard};
use rstest::rstest;
use serde_json::json;

// "dev:test-key"
const AUTH_HEADER: &str = "Basic ZGV2OnRlc3Qta2V5";

fn client_for(server: &ServerGuard) -> (LaMetricClient, Device) {
    let address = server.host_with_port();
    let (ip, port) = address
        .rsplit_once(':')
        .expect("mock server address has a port");

    let client = LaMetricClient::with_config(
        DeviceApiConfig {
            scheme: "http".to_string(),
            port: port.parse().expect("numeric port"),
        },
        false,
    );
    (client, Device::new(ip, "test-key"))
}

#[test]
fn test_get_sends_basic_auth() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/api/v2/device/audio")
        .match_header("authorization", AUTH_HEADER)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"volume": 35}"#)
        .create();

    let (client, device) = client_for(&server);
    let response = client.call(Endpoint::Audio, &device).unwrap();

    assert_eq!(response, json!({"volume": 35}));
    mock.assert();
}

#[test]
fn test_endpoint_map_uses_api_root() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/api/v2")
        .with_status(200)
        .with_body(r#"{"api_version": "2.0.0", "endpoints": {}}"#)
        .create();

    let (client, device) = client_for(&server);
    let response = client.call(Endpoint::EndpointMap, &device).unwrap();

    assert_eq!(response["api_version"], "2.0.0");
    mock.assert();
}

#[test]
fn test_put_sends_json_body() {
    let mut server = Server::new();
    let mock = server
        .mock("PUT", "/api/v2/device/audio")
        .match_body(Matcher::Json(json!({"volume": 60})))
        .with_status(200)
        .with_body(r#"{"success": {"data": {"volume": 60}}}"#)
        .create();

    let (client, device) = client_for(&server);
    let request = ActionRequest::new(&Endpoint::SetAudio)
        .with_json(&VolumeUpdate::new(60).unwrap())
        .unwrap();
    client.execute(&request, &device).unwrap();

    mock.assert();
}

#[rstest]
#[case(401, r#"{"errors": [{"message": "Authorization is required"}]}"#)]
#[case(404, r#"{"errors": [{"message": "Not found"}]}"#)]
#[case(500, "")]
fn test_error_status_is_surfaced(#[case] status: usize, #[case] body: &str) {
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/api/v2/device")
        .with_status(status)
        .with_body(body)
        .create();

    let (client, device) = client_for(&server);
    let error = client.call(Endpoint::DeviceState, &device).unwrap_err();

    match error {
        ApiError::Http { status: got, body: got_body } => {
            assert_eq!(got as usize, status);
            assert_eq!(got_body, body);
        }
        other => panic!("expected HTTP error, got {other:?}"),
    }
}

#[test]
fn test_unreachable_device_is_network_error() {
    let client = LaMetricClient::with_config(
        DeviceApiConfig {
            scheme: "http".to_string(),
            port: 1,
        },
        false,
    );
    let device = Device::new("127.0.0.1", "test-key");

    let error = client.call(Endpoint::Wifi, &device).unwrap_err();
    assert!(matches!(error, ApiError::Network(_)));
}

#[test]
fn test_app_action_round_trip() {
    let mut server = Server::new();
    let apps_mock = server
        .mock("GET", "/api/v2/device/apps/")
        .with_status(200)
        .with_body(
            json!({
                "com.lametric.radio": {
                    "package": "com.lametric.radio",
                    "vendor": "LaMetric",
                    "actions": {"radio.play": {}, "radio.stop": {}},
                    "widgets": {"589ed1b3fcdaa5180bf4848e55ba8061": {"index": 4}}
                }
            })
            .to_string(),
        )
        .create();
    let action_mock = server
        .mock(
            "POST",
            "/api/v2/device/apps/com.lametric.radio/widgets/589ed1b3fcdaa5180bf4848e55ba8061/action",
        )
        .match_header("authorization", AUTH_HEADER)
        .match_body(Matcher::Json(json!({"id": "radio.play"})))
        .with_status(200)
        .with_body(r#"{"success": {"data": {}, "path": "/api/v2/device/apps/com.lametric.radio/widgets/589ed1b3fcdaa5180bf4848e55ba8061/action"}}"#)
        .create();

    let (client, device) = client_for(&server);
    let apps = client.call(Endpoint::Apps, &device).unwrap();
    let inventory = AppInventory::from_value(&apps).unwrap();

    let request = app_action(&inventory, "com.lametric.radio", "radio.play", None).unwrap();
    client.execute(&request, &device).unwrap();

    apps_mock.assert();
    action_mock.assert();
}

#[test]
fn test_unsupported_action_sends_nothing() {
    let mut server = Server::new();
    let action_mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create();

    let inventory = AppInventory::from_value(&json!({
        "com.lametric.radio": {
            "package": "com.lametric.radio",
            "actions": {"radio.play": {}},
            "widgets": {"w1": {}}
        }
    }))
    .unwrap();

    let (client, device) = client_for(&server);
    let result = app_action(&inventory, "com.lametric.radio", "radio.rewind", None)
        .and_then(|request| client.execute(&request, &device));

    assert!(matches!(result, Err(ApiError::UnsupportedAction { .. })));
    action_mock.assert();
}

#[test]
fn test_delete_notification() {
    let mut server = Server::new();
    let mock = server
        .mock("DELETE", "/api/v2/device/notifications/50")
        .with_status(200)
        .with_body(r#"{"success": true}"#)
        .create();

    let (client, device) = client_for(&server);
    let response = client
        .call(Endpoint::RemoveNotification("50".to_string()), &device)
        .unwrap();

    assert_eq!(response, json!({"success": true}));
    mock.assert();
}
