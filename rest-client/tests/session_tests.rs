//! Session lifecycle tests against a mock cloud and a mock device

use mockito::{Matcher, Server};
use rest_client::{
    BasicAuth, CloudSessionProvider, Credentials, HttpMethod, LocalSessionProvider, RestError,
    SessionProvider,
};
use rstest::rstest;
use serde_json::json;

const TOKEN_BODY: &str = r#"{"access_token":"abc-token","token_type":"bearer","expires_in":3600}"#;

fn token_mock(server: &mut Server, client_id: &str, hits: usize) -> mockito::Mock {
    server
        .mock("POST", "/oauth2/token")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("grant_type".into(), "client_credentials".into()),
            Matcher::UrlEncoded("client_id".into(), client_id.into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(TOKEN_BODY)
        .expect(hits)
        .create()
}

#[test]
fn test_cloud_session_fetches_token_once() {
    let mut server = Server::new();
    let token = token_mock(&mut server, "my-id", 1);

    let provider =
        CloudSessionProvider::with_base_url(Credentials::new("my-id", "my-secret"), server.url());
    assert!(!provider.is_configured());

    let first = provider.session().expect("session should be created");
    let second = provider.session().expect("session should be cached");

    assert_eq!(first.token().map(|t| t.access_token.as_str()), Some("abc-token"));
    assert_eq!(second.token().and_then(|t| t.expires_in), Some(3600));
    assert!(provider.is_configured());
    token.assert();
}

#[test]
fn test_credential_change_forces_reauthentication() {
    let mut server = Server::new();
    let first_token = token_mock(&mut server, "first-id", 1);
    let second_token = token_mock(&mut server, "second-id", 1);

    let provider = CloudSessionProvider::with_base_url(
        Credentials::new("first-id", "secret"),
        server.url(),
    );
    provider.session().unwrap();

    provider.set_credentials(Credentials::new("second-id", "secret"));
    assert!(!provider.is_configured());
    provider.session().unwrap();

    first_token.assert();
    second_token.assert();
}

#[test]
fn test_invalidate_forces_new_token() {
    let mut server = Server::new();
    let token = token_mock(&mut server, "my-id", 2);

    let provider =
        CloudSessionProvider::with_base_url(Credentials::new("my-id", "secret"), server.url());
    provider.session().unwrap();
    provider.invalidate();
    provider.session().unwrap();

    token.assert();
}

#[rstest]
#[case(401, "invalid_client")]
#[case(500, "boom")]
fn test_token_failure_is_authentication_error(#[case] status: usize, #[case] body: &str) {
    let mut server = Server::new();
    let _token = server
        .mock("POST", "/oauth2/token")
        .with_status(status)
        .with_body(body)
        .create();

    let provider =
        CloudSessionProvider::with_base_url(Credentials::new("id", "secret"), server.url());

    match provider.session().unwrap_err() {
        RestError::Authentication(msg) => {
            assert!(msg.contains(&status.to_string()));
            assert!(msg.contains(body));
        }
        other => panic!("Expected RestError::Authentication, got {:?}", other),
    }
    assert!(!provider.is_configured());
}

#[test]
fn test_cloud_session_sends_bearer_token() {
    let mut server = Server::new();
    let _token = token_mock(&mut server, "id", 1);
    let user = server
        .mock("GET", "/users/me")
        .match_header("authorization", "Bearer abc-token")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"id":1,"name":"Jane"}"#)
        .create();

    let provider =
        CloudSessionProvider::with_base_url(Credentials::new("id", "secret"), server.url());
    let session = provider.session().unwrap();
    let me = session.get(&provider.url("/users/me")).unwrap();

    assert_eq!(me, json!({"id": 1, "name": "Jane"}));
    user.assert();
}

#[test]
fn test_local_session_basic_auth_and_json_body() {
    let mut server = Server::new();
    let audio = server
        .mock("PUT", "/api/v2/device/audio")
        .match_header("authorization", "Basic ZGV2OnNlY3JldA==")
        .match_body(Matcher::Json(json!({"volume": 30})))
        .with_status(200)
        .with_body(r#"{"success":{"data":{"volume":30}}}"#)
        .create();

    let provider = LocalSessionProvider::new();
    let session = provider.session().unwrap();
    let result = session
        .execute(
            HttpMethod::Put,
            &format!("{}/api/v2/device/audio", server.url()),
            Some(&BasicAuth::new("dev", "secret")),
            Some(&json!({"volume": 30})),
        )
        .unwrap();

    assert_eq!(result["success"]["data"]["volume"], 30);
    audio.assert();
}

#[test]
fn test_post_without_body_sends_empty_object() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/thing")
        .match_body(Matcher::Json(json!({})))
        .with_status(201)
        .with_body("")
        .create();

    let session = LocalSessionProvider::new().session().unwrap();
    let result = session
        .execute(HttpMethod::Post, &format!("{}/thing", server.url()), None, None)
        .unwrap();

    assert!(result.is_null());
    mock.assert();
}

#[test]
fn test_non_success_status_carries_status_and_body() {
    let mut server = Server::new();
    let _mock = server
        .mock("DELETE", "/api/v2/device/notifications/42")
        .with_status(404)
        .with_body(r#"{"errors":[{"message":"not found"}]}"#)
        .create();

    let session = LocalSessionProvider::new().session().unwrap();
    let err = session
        .execute(
            HttpMethod::Delete,
            &format!("{}/api/v2/device/notifications/42", server.url()),
            None,
            None,
        )
        .unwrap_err();

    assert_eq!(err.status(), Some(404));
    match err {
        RestError::Status { body, .. } => assert!(body.contains("not found")),
        other => panic!("Expected RestError::Status, got {:?}", other),
    }
}
