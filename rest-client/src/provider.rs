//! Lazily created, cached sessions for the cloud and the local network

use std::fmt;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Deserialize;
use tracing::debug;

use crate::{RestError, Session};

/// Base URL of the LaMetric cloud API
pub const DEFAULT_CLOUD_BASE_URL: &str = "https://developer.lametric.com/api/v2";

/// Environment variable consulted for the client id
pub const CLIENT_ID_ENV: &str = "LAMETRIC_CLIENT_ID";

/// Environment variable consulted for the client secret
pub const CLIENT_SECRET_ENV: &str = "LAMETRIC_CLIENT_SECRET";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Capability to produce and cache a [`Session`]
pub trait SessionProvider {
    /// Return the cached session, creating it on first access
    fn session(&self) -> Result<Session, RestError>;

    /// Drop the cached session so the next access creates a fresh one
    fn invalidate(&self);

    /// Whether the provider is ready to hand out sessions
    fn is_configured(&self) -> bool;
}

/// OAuth2 client credentials for the LaMetric cloud
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: Some(client_id.into()),
            client_secret: Some(client_secret.into()),
        }
    }

    /// Credentials read from `LAMETRIC_CLIENT_ID` / `LAMETRIC_CLIENT_SECRET`
    pub fn from_env() -> Self {
        Self {
            client_id: std::env::var(CLIENT_ID_ENV).ok(),
            client_secret: std::env::var(CLIENT_SECRET_ENV).ok(),
        }
        .normalized()
    }

    /// Fill each missing field from `fallback`
    pub fn or(self, fallback: Credentials) -> Self {
        let this = self.normalized();
        let fallback = fallback.normalized();
        Self {
            client_id: this.client_id.or(fallback.client_id),
            client_secret: this.client_secret.or(fallback.client_secret),
        }
    }

    /// True when both fields are present and non-empty
    pub fn is_complete(&self) -> bool {
        matches!(
            (&self.client_id, &self.client_secret),
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty()
        )
    }

    // Empty strings count as absent
    fn normalized(self) -> Self {
        Self {
            client_id: self.client_id.filter(|s| !s.is_empty()),
            client_secret: self.client_secret.filter(|s| !s.is_empty()),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// OAuth2 token returned by the client-credentials grant
#[derive(Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

struct CloudState {
    credentials: Credentials,
    session: Option<Session>,
}

/// Session provider for the LaMetric cloud
///
/// The first call to [`SessionProvider::session`] builds an HTTP client and
/// immediately fetches a bearer token with the client-credentials grant.
/// The whole initialization runs under the state lock, so concurrent first
/// access fetches exactly one token.
pub struct CloudSessionProvider {
    base_url: String,
    state: Mutex<CloudState>,
}

impl CloudSessionProvider {
    pub fn new(credentials: Credentials) -> Self {
        Self::with_base_url(credentials, DEFAULT_CLOUD_BASE_URL)
    }

    /// Create a provider that talks to a different cloud authority
    pub fn with_base_url(credentials: Credentials, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            state: Mutex::new(CloudState {
                credentials,
                session: None,
            }),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a full cloud URL from a path such as `/users/me`
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn token_url(&self) -> String {
        self.url("/oauth2/token")
    }

    /// Replace the credentials and drop the cached session
    pub fn set_credentials(&self, credentials: Credentials) {
        let mut state = self.state.lock();
        state.credentials = credentials;
        state.session = None;
    }

    pub fn credentials(&self) -> Credentials {
        self.state.lock().credentials.clone()
    }

    fn create_session(&self, credentials: &Credentials) -> Result<Session, RestError> {
        let (client_id, client_secret) = match (&credentials.client_id, &credentials.client_secret)
        {
            (Some(id), Some(secret)) if credentials.is_complete() => (id, secret),
            _ => {
                return Err(RestError::Configuration(format!(
                    "Please make sure to set the client id and client secret via the \
                     constructor, the environment variables {} and {} or the config file; \
                     otherwise, the LaMetric cloud cannot be accessed",
                    CLIENT_ID_ENV, CLIENT_SECRET_ENV
                )))
            }
        };

        let http = reqwest::blocking::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RestError::Network(format!("Failed to create HTTP client: {}", e)))?;

        let token = fetch_token(&http, &self.token_url(), client_id, client_secret)?;
        Ok(Session::new(http, Some(token)))
    }
}

impl SessionProvider for CloudSessionProvider {
    fn session(&self) -> Result<Session, RestError> {
        let mut state = self.state.lock();
        if let Some(session) = &state.session {
            return Ok(session.clone());
        }

        debug!("creating LaMetric cloud session");
        let session = self.create_session(&state.credentials)?;
        state.session = Some(session.clone());
        Ok(session)
    }

    fn invalidate(&self) {
        self.state.lock().session = None;
    }

    fn is_configured(&self) -> bool {
        self.state.lock().session.is_some()
    }
}

impl fmt::Debug for CloudSessionProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("CloudSessionProvider")
            .field("base_url", &self.base_url)
            .field("credentials", &state.credentials)
            .field("has_session", &state.session.is_some())
            .finish()
    }
}

/// Fetch a bearer token with the OAuth2 client-credentials grant
fn fetch_token(
    http: &reqwest::blocking::Client,
    token_url: &str,
    client_id: &str,
    client_secret: &str,
) -> Result<AccessToken, RestError> {
    debug!(token_url, "requesting OAuth2 token");

    let form = [
        ("grant_type", "client_credentials"),
        ("client_id", client_id),
        ("client_secret", client_secret),
    ];

    let response = http
        .post(token_url)
        .form(&form)
        .send()
        .map_err(|e| RestError::Authentication(format!("token request failed: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(RestError::Authentication(format!(
            "token request failed (HTTP {}): {}",
            status.as_u16(),
            body
        )));
    }

    response
        .json::<AccessToken>()
        .map_err(|e| RestError::Authentication(format!("invalid token response: {}", e)))
}

/// Session provider for direct device communication on the LAN
///
/// Sessions carry no credentials; callers pass Basic auth per request.
/// Certificate verification is disabled unless requested, since LaMetric
/// devices serve a self-signed certificate.
pub struct LocalSessionProvider {
    verify_certificates: bool,
    session: Mutex<Option<Session>>,
}

impl LocalSessionProvider {
    pub fn new() -> Self {
        Self::with_certificate_verification(false)
    }

    pub fn with_certificate_verification(verify_certificates: bool) -> Self {
        Self {
            verify_certificates,
            session: Mutex::new(None),
        }
    }

    pub fn verifies_certificates(&self) -> bool {
        self.verify_certificates
    }
}

impl Default for LocalSessionProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionProvider for LocalSessionProvider {
    fn session(&self) -> Result<Session, RestError> {
        let mut cached = self.session.lock();
        if let Some(session) = &*cached {
            return Ok(session.clone());
        }

        debug!(
            verify_certificates = self.verify_certificates,
            "creating local device session"
        );
        let http = reqwest::blocking::Client::builder()
            .danger_accept_invalid_certs(!self.verify_certificates)
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RestError::Network(format!("Failed to create HTTP client: {}", e)))?;

        let session = Session::new(http, None);
        *cached = Some(session.clone());
        Ok(session)
    }

    fn invalidate(&self) {
        *self.session.lock() = None;
    }

    fn is_configured(&self) -> bool {
        true
    }
}

impl fmt::Debug for LocalSessionProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSessionProvider")
            .field("verify_certificates", &self.verify_certificates)
            .finish()
    }
}
