//! Private HTTP session layer for LaMetric communication
//!
//! This crate provides the two sessions the SDK talks through: a cloud
//! session authenticated with an OAuth2 client-credentials token, and a local
//! session that reaches a device on the LAN with per-request Basic auth.
//! Both are created lazily by a [`SessionProvider`] and cached until
//! invalidated.

mod error;
mod provider;

pub use error::RestError;
pub use provider::{
    AccessToken, CloudSessionProvider, Credentials, LocalSessionProvider, SessionProvider,
    CLIENT_ID_ENV, CLIENT_SECRET_ENV, DEFAULT_CLOUD_BASE_URL,
};

use std::fmt;

use serde_json::Value;
use tracing::{debug, trace};

/// HTTP methods used by the LaMetric cloud and device APIs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether requests with this method carry a JSON body
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }

    fn to_reqwest(self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// HTTP Basic credentials supplied per request
#[derive(Clone, PartialEq, Eq)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// A transport session: a reusable HTTP client plus the auth material it
/// carries on every request
#[derive(Debug, Clone)]
pub struct Session {
    http: reqwest::blocking::Client,
    token: Option<AccessToken>,
}

impl Session {
    pub(crate) fn new(http: reqwest::blocking::Client, token: Option<AccessToken>) -> Self {
        Self { http, token }
    }

    /// Bearer token attached to every request, if this is a cloud session
    pub fn token(&self) -> Option<&AccessToken> {
        self.token.as_ref()
    }

    /// Execute a request and return the parsed JSON body
    ///
    /// POST and PUT always send a JSON body (`{}` when none is given).
    /// A non-2xx answer becomes [`RestError::Status`] with the response body;
    /// an empty 2xx body parses as `null`.
    pub fn execute(
        &self,
        method: HttpMethod,
        url: &str,
        auth: Option<&BasicAuth>,
        body: Option<&Value>,
    ) -> Result<Value, RestError> {
        debug!(%method, url, "executing request");

        let mut request = self.http.request(method.to_reqwest(), url);

        if let Some(token) = &self.token {
            request = request.bearer_auth(&token.access_token);
        }
        if let Some(auth) = auth {
            request = request.basic_auth(&auth.username, Some(&auth.password));
        }
        if method.has_body() {
            let empty = Value::Object(serde_json::Map::new());
            request = request.json(body.unwrap_or(&empty));
        }

        let response = request
            .send()
            .map_err(|e| RestError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| RestError::Network(e.to_string()))?;
        trace!(status = status.as_u16(), body = %text, "received response");

        if !status.is_success() {
            return Err(RestError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_json_body(&text)
    }

    /// Shorthand for an unauthenticated-by-Basic GET
    pub fn get(&self, url: &str) -> Result<Value, RestError> {
        self.execute(HttpMethod::Get, url, None, None)
    }
}

fn parse_json_body(text: &str) -> Result<Value, RestError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(text).map_err(|e| RestError::Parse(e.to_string()))
}
