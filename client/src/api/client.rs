use reqwest::header::{HeaderMap, AUTHORIZATION};
use serde_json::{json, Value};

use crate::config::Config;
use crate::state::SessionStore;

use super::types::ApiError;

/// HTTP client for the WorkTrack service. Reads the bearer token from
/// the session store on every authenticated call, so a session swap is
/// picked up immediately.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore,
}

impl ApiClient {
    pub fn new(config: &Config, session: SessionStore) -> Self {
        Self::new_with_base_url(config.api_base_url.clone(), session)
    }

    pub fn new_with_base_url(base_url: impl Into<String>, session: SessionStore) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            session,
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub(crate) fn http_client(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// The token is sent verbatim, empty or not; the server decides what
    /// an unusable credential means.
    pub(crate) fn auth_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let token = self.session.get().access_token;
        if let Ok(value) = format!("Bearer {}", token).parse() {
            headers.insert(AUTHORIZATION, value);
        }
        headers
    }

    /// Body reader for endpoints where an unparseable body is tolerated
    /// and treated as an empty object.
    pub(crate) async fn lenient_body(response: reqwest::Response) -> Value {
        response.json().await.unwrap_or_else(|_| json!({}))
    }

    /// Body reader for endpoints where an unparseable body counts as a
    /// transport failure.
    pub(crate) async fn strict_body(response: reqwest::Response) -> Result<Value, ApiError> {
        response.json().await.map_err(|err| {
            tracing::warn!(error = %err, "failed to decode response body");
            ApiError::Network
        })
    }
}

/// HTTP non-2xx and body-level `success:false` both denote failure; a
/// missing `success` field does not.
pub(crate) fn body_reports_failure(body: &Value) -> bool {
    matches!(body.get("success"), Some(Value::Bool(false)))
}

pub(crate) fn server_message(body: &Value, fallback: &str) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}
