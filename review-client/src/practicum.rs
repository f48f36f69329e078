//! Homework status API client

use reqwest::{Client, StatusCode, header::AUTHORIZATION};
use review_core::PollCursor;
use serde_json::Value;
use tracing::debug;

use crate::error::{ApiError, Result};
use crate::truncate_body;

/// Production endpoint of the homework status API
pub const DEFAULT_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

/// Embedded `code` the API uses for a rejected credential
const NOT_AUTHENTICATED_CODE: &str = "not_authenticated";

/// HTTP client for the homework status API
///
/// Authenticates with `Authorization: OAuth <token>` and asks for changes
/// since the cursor through the `from_date` query parameter.
#[derive(Clone)]
pub struct PracticumClient {
    /// Full URL of the statuses endpoint
    endpoint: String,
    /// OAuth token
    token: String,
    /// HTTP client instance
    client: Client,
}

impl PracticumClient {
    /// Create a new status API client
    ///
    /// # Arguments
    /// * `endpoint` - Full URL of the statuses endpoint
    /// * `token` - OAuth token of the account being watched
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self::with_client(endpoint, token, Client::new())
    }

    /// Create a new status API client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(endpoint: impl Into<String>, token: impl Into<String>, client: Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: token.into(),
            client,
        }
    }

    /// Get the endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch status changes since `cursor`
    ///
    /// Returns the decoded JSON body untouched; shape checks belong to
    /// `review_core::ResponseValidator`.
    pub async fn fetch(&self, cursor: PollCursor) -> Result<Value> {
        debug!("Requesting homework statuses from_date={}", cursor);

        let response = self
            .client
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", cursor.current())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        self.handle_response(status, &body)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Classify a status API response
    ///
    /// Checks the HTTP status first, then looks for an error payload inside
    /// a 200 body.
    fn handle_response(&self, status: StatusCode, body: &str) -> Result<Value> {
        let json = serde_json::from_str::<Value>(body);

        match status {
            StatusCode::OK => {}
            StatusCode::UNAUTHORIZED => {
                let detail = json
                    .ok()
                    .and_then(|v| string_at(&v, &["message"]))
                    .unwrap_or_else(|| truncate_body(body));
                return Err(ApiError::Unauthorized(detail));
            }
            StatusCode::BAD_REQUEST => {
                let detail = json
                    .ok()
                    .and_then(|v| string_at(&v, &["error", "error"]))
                    .unwrap_or_else(|| truncate_body(body));
                return Err(ApiError::BadCursor(detail));
            }
            other => return Err(ApiError::UnexpectedStatus(other.as_u16())),
        }

        let value = json.map_err(|e| ApiError::Decode(format!("{}: {}", e, truncate_body(body))))?;

        match embedded_error(&value) {
            Some(err) => Err(err),
            None => Ok(value),
        }
    }
}

impl std::fmt::Debug for PracticumClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PracticumClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

/// Detects the `{code, message}` and `{error: {error}}` failure payloads
fn embedded_error(value: &Value) -> Option<ApiError> {
    let map = value.as_object()?;
    if !map.contains_key("code") && !map.contains_key("error") {
        return None;
    }

    let code = string_at(value, &["code"]);
    let detail = string_at(value, &["message"])
        .or_else(|| string_at(value, &["error", "error"]))
        .or_else(|| string_at(value, &["error"]))
        .unwrap_or_default();

    if code.as_deref() == Some(NOT_AUTHENTICATED_CODE) {
        return Some(ApiError::Unauthorized(detail));
    }
    if detail.contains("from_date") {
        return Some(ApiError::BadCursor(detail));
    }

    Some(ApiError::Api {
        code: code.unwrap_or_else(|| "unknown".to_string()),
        detail,
    })
}

/// Follows `path` through nested objects and returns the string found there
fn string_at(value: &Value, path: &[&str]) -> Option<String> {
    path.iter()
        .try_fold(value, |node, key| node.get(*key))?
        .as_str()
        .map(str::to_string)
}
