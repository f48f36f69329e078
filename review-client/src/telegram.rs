//! Telegram Bot API client

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::NotifyError;
use crate::truncate_body;

/// Public Bot API base URL
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// HTTP client for the Telegram Bot API
///
/// Bound to a single destination chat: every message goes to `chat_id`.
#[derive(Clone)]
pub struct TelegramClient {
    /// Bot API base URL (e.g., "https://api.telegram.org")
    api_url: String,
    /// Bot token
    token: String,
    /// Destination chat identifier
    chat_id: String,
    /// HTTP client instance
    client: Client,
}

/// Identity of the bot, as returned by `getMe`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BotUser {
    pub id: i64,
    pub first_name: String,
    pub username: Option<String>,
}

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Envelope wrapping every Bot API response
#[derive(Debug, Deserialize)]
struct BotResponse<T> {
    ok: bool,
    result: Option<T>,
    error_code: Option<u16>,
    description: Option<String>,
}

impl TelegramClient {
    /// Create a client against the public Bot API
    ///
    /// # Arguments
    /// * `token` - Bot token issued by BotFather
    /// * `chat_id` - Chat that receives every message
    pub fn new(token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self::with_api_url(DEFAULT_API_URL, token, chat_id)
    }

    /// Create a client against a custom Bot API server
    pub fn with_api_url(
        api_url: impl Into<String>,
        token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Self {
        let api_url = api_url.into();
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.into(),
            chat_id: chat_id.into(),
            client: Client::new(),
        }
    }

    /// Get the Bot API base URL
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Get the destination chat identifier
    pub fn chat_id(&self) -> &str {
        &self.chat_id
    }

    /// Check the bot token by asking the Bot API who we are
    pub async fn get_me(&self) -> Result<BotUser, NotifyError> {
        let response = self.client.get(self.method_url("getMe")).send().await?;

        self.handle_response(response).await
    }

    /// Send a text message to the configured chat
    pub async fn send_message(&self, text: &str) -> Result<(), NotifyError> {
        let request = SendMessageRequest {
            chat_id: &self.chat_id,
            text,
        };

        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&request)
            .send()
            .await?;
        self.handle_response::<serde_json::Value>(response).await?;

        debug!("The message: {} - has been sent successfully.", text);
        Ok(())
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.api_url, self.token, method)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Unwrap a Bot API envelope
    ///
    /// A response is only successful when both the HTTP status and the
    /// envelope's `ok` flag say so.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, NotifyError> {
        let status = response.status();
        let body = response.text().await?;

        let envelope: BotResponse<T> = serde_json::from_str(&body).map_err(|e| {
            if status.is_success() {
                NotifyError::Decode(format!("{}: {}", e, truncate_body(&body)))
            } else {
                NotifyError::Rejected {
                    status: status.as_u16(),
                    description: truncate_body(&body),
                }
            }
        })?;

        if !status.is_success() || !envelope.ok {
            return Err(NotifyError::Rejected {
                status: envelope.error_code.unwrap_or(status.as_u16()),
                description: envelope
                    .description
                    .unwrap_or_else(|| "Unknown error".to_string()),
            });
        }

        envelope
            .result
            .ok_or_else(|| NotifyError::Decode("missing result in Bot API response".to_string()))
    }
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("api_url", &self.api_url)
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}
