//! Watcher configuration
//!
//! Defines every configurable parameter of the watcher: credentials for the
//! status API and the bot, endpoints, the polling interval, the starting
//! cursor and the texts notifications are rendered from.

use review_core::dedupe::DEFAULT_CAPACITY;
use review_core::MessageTemplates;
use std::time::Duration;
use thiserror::Error;

/// Default pause between poll cycles, in seconds
pub const DEFAULT_RETRY_PERIOD_SECS: u64 = 600;

/// Errors raised while loading configuration
///
/// All of them are fatal: the watcher never starts polling with a bad config.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Token is not correct! {0} is missing or empty")]
    MissingToken(&'static str),

    #[error("Environment TG id variable is missing")]
    MissingChatId,

    #[error("{name} must start with http:// or https://, got {value:?}")]
    InvalidUrl { name: &'static str, value: String },

    #[error("{name} must be an integer, got {value:?}")]
    InvalidNumber { name: &'static str, value: String },

    #[error("RETRY_PERIOD must be greater than 0")]
    ZeroRetryPeriod,
}

/// Watcher configuration
#[derive(Clone)]
pub struct Config {
    /// OAuth token for the homework status API
    pub practicum_token: String,

    /// Bot API token
    pub telegram_token: String,

    /// Chat that receives every notification
    pub telegram_chat_id: String,

    /// Full URL of the statuses endpoint
    pub endpoint: String,

    /// Bot API base URL
    pub telegram_api_url: String,

    /// Pause between the end of one cycle and the start of the next
    pub retry_period: Duration,

    /// Initial `from_date` cursor (unix seconds)
    pub from_date: i64,

    /// Status/error templates and verdict texts
    pub templates: MessageTemplates,

    /// How many distinct error texts are remembered per day
    pub error_dedupe_capacity: usize,
}

impl Config {
    /// Creates a configuration with defaults for everything but credentials
    pub fn new(practicum_token: String, telegram_token: String, telegram_chat_id: String) -> Self {
        Self {
            practicum_token,
            telegram_token,
            telegram_chat_id,
            endpoint: review_client::DEFAULT_ENDPOINT.to_string(),
            telegram_api_url: review_client::DEFAULT_API_URL.to_string(),
            retry_period: Duration::from_secs(DEFAULT_RETRY_PERIOD_SECS),
            from_date: chrono::Utc::now().timestamp(),
            templates: MessageTemplates::default(),
            error_dedupe_capacity: DEFAULT_CAPACITY,
        }
    }

    /// Creates configuration from environment variables
    ///
    /// A `.env` file in the working directory is loaded first when present.
    ///
    /// Expected environment variables:
    /// - PRACTICUM_TOKEN (required)
    /// - TELEGRAM_TOKEN (required)
    /// - TELEGRAM_CHAT_ID (required)
    /// - PRACTICUM_ENDPOINT (optional, default: production endpoint)
    /// - TELEGRAM_API_URL (optional, default: https://api.telegram.org)
    /// - RETRY_PERIOD (optional, seconds, default: 600)
    /// - FROM_DATE (optional, unix seconds, default: now)
    /// - VERDICT_APPROVED / VERDICT_REVIEWING / VERDICT_REJECTED (optional)
    /// - STATUS_TEMPLATE / ERROR_TEMPLATE (optional)
    /// - ERROR_DEDUPE_CAPACITY (optional, default: 64)
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let practicum_token =
            var("PRACTICUM_TOKEN").ok_or(ConfigError::MissingToken("PRACTICUM_TOKEN"))?;
        let telegram_token =
            var("TELEGRAM_TOKEN").ok_or(ConfigError::MissingToken("TELEGRAM_TOKEN"))?;
        let telegram_chat_id = var("TELEGRAM_CHAT_ID").ok_or(ConfigError::MissingChatId)?;

        let mut config = Self::new(practicum_token, telegram_token, telegram_chat_id);

        if let Some(endpoint) = var("PRACTICUM_ENDPOINT") {
            config.endpoint = endpoint;
        }
        if let Some(api_url) = var("TELEGRAM_API_URL") {
            config.telegram_api_url = api_url;
        }
        if let Some(secs) = var("RETRY_PERIOD") {
            config.retry_period = Duration::from_secs(parse_number("RETRY_PERIOD", &secs)?);
        }
        if let Some(from_date) = var("FROM_DATE") {
            config.from_date = parse_number("FROM_DATE", &from_date)?;
        }
        if let Some(capacity) = var("ERROR_DEDUPE_CAPACITY") {
            config.error_dedupe_capacity = parse_number("ERROR_DEDUPE_CAPACITY", &capacity)?;
        }

        let verdicts = &mut config.templates.verdicts;
        for (key, slot) in [
            ("VERDICT_APPROVED", &mut verdicts.approved),
            ("VERDICT_REVIEWING", &mut verdicts.reviewing),
            ("VERDICT_REJECTED", &mut verdicts.rejected),
        ] {
            if let Some(text) = var(key) {
                *slot = text;
            }
        }
        if let Some(template) = var("STATUS_TEMPLATE") {
            config.templates.status = template;
        }
        if let Some(template) = var("ERROR_TEMPLATE") {
            config.templates.error = template;
        }

        Ok(config)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.practicum_token.trim().is_empty() {
            return Err(ConfigError::MissingToken("PRACTICUM_TOKEN"));
        }

        if self.telegram_token.trim().is_empty() {
            return Err(ConfigError::MissingToken("TELEGRAM_TOKEN"));
        }

        if self.telegram_chat_id.trim().is_empty() {
            return Err(ConfigError::MissingChatId);
        }

        for (name, value) in [
            ("PRACTICUM_ENDPOINT", &self.endpoint),
            ("TELEGRAM_API_URL", &self.telegram_api_url),
        ] {
            if !value.starts_with("http://") && !value.starts_with("https://") {
                return Err(ConfigError::InvalidUrl {
                    name,
                    value: value.clone(),
                });
            }
        }

        if self.retry_period.is_zero() {
            return Err(ConfigError::ZeroRetryPeriod);
        }

        Ok(())
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field("endpoint", &self.endpoint)
            .field("telegram_api_url", &self.telegram_api_url)
            .field("retry_period", &self.retry_period)
            .field("from_date", &self.from_date)
            .field("error_dedupe_capacity", &self.error_dedupe_capacity)
            .finish_non_exhaustive()
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber {
            name,
            value: value.to_string(),
        })
}
