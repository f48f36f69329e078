//! Error types for the review clients

use thiserror::Error;

/// Result type alias for status API operations
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors from the homework status API
///
/// The API reports failures both through the HTTP status and through
/// error payloads embedded in an otherwise successful response; both
/// channels map onto these variants.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level failure (DNS, refused connection, timeout, broken body)
    #[error("endpoint request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Credential rejected by the API
    #[error("not authenticated: {0}")]
    Unauthorized(String),

    /// The API rejected the `from_date` cursor
    #[error("bad from_date: {0}")]
    BadCursor(String),

    /// Error payload embedded in a 200 response
    #[error("API error {code}: {detail}")]
    Api {
        /// Error code from the payload
        code: String,
        /// Human-readable detail from the payload
        detail: String,
    },

    /// Any other non-200 HTTP status
    #[error("endpoint error! API status code: {0}")]
    UnexpectedStatus(u16),

    /// A 200 response whose body is not JSON
    #[error("failed to decode API response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Whether the same request can succeed later without intervention
    ///
    /// `Unauthorized` never can; `BadCursor` only after the cursor changes.
    pub fn is_retryable(&self) -> bool {
        !self.is_unauthorized() && !self.is_bad_cursor()
    }

    /// Whether the credential was rejected
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// Whether the `from_date` cursor was rejected
    pub fn is_bad_cursor(&self) -> bool {
        matches!(self, Self::BadCursor(_))
    }
}

/// Errors from the messaging channel
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Network-level failure talking to the Bot API
    ///
    /// The request URL is stripped: it carries the bot token.
    #[error("send message error! {0}")]
    Transport(reqwest::Error),

    /// The Bot API answered with `ok: false` or an error status
    #[error("send message error! Bot API returned {status}: {description}")]
    Rejected {
        /// HTTP status or `error_code` from the payload
        status: u16,
        /// `description` from the payload
        description: String,
    },

    /// The Bot API answered with something that is not a Bot API envelope
    #[error("send message error! Unreadable Bot API response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.without_url())
    }
}

impl NotifyError {
    /// Whether the bot token itself was rejected
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Rejected { status: 401, .. })
    }
}
