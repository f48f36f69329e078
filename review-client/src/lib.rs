//! Review HTTP Clients
//!
//! Type-safe HTTP clients for the two remote services the watcher talks to:
//! the homework status API (polled for review verdicts) and the Telegram
//! Bot API (used to deliver notifications).
//!
//! # Example
//!
//! ```no_run
//! use review_client::{PracticumClient, TelegramClient};
//! use review_core::PollCursor;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = PracticumClient::new(review_client::DEFAULT_ENDPOINT, "api-token");
//!     let bot = TelegramClient::new("bot-token", "123456");
//!
//!     let response = api.fetch(PollCursor::new(0)).await?;
//!     bot.send_message(&format!("got {response}")).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
mod practicum;
mod telegram;

// Re-export commonly used types
pub use error::{ApiError, NotifyError, Result};
pub use practicum::{DEFAULT_ENDPOINT, PracticumClient};
pub use telegram::{BotUser, DEFAULT_API_URL, TelegramClient};

/// Shortens a response body for inclusion in error messages
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX_CHARS: usize = 200;

    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_CHARS {
        return trimmed.to_string();
    }
    let mut short: String = trimmed.chars().take(MAX_CHARS).collect();
    short.push('…');
    short
}
