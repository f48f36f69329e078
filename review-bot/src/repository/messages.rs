//! Messages repository
//!
//! Delivers text messages to the configured chat.

use async_trait::async_trait;
use review_client::{NotifyError, TelegramClient};

/// Repository trait for outgoing messages
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Sends `text` to the destination chat
    async fn send(&self, text: &str) -> Result<(), NotifyError>;
}

#[async_trait]
impl MessageRepository for TelegramClient {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        self.send_message(text).await
    }
}
