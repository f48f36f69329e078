//! Notifier service
//!
//! Sends rendered notifications through the message repository. Error
//! reports go through [`Notifier::notify_once`], which consults the daily
//! dedupe set so a recurring failure is announced once rather than every
//! cycle.

use review_client::NotifyError;
use review_core::{NotificationMessage, SentErrorSet};
use std::sync::Arc;
use tracing::{debug, error};

use crate::repository::MessageRepository;

/// Delivers notifications to the destination chat
#[derive(Clone)]
pub struct Notifier {
    messages: Arc<dyn MessageRepository>,
}

impl Notifier {
    pub fn new(messages: Arc<dyn MessageRepository>) -> Self {
        Self { messages }
    }

    /// Sends `message`
    ///
    /// Failures are logged here and returned; they are never fatal to the
    /// caller's loop.
    pub async fn notify(&self, message: &NotificationMessage) -> Result<(), NotifyError> {
        self.messages.send(&message.text).await.inspect_err(|e| {
            error!("Failed to deliver notification: {}", e);
        })
    }

    /// Sends `message` unless its text is already in `sent`
    ///
    /// The text is recorded only after a successful send, so a report whose
    /// delivery failed is attempted again next time.
    ///
    /// # Returns
    /// `true` if the message was sent, `false` if it was suppressed
    pub async fn notify_once(
        &self,
        message: &NotificationMessage,
        sent: &mut SentErrorSet,
    ) -> Result<bool, NotifyError> {
        if sent.contains(&message.text) {
            debug!("Suppressing repeated error report: {}", message.text);
            return Ok(false);
        }

        self.notify(message).await?;
        sent.insert(message.text.clone());
        Ok(true)
    }
}
