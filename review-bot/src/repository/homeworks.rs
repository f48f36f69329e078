//! Homeworks repository
//!
//! Fetches homework status changes from the status API.

use async_trait::async_trait;
use review_client::{ApiError, PracticumClient};
use review_core::PollCursor;
use serde_json::Value;

/// Repository trait for reading homework statuses
#[async_trait]
pub trait HomeworkRepository: Send + Sync {
    /// Fetches status changes newer than `cursor`
    ///
    /// Returns the raw response body; the caller validates it.
    async fn fetch(&self, cursor: PollCursor) -> Result<Value, ApiError>;
}

#[async_trait]
impl HomeworkRepository for PracticumClient {
    async fn fetch(&self, cursor: PollCursor) -> Result<Value, ApiError> {
        PracticumClient::fetch(self, cursor).await
    }
}
