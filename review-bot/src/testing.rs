//! In-memory fakes shared by the unit tests

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use review_client::{ApiError, NotifyError};
use review_core::PollCursor;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::clock::Clock;
use crate::repository::{HomeworkRepository, MessageRepository};

/// Message repository that records what it sends
#[derive(Default)]
pub struct FakeMessages {
    sent: Mutex<Vec<String>>,
    failures: Mutex<usize>,
}

impl FakeMessages {
    /// Makes the next `count` sends fail
    pub fn fail_next(&self, count: usize) {
        *self.failures.lock().unwrap() = count;
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageRepository for FakeMessages {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let mut failures = self.failures.lock().unwrap();
        if *failures > 0 {
            *failures -= 1;
            return Err(NotifyError::Rejected {
                status: 502,
                description: "Bad Gateway".to_string(),
            });
        }
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

/// Homework repository that replays scripted responses
#[derive(Default)]
pub struct FakeHomeworks {
    responses: Mutex<VecDeque<Result<Value, ApiError>>>,
    cursors: Mutex<Vec<i64>>,
}

impl FakeHomeworks {
    pub fn push(&self, response: Result<Value, ApiError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    /// Cursors the repository was queried with, in order
    pub fn cursors(&self) -> Vec<i64> {
        self.cursors.lock().unwrap().clone()
    }
}

#[async_trait]
impl HomeworkRepository for FakeHomeworks {
    async fn fetch(&self, cursor: PollCursor) -> Result<Value, ApiError> {
        self.cursors.lock().unwrap().push(cursor.current());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(serde_json::json!({"homeworks": []})))
    }
}

/// Clock that only moves when told to
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at(year: i32, month: u32, day: u32, hour: u32) -> Self {
        Self {
            now: Mutex::new(Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

/// A network-level failure as produced by reqwest
pub fn transport_error() -> ApiError {
    let err = reqwest::Client::new()
        .get("not a url")
        .build()
        .unwrap_err();
    ApiError::Transport(err)
}
