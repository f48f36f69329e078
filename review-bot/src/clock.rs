//! Wall clock used by the poll loop

use chrono::{DateTime, Utc};

/// Source of the current time
///
/// The poll loop reads it to roll the error dedupe set over at midnight
/// (UTC) and to pick a replacement for a rejected cursor.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The real system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
