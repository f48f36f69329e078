//! Poll cursor

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower bound (unix seconds) for the next status query
///
/// The cursor only moves forward. Every mutation takes the maximum of the
/// current and the proposed value, so neither a stale server answer nor a
/// correction can rewind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PollCursor(i64);

impl PollCursor {
    pub fn new(from_date: i64) -> Self {
        Self(from_date)
    }

    /// Value to send as `from_date`
    pub fn current(&self) -> i64 {
        self.0
    }

    /// Moves the cursor to the server-provided forward value
    ///
    /// `None` (a response without `current_date`) keeps the previous value.
    /// Returns `true` when the cursor moved.
    pub fn advance(&mut self, next: Option<i64>) -> bool {
        match next {
            Some(next) if next > self.0 => {
                self.0 = next;
                true
            }
            _ => false,
        }
    }

    /// Replaces a cursor the server rejected with `now`
    ///
    /// Returns `false` when `now` is not ahead of the rejected value, in which
    /// case the cursor is left as is.
    pub fn correct(&mut self, now: i64) -> bool {
        self.advance(Some(now))
    }
}

impl fmt::Display for PollCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
