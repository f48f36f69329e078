//! Daily dedupe set for error notifications

use chrono::NaiveDate;
use std::collections::VecDeque;

/// Default number of distinct error texts remembered per day
pub const DEFAULT_CAPACITY: usize = 64;

/// Error texts already announced today
///
/// Bounded: once `capacity` texts are stored, inserting another evicts the
/// oldest. The whole set is cleared when [`roll_over`](Self::roll_over)
/// sees a new calendar day, so a persistent error is re-announced once a day.
#[derive(Debug, Clone)]
pub struct SentErrorSet {
    day: Option<NaiveDate>,
    entries: VecDeque<String>,
    capacity: usize,
}

impl SentErrorSet {
    pub fn new(capacity: usize) -> Self {
        Self {
            day: None,
            entries: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Clears the set if `today` differs from the day it was filled on
    ///
    /// Returns `true` when entries were dropped.
    pub fn roll_over(&mut self, today: NaiveDate) -> bool {
        if self.day == Some(today) {
            return false;
        }
        self.day = Some(today);
        let had_entries = !self.entries.is_empty();
        self.entries.clear();
        had_entries
    }

    pub fn contains(&self, text: &str) -> bool {
        self.entries.iter().any(|sent| sent == text)
    }

    /// Records `text` as sent; returns `false` if it was already present
    pub fn insert(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if self.contains(&text) {
            return false;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(text);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SentErrorSet {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
