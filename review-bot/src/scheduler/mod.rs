//! Scheduler layer for the watcher
//!
//! This layer runs the poll-detect-notify cycle on a fixed interval and
//! owns everything that has to survive between cycles: the cursor and the
//! set of error reports already sent today.

pub mod poller;

pub use poller::StatusPoller;
