//! Review Core
//!
//! Core types and logic for the homework review watcher.
//!
//! This crate contains:
//! - Domain types: statuses, the poll cursor, rendered notifications
//! - Validation: shape checks over the raw status API response
//! - Interpretation: turning an assignment record into a notification
//! - Dedupe: the daily set of already-announced error texts

pub mod dedupe;
pub mod domain;
pub mod error;
pub mod interpreter;
pub mod validation;

pub use dedupe::SentErrorSet;
pub use domain::cursor::PollCursor;
pub use domain::homework::HomeworkStatus;
pub use domain::message::{MessageKind, MessageTemplates, NotificationMessage, Verdicts};
pub use error::ValidationError;
pub use interpreter::StatusInterpreter;
pub use validation::{ResponseValidator, ValidatedResponse};
