//! Service layer
//!
//! Services contain the business logic that sits between the poll loop and
//! the repositories.

mod notifier;

pub use notifier::Notifier;
