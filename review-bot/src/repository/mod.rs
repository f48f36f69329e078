//! Repository layer
//!
//! Repositories abstract the two remote services the watcher talks to.
//! They provide simple, focused interfaces without any business logic.
//!
//! All repositories are trait-based to enable testing and mocking; the HTTP
//! clients from `review_client` implement them directly.

mod homeworks;
mod messages;

// Re-export traits
pub use homeworks::HomeworkRepository;
pub use messages::MessageRepository;
