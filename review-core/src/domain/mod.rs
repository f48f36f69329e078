//! Core domain types
//!
//! These types are shared between the HTTP clients (which produce and
//! consume them on the wire) and the watcher binary (which drives the
//! poll cycle).

pub mod cursor;
pub mod homework;
pub mod message;
