//! TaskLens core data models.
//!
//! This crate defines the task record shared by the storage layer, the
//! insight engine and the command-line front end.

#![warn(missing_docs)]

// Core identities
mod id;

// Task records
mod task;
mod error;

// Re-exports
pub use id::*;
pub use task::{Task, Priority, TaskFilter, NewTask, TaskUpdate};
pub use error::ValidationError;

/// Timestamp type
pub type Time = chrono::DateTime<chrono::Utc>;
