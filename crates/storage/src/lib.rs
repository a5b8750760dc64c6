//! Storage abstraction and implementations for TaskLens.
//!
//! This crate provides a trait-based storage interface with a JSON-file
//! reference implementation, an in-memory backend for tests and embedding,
//! and an optional SQLite backend behind the `sqlite` feature.

#![warn(missing_docs)]

pub mod trait_;
pub mod json_storage;
pub mod memory;
#[cfg(feature = "sqlite")]
pub mod sqlite_storage;

pub use trait_::{Storage, StorageError, Result, StorageStats, Backup};
pub use json_storage::JsonStorage;
pub use memory::MemoryStorage;
#[cfg(feature = "sqlite")]
pub use sqlite_storage::SqliteStorage;
