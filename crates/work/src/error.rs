//! Work layer errors.

use tasklens_core::{TaskId, ValidationError};
use tasklens_storage::StorageError;

/// Result type for work operations.
pub type Result<T> = std::result::Result<T, WorkError>;

/// Errors surfaced by the task manager and batch analyzer.
#[derive(Debug, thiserror::Error)]
pub enum WorkError {
    /// Input rejected before reaching storage
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Backend failure
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// No task with this id
    #[error("Task not found: {0}")]
    NotFound(TaskId),

    /// Free-text analysis needs some text
    #[error("Task description is required")]
    MissingDescription,

    /// An update carried no fields
    #[error("No fields to update")]
    EmptyUpdate,

    /// Analysis could not be encoded for storage
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
