//! Validation errors raised at the task boundary.

/// Errors raised when task input has the wrong shape.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// Title missing or blank
    #[error("Title is required")]
    MissingTitle,

    /// Priority string outside low/medium/high
    #[error("Unknown priority: {0} (expected low, medium or high)")]
    UnknownPriority(String),

    /// Task record could not be decoded
    #[error("Malformed task record: {0}")]
    Malformed(#[from] serde_json::Error),
}
