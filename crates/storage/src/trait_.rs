//! Storage trait abstraction.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tasklens_core::{Priority, Task, TaskFilter, TaskId, Time, ValidationError};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Stored record decodes but breaks a task invariant
    #[error("Invalid record: {0}")]
    Invalid(#[from] ValidationError),

    /// Item not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Aggregate counts over the stored tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageStats {
    /// All tasks
    pub total_tasks: usize,
    /// Tasks marked completed
    pub completed_tasks: usize,
    /// Tasks with high priority
    pub high_priority_tasks: usize,
    /// Tasks carrying a stored analysis
    pub analyzed_tasks: usize,
}

impl StorageStats {
    /// Count over a task slice.
    pub fn from_tasks(tasks: &[Task]) -> Self {
        Self {
            total_tasks: tasks.len(),
            completed_tasks: tasks.iter().filter(|t| t.completed).count(),
            high_priority_tasks: tasks.iter().filter(|t| t.priority == Priority::High).count(),
            analyzed_tasks: tasks.iter().filter(|t| t.is_analyzed()).count(),
        }
    }
}

/// A full dump of the task collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Backup {
    /// When the dump was taken
    pub timestamp: Time,
    /// Every stored task
    pub tasks: Vec<Task>,
}

/// Storage abstraction for TaskLens data.
///
/// This trait allows different storage backends to be plugged in. Only the
/// task primitives are required; analysis persistence, statistics and
/// backups are derived from them unless a backend can do better.
#[async_trait]
pub trait Storage: Send + Sync {
    // === Task operations ===

    /// Save a task (create or update).
    async fn save_task(&mut self, task: &Task) -> Result<()>;

    /// Load a task by ID.
    async fn load_task(&self, id: TaskId) -> Result<Option<Task>>;

    /// List tasks matching the filter, newest first.
    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>>;

    /// Delete a task. Returns whether anything was removed.
    async fn delete_task(&mut self, id: TaskId) -> Result<bool>;

    /// Remove every task. Returns how many were removed.
    async fn clear_tasks(&mut self) -> Result<usize>;

    // === Derived operations ===

    /// Store an analysis blob against a task record.
    async fn save_analysis(&mut self, id: TaskId, analysis: &serde_json::Value) -> Result<()> {
        let mut task = self
            .load_task(id)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("task {}", id)))?;
        task.analysis = Some(analysis.clone());
        self.save_task(&task).await
    }

    /// Aggregate counts over all tasks.
    async fn stats(&self) -> Result<StorageStats> {
        let tasks = self.list_tasks(&TaskFilter::default()).await?;
        Ok(StorageStats::from_tasks(&tasks))
    }

    /// Check that the backend answers. The default lists a single task.
    async fn health_check(&self) -> Result<()> {
        self.list_tasks(&TaskFilter {
            limit: Some(1),
            ..Default::default()
        })
        .await?;
        Ok(())
    }

    /// Write every task to a JSON file at `path`.
    async fn backup(&self, path: &Path) -> Result<usize> {
        let backup = Backup {
            timestamp: chrono::Utc::now(),
            tasks: self.list_tasks(&TaskFilter::default()).await?,
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_string_pretty(&backup)?;
        tokio::fs::write(path, json.as_bytes()).await?;
        tracing::info!("Backed up {} tasks to {}", backup.tasks.len(), path.display());
        Ok(backup.tasks.len())
    }
}

/// Order tasks newest first, then apply the filter and its limit.
pub(crate) fn select(mut tasks: Vec<Task>, filter: &TaskFilter) -> Vec<Task> {
    tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
    let matching = tasks.into_iter().filter(|t| filter.matches(t));
    match filter.limit {
        Some(limit) => matching.take(limit).collect(),
        None => matching.collect(),
    }
}
