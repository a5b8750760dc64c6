//! Task management service.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tasklens_core::{NewTask, Priority, Task, TaskFilter, TaskId, TaskUpdate, Time};
use tasklens_insight::{Analysis, InsightEngine, ProgressSummary, Suggestion};
use tasklens_storage::{Storage, StorageStats};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::batch::{BatchAnalyzer, BatchConfig};
use crate::error::{Result, WorkError};

/// Sample tasks inserted by [`TaskManager::seed`]: title, description,
/// priority, completed.
pub const SAMPLE_TASKS: &[(&str, &str, Priority, bool)] = &[
    (
        "Welcome to TaskLens!",
        "This is a sample task to demonstrate the task insight engine. Try analyzing it!",
        Priority::High,
        false,
    ),
    (
        "Learn the CLI",
        "Explore the different tasklens commands to understand how tasks, analysis and summaries fit together",
        Priority::Medium,
        false,
    ),
    (
        "Test the analysis commands",
        "Run analyze, suggest and summary against the sample data",
        Priority::Low,
        true,
    ),
];

/// Analysis of one stored task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskReport {
    /// Analyzed task
    pub task_id: TaskId,
    /// Its title
    pub title: String,
    /// Result
    pub analysis: Analysis,
}

/// Outcome of [`BasicTaskManager::health`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    /// Whether every check passed
    pub healthy: bool,
    /// "ok" or the storage error
    pub storage: String,
    /// Stored tasks, when the store could be read
    pub total_tasks: Option<usize>,
    /// When the checks ran
    pub checked_at: Time,
}

/// Task management service.
#[async_trait]
pub trait TaskManager: Send + Sync {
    /// Create a task. Description defaults to empty, priority to medium.
    async fn create_task(&self, spec: NewTask) -> Result<Task>;

    /// Load a task.
    async fn get_task(&self, id: TaskId) -> Result<Task>;

    /// List tasks, newest first.
    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>>;

    /// Apply a partial update.
    async fn update_task(&self, id: TaskId, update: TaskUpdate) -> Result<Task>;

    /// Set the completion flag.
    async fn complete_task(&self, id: TaskId, completed: bool) -> Result<Task>;

    /// Delete a task.
    async fn delete_task(&self, id: TaskId) -> Result<()>;

    /// Analyze free text without touching storage.
    fn analyze_text(&self, text: &str) -> Result<Analysis>;

    /// Analyze a stored task and persist the result on it.
    async fn analyze_task(&self, id: TaskId) -> Result<TaskReport>;

    /// Analyze several tasks, skipping ids that do not exist.
    async fn batch_analyze(&self, ids: &[TaskId]) -> Result<Vec<TaskReport>>;

    /// Suggestions over pending tasks, or every task with `include_completed`.
    /// Returns the number of tasks considered alongside.
    async fn suggestions(&self, include_completed: bool) -> Result<(usize, Vec<Suggestion>)>;

    /// Progress summary over the whole collection.
    async fn summary(&self) -> Result<ProgressSummary>;
}

/// Task manager over a shared storage backend.
pub struct BasicTaskManager<S: Storage> {
    storage: Arc<Mutex<S>>,
    engine: Arc<InsightEngine>,
}

impl<S: Storage> Clone for BasicTaskManager<S> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            engine: self.engine.clone(),
        }
    }
}

impl<S: Storage> BasicTaskManager<S> {
    /// Create a manager with the default engine.
    pub fn new(storage: S) -> Self {
        Self::with_engine(storage, InsightEngine::default())
    }

    /// Create a manager with a configured engine.
    pub fn with_engine(storage: S, engine: InsightEngine) -> Self {
        Self {
            storage: Arc::new(Mutex::new(storage)),
            engine: Arc::new(engine),
        }
    }

    /// The insight engine in use.
    pub fn engine(&self) -> &InsightEngine {
        &self.engine
    }

    /// A batch analyzer sharing this manager's storage and engine.
    pub fn batch_analyzer(&self, config: BatchConfig) -> BatchAnalyzer<S> {
        BatchAnalyzer::new(self.storage.clone(), self.engine.clone(), config)
    }

    /// Insert the sample tasks whose titles are not present yet.
    /// Returns how many were inserted.
    pub async fn seed(&self) -> Result<usize> {
        let mut storage = self.storage.lock().await;
        let existing = storage.list_tasks(&TaskFilter::default()).await?;

        let mut inserted = 0;
        for (title, description, priority, completed) in SAMPLE_TASKS {
            if existing.iter().any(|t| t.title == *title) {
                debug!("Sample task already present: {}", title);
                continue;
            }
            let mut task = NewTask::new(*title)
                .with_description(*description)
                .with_priority(*priority)
                .into_task(Utc::now())?;
            task.completed = *completed;
            storage.save_task(&task).await?;
            inserted += 1;
        }

        info!("Seeded {} sample tasks", inserted);
        Ok(inserted)
    }

    /// Collection counts.
    pub async fn stats(&self) -> Result<StorageStats> {
        Ok(self.storage.lock().await.stats().await?)
    }

    /// Dump every task to `path`. Returns the number written.
    pub async fn backup(&self, path: &Path) -> Result<usize> {
        Ok(self.storage.lock().await.backup(path).await?)
    }

    /// Check the storage backend. Failures are reported, not returned.
    pub async fn health(&self) -> HealthReport {
        let storage = self.storage.lock().await;
        let checked = match storage.health_check().await {
            Ok(()) => storage.stats().await.map(|stats| stats.total_tasks),
            Err(e) => Err(e),
        };
        let report = match checked {
            Ok(total) => HealthReport {
                healthy: true,
                storage: "ok".to_string(),
                total_tasks: Some(total),
                checked_at: Utc::now(),
            },
            Err(e) => HealthReport {
                healthy: false,
                storage: e.to_string(),
                total_tasks: None,
                checked_at: Utc::now(),
            },
        };
        if report.healthy {
            debug!("Health check passed");
        } else {
            warn!("Health check failed: {}", report.storage);
        }
        report
    }

    /// Remove every task. Returns the number removed.
    pub async fn clear(&self) -> Result<usize> {
        let removed = self.storage.lock().await.clear_tasks().await?;
        warn!("Cleared {} tasks", removed);
        Ok(removed)
    }
}

#[async_trait]
impl<S: Storage + 'static> TaskManager for BasicTaskManager<S> {
    async fn create_task(&self, spec: NewTask) -> Result<Task> {
        let task = spec.into_task(Utc::now())?;
        self.storage.lock().await.save_task(&task).await?;
        info!("Created task: {}", task.id);
        Ok(task)
    }

    async fn get_task(&self, id: TaskId) -> Result<Task> {
        self.storage
            .lock()
            .await
            .load_task(id)
            .await?
            .ok_or(WorkError::NotFound(id))
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        Ok(self.storage.lock().await.list_tasks(filter).await?)
    }

    async fn update_task(&self, id: TaskId, update: TaskUpdate) -> Result<Task> {
        if update.is_empty() {
            return Err(WorkError::EmptyUpdate);
        }

        let mut storage = self.storage.lock().await;
        let mut task = storage.load_task(id).await?.ok_or(WorkError::NotFound(id))?;
        update.apply(&mut task, Utc::now())?;
        storage.save_task(&task).await?;
        info!("Updated task: {}", id);
        Ok(task)
    }

    async fn complete_task(&self, id: TaskId, completed: bool) -> Result<Task> {
        let update = TaskUpdate {
            completed: Some(completed),
            ..Default::default()
        };
        self.update_task(id, update).await
    }

    async fn delete_task(&self, id: TaskId) -> Result<()> {
        if !self.storage.lock().await.delete_task(id).await? {
            return Err(WorkError::NotFound(id));
        }
        info!("Deleted task: {}", id);
        Ok(())
    }

    fn analyze_text(&self, text: &str) -> Result<Analysis> {
        if text.trim().is_empty() {
            return Err(WorkError::MissingDescription);
        }
        Ok(self.engine.analyze(text))
    }

    async fn analyze_task(&self, id: TaskId) -> Result<TaskReport> {
        let mut storage = self.storage.lock().await;
        let task = storage.load_task(id).await?.ok_or(WorkError::NotFound(id))?;

        let analysis = self.engine.analyze(&task.description);
        storage
            .save_analysis(id, &serde_json::to_value(&analysis)?)
            .await?;
        info!("Analyzed task: {}", task.title);

        Ok(TaskReport {
            task_id: task.id,
            title: task.title,
            analysis,
        })
    }

    async fn batch_analyze(&self, ids: &[TaskId]) -> Result<Vec<TaskReport>> {
        let storage = self.storage.lock().await;
        let mut reports = Vec::with_capacity(ids.len());
        for id in ids {
            let Some(task) = storage.load_task(*id).await? else {
                debug!("Skipping unknown task: {}", id);
                continue;
            };
            reports.push(TaskReport {
                analysis: self.engine.analyze(&task.description),
                task_id: task.id,
                title: task.title,
            });
        }
        info!("Batch analyzed {} tasks", reports.len());
        Ok(reports)
    }

    async fn suggestions(&self, include_completed: bool) -> Result<(usize, Vec<Suggestion>)> {
        let filter = if include_completed {
            TaskFilter::default()
        } else {
            TaskFilter::pending()
        };
        let tasks = self.list_tasks(&filter).await?;
        let suggestions = self.engine.suggest(&tasks);
        info!("Generated {} suggestions", suggestions.len());
        Ok((tasks.len(), suggestions))
    }

    async fn summary(&self) -> Result<ProgressSummary> {
        let tasks = self.list_tasks(&TaskFilter::default()).await?;
        Ok(self.engine.summarize(&tasks))
    }
}
