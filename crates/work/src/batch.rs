//! Background batch analysis of tasks that have no stored analysis yet.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tasklens_core::{TaskFilter, TaskId, Time};
use tasklens_insight::{Analysis, InsightEngine};
use tasklens_storage::Storage;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::error::Result;

/// Batch analyzer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Tasks analyzed per pass
    pub batch_size: usize,
    /// Time between passes in `run_until`
    #[serde(with = "seconds")]
    pub interval: Duration,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 5,
            interval: Duration::from_secs(30),
        }
    }
}

mod seconds {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(d)?))
    }
}

/// Snapshot of the analyzer's activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatus {
    /// Whether the interval loop is active
    pub running: bool,
    /// Passes completed
    pub passes: u64,
    /// Tasks analyzed across all passes
    pub processed: u64,
    /// Failed task analyses across all passes
    pub failed: u64,
    /// When the last pass finished
    pub last_pass: Option<Time>,
}

/// Analyzes unprocessed tasks in small batches.
pub struct BatchAnalyzer<S: Storage> {
    storage: Arc<Mutex<S>>,
    engine: Arc<InsightEngine>,
    config: BatchConfig,
    status: Arc<Mutex<ServiceStatus>>,
    // Ids that failed in the previous pass
    skipped: Arc<Mutex<HashSet<TaskId>>>,
}

impl<S: Storage> Clone for BatchAnalyzer<S> {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            engine: self.engine.clone(),
            config: self.config.clone(),
            status: self.status.clone(),
            skipped: self.skipped.clone(),
        }
    }
}

impl<S: Storage> BatchAnalyzer<S> {
    /// Create an analyzer over shared storage.
    pub fn new(storage: Arc<Mutex<S>>, engine: Arc<InsightEngine>, config: BatchConfig) -> Self {
        Self {
            storage,
            engine,
            config,
            status: Arc::new(Mutex::new(ServiceStatus::default())),
            skipped: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Current settings.
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Current status.
    pub async fn status(&self) -> ServiceStatus {
        self.status.lock().await.clone()
    }

    /// Run one pass over at most `batch_size` unanalyzed tasks.
    ///
    /// A task that fails to save is logged, sits out the next pass so
    /// older tasks get their turn, and is retried after that.
    /// Returns how many tasks were analyzed.
    pub async fn process_pending(&self) -> Result<usize> {
        let mut skipped = self.skipped.lock().await;
        let mut storage = self.storage.lock().await;
        let limit = self.config.batch_size + skipped.len();
        let tasks: Vec<_> = storage
            .list_tasks(&TaskFilter::unanalyzed(limit))
            .await?
            .into_iter()
            .filter(|t| !skipped.contains(&t.id))
            .take(self.config.batch_size)
            .collect();

        let mut processed = 0;
        let mut failed = HashSet::new();
        if !tasks.is_empty() {
            info!("Processing {} tasks", tasks.len());
        }
        for task in &tasks {
            let analysis = self.engine.analyze(&task.description);
            match store_analysis(&mut *storage, task.id, &analysis).await {
                Ok(()) => {
                    debug!("Analyzed task: {}", task.title);
                    processed += 1;
                }
                Err(e) => {
                    warn!("Failed to process task {}, skipping it next pass: {}", task.id, e);
                    failed.insert(task.id);
                }
            }
        }
        drop(storage);
        let failures = failed.len();
        *skipped = failed;
        drop(skipped);

        let mut status = self.status.lock().await;
        status.passes += 1;
        status.processed += processed as u64;
        status.failed += failures as u64;
        status.last_pass = Some(Utc::now());
        Ok(processed)
    }

    /// Run passes every `interval` until `shutdown` resolves. The first pass
    /// starts immediately.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        // interval() panics on a zero period
        let period = self.config.interval.max(Duration::from_millis(1));
        let mut tick = tokio::time::interval(period);
        tokio::pin!(shutdown);

        self.status.lock().await.running = true;
        info!(
            "Batch analyzer started (batch size {}, every {}s)",
            self.config.batch_size,
            self.config.interval.as_secs()
        );

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    if let Err(e) = self.process_pending().await {
                        error!("Batch pass failed: {}", e);
                    }
                }
                _ = &mut shutdown => {
                    break;
                }
            }
        }

        self.status.lock().await.running = false;
        info!("Batch analyzer stopped");
        Ok(())
    }
}

async fn store_analysis<S: Storage>(storage: &mut S, id: TaskId, analysis: &Analysis) -> Result<()> {
    let value = serde_json::to_value(analysis)?;
    storage.save_analysis(id, &value).await?;
    Ok(())
}
