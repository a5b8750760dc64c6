//! JSON file storage implementation.
//!
//! Stores each task as `<root>/tasks/<id>.json`. Writes go through a
//! temporary file and a rename so a crashed write never leaves a truncated
//! record behind.

use std::path::{Path, PathBuf};
use tasklens_core::{Task, TaskFilter, TaskId};
use tokio::fs;
use tracing::{debug, warn};
use super::trait_::select;
use super::{Storage, StorageError, Result};

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    /// Create storage rooted at `root`, creating the `tasks/` directory.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(root.join("tasks")).await?;
        debug!("JSON storage ready at {}", root.display());
        Ok(Self { root })
    }

    /// Storage root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn tasks_dir(&self) -> PathBuf {
        self.root.join("tasks")
    }

    fn task_path(&self, id: TaskId) -> PathBuf {
        self.tasks_dir().join(format!("{}.json", id))
    }
}

#[async_trait::async_trait]
impl Storage for JsonStorage {
    async fn save_task(&mut self, task: &Task) -> Result<()> {
        let path = self.task_path(task.id);
        let json = serde_json::to_string_pretty(task)?;
        write_atomic(&path, json.as_bytes()).await
    }

    async fn load_task(&self, id: TaskId) -> Result<Option<Task>> {
        read_task(&self.task_path(id)).await
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        let all = list_dir(&self.tasks_dir()).await?;
        Ok(select(all, filter))
    }

    async fn delete_task(&mut self, id: TaskId) -> Result<bool> {
        match fs::remove_file(self.task_path(id)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn health_check(&self) -> Result<()> {
        let dir = self.tasks_dir();
        if !fs::metadata(&dir).await?.is_dir() {
            return Err(StorageError::Other(format!("{} is not a directory", dir.display())));
        }
        list_dir(&dir).await?;
        Ok(())
    }

    async fn clear_tasks(&mut self) -> Result<usize> {
        let mut removed = 0;
        let mut rd = fs::read_dir(self.tasks_dir()).await?;
        while let Some(entry) = rd.next_entry().await? {
            if entry.path().extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            fs::remove_file(entry.path()).await?;
            removed += 1;
        }
        Ok(removed)
    }
}

async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, bytes).await?;
    fs::rename(&tmp, path).await?;
    Ok(())
}

async fn read_task(path: &Path) -> Result<Option<Task>> {
    match fs::read_to_string(path).await {
        Ok(json) => Ok(Some(Task::from_json(&json)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn list_dir(dir: &Path) -> Result<Vec<Task>> {
    let mut tasks = Vec::new();
    let mut rd = fs::read_dir(dir).await?;
    while let Some(entry) = rd.next_entry().await? {
        if entry.path().extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        match read_task(&entry.path()).await {
            Ok(Some(task)) => tasks.push(task),
            Ok(None) => {}
            Err(e) => warn!("Skipping unreadable record {}: {}", entry.path().display(), e),
        }
    }
    Ok(tasks)
}
