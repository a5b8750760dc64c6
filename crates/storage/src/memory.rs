//! In-memory storage backend.

use std::collections::HashMap;
use async_trait::async_trait;
use tasklens_core::{Task, TaskFilter, TaskId};
use super::trait_::select;
use super::{Storage, Result};

/// Storage that keeps tasks in a map. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    tasks: HashMap<TaskId, Task>,
}

impl MemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with `tasks`.
    pub fn with_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        Self {
            tasks: tasks.into_iter().map(|t| (t.id, t)).collect(),
        }
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn save_task(&mut self, task: &Task) -> Result<()> {
        self.tasks.insert(task.id, task.clone());
        Ok(())
    }

    async fn load_task(&self, id: TaskId) -> Result<Option<Task>> {
        Ok(self.tasks.get(&id).cloned())
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        Ok(select(self.tasks.values().cloned().collect(), filter))
    }

    async fn delete_task(&mut self, id: TaskId) -> Result<bool> {
        Ok(self.tasks.remove(&id).is_some())
    }

    async fn clear_tasks(&mut self) -> Result<usize> {
        let removed = self.tasks.len();
        self.tasks.clear();
        Ok(removed)
    }
}
