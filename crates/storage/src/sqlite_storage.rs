//! SQLite storage backend for TaskLens.
//!
//! Keeps tasks in a single `tasks` table. Timestamps are stored as RFC 3339
//! text with a fixed precision so that ordering by the column matches
//! ordering by time.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use std::path::Path;
use tasklens_core::{Priority, Task, TaskFilter, TaskId};

use super::trait_::{Result, Storage, StorageError};

/// SQLite storage implementation.
#[derive(Clone)]
pub struct SqliteStorage {
    /// Database connection pool
    pool: sqlx::SqlitePool,
}

impl SqliteStorage {
    /// Open (or create) a database file.
    pub async fn new_from_path(path: &Path) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .map_err(db_err)?;

        let storage = Self { pool };
        storage.init_schema().await?;
        Ok(storage)
    }

    /// Create an in-memory SQLite storage for testing.
    ///
    /// The pool is capped at one connection: every `:memory:` connection
    /// is its own database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(db_err)?;

        let storage = Self { pool };
        storage.init_schema().await?;
        Ok(storage)
    }

    /// Initialize the database schema.
    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS tasks (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                priority TEXT NOT NULL DEFAULT 'medium',
                completed BOOLEAN NOT NULL DEFAULT 0,
                analysis TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_tasks_created ON tasks(created_at)")
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(())
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn save_task(&mut self, task: &Task) -> Result<()> {
        let analysis = task
            .analysis
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        sqlx::query(
            "INSERT OR REPLACE INTO tasks
                (id, title, description, priority, completed, analysis, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(task.id.to_string())
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.priority.as_str())
        .bind(task.completed)
        .bind(analysis)
        .bind(format_time(&task.created_at))
        .bind(format_time(&task.updated_at))
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn load_task(&self, id: TaskId) -> Result<Option<Task>> {
        let row = sqlx::query("SELECT * FROM tasks WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        row.as_ref().map(row_to_task).transpose()
    }

    async fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        let mut clauses = Vec::new();
        if let Some(completed) = filter.completed {
            clauses.push(if completed { "completed = 1" } else { "completed = 0" });
        }
        if let Some(analyzed) = filter.analyzed {
            clauses.push(if analyzed { "analysis IS NOT NULL" } else { "analysis IS NULL" });
        }

        let mut sql = String::from("SELECT * FROM tasks");
        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY created_at DESC, id DESC");
        if let Some(limit) = filter.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.iter().map(row_to_task).collect()
    }

    async fn delete_task(&mut self, id: TaskId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn clear_tasks(&mut self) -> Result<usize> {
        let result = sqlx::query("DELETE FROM tasks")
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() as usize)
    }
}

fn db_err(e: sqlx::Error) -> StorageError {
    StorageError::Other(e.to_string())
}

fn format_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_time(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| StorageError::Other(format!("bad timestamp '{}': {}", raw, e)))
}

fn row_to_task(row: &SqliteRow) -> Result<Task> {
    let id: String = row.try_get("id").map_err(db_err)?;
    let priority: String = row.try_get("priority").map_err(db_err)?;
    let analysis: Option<String> = row.try_get("analysis").map_err(db_err)?;
    let created_at: String = row.try_get("created_at").map_err(db_err)?;
    let updated_at: String = row.try_get("updated_at").map_err(db_err)?;

    let task = Task {
        id: id
            .parse()
            .map_err(|e| StorageError::Other(format!("bad task id '{}': {}", id, e)))?,
        title: row.try_get("title").map_err(db_err)?,
        description: row.try_get("description").map_err(db_err)?,
        priority: priority
            .parse::<Priority>()
            .map_err(|e| StorageError::Other(e.to_string()))?,
        completed: row.try_get("completed").map_err(db_err)?,
        created_at: parse_time(&created_at)?,
        updated_at: parse_time(&updated_at)?,
        analysis: analysis.map(|a| serde_json::from_str(&a)).transpose()?,
    };
    task.validate()?;
    Ok(task)
}
