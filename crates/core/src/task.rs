//! Task model - the unit of work tracked by TaskLens.

use serde::{Deserialize, Serialize};
use crate::error::ValidationError;
use crate::id::TaskId;
use crate::Time;

/// A task as stored by the persistence layer.
///
/// Every field except `analysis` is required when decoding; a record that
/// lacks a description or a creation time is rejected rather than patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier
    pub id: TaskId,

    /// Task title
    pub title: String,

    /// Free-text description
    pub description: String,

    /// User-assigned priority
    pub priority: Priority,

    /// Completion flag
    pub completed: bool,

    /// Creation timestamp
    pub created_at: Time,

    /// Last update timestamp
    pub updated_at: Time,

    /// Stored insight analysis, opaque to this crate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<serde_json::Value>,
}

impl Task {
    /// Decode and validate a task record from JSON.
    pub fn from_json(json: &str) -> Result<Self, ValidationError> {
        let task: Task = serde_json::from_str(json)?;
        task.validate()?;
        Ok(task)
    }

    /// Check the invariants decoding alone cannot express.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingTitle);
        }
        Ok(())
    }

    /// Whether an analysis has been stored for this task.
    pub fn is_analyzed(&self) -> bool {
        self.analysis.is_some()
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Can wait
    Low,
    /// Default priority
    #[default]
    Medium,
    /// Needs attention first
    High,
}

impl Priority {
    /// All priorities, lowest first.
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(ValidationError::UnknownPriority(s.to_string())),
        }
    }
}

/// Input for creating a task.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewTask {
    /// Task title (required)
    pub title: String,

    /// Description, empty when omitted
    #[serde(default)]
    pub description: Option<String>,

    /// Priority, medium when omitted
    #[serde(default)]
    pub priority: Option<Priority>,
}

impl NewTask {
    /// Create input with just a title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Build the task record, stamping both timestamps with `now`.
    pub fn into_task(self, now: Time) -> Result<Task, ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingTitle);
        }

        Ok(Task {
            id: TaskId::new(),
            title: self.title,
            description: self.description.unwrap_or_default(),
            priority: self.priority.unwrap_or_default(),
            completed: false,
            created_at: now,
            updated_at: now,
            analysis: None,
        })
    }
}

/// Partial update of a task. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskUpdate {
    /// New title
    pub title: Option<String>,
    /// New description
    pub description: Option<String>,
    /// New priority
    pub priority: Option<Priority>,
    /// New completion flag
    pub completed: Option<bool>,
}

impl TaskUpdate {
    /// Whether the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.completed.is_none()
    }

    /// Apply the update and bump `updated_at`.
    ///
    /// A changed description invalidates any stored analysis.
    pub fn apply(self, task: &mut Task, now: Time) -> Result<(), ValidationError> {
        if let Some(title) = self.title {
            if title.trim().is_empty() {
                return Err(ValidationError::MissingTitle);
            }
            task.title = title;
        }
        if let Some(description) = self.description {
            if description != task.description {
                task.analysis = None;
            }
            task.description = description;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
        task.updated_at = now;
        Ok(())
    }
}

/// Filter for querying tasks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskFilter {
    /// Filter by completion flag
    pub completed: Option<bool>,

    /// Filter by whether an analysis is stored
    pub analyzed: Option<bool>,

    /// Maximum number of tasks to return
    pub limit: Option<usize>,
}

impl TaskFilter {
    /// Only incomplete tasks.
    pub fn pending() -> Self {
        Self {
            completed: Some(false),
            ..Default::default()
        }
    }

    /// Tasks without a stored analysis, at most `limit` of them.
    pub fn unanalyzed(limit: usize) -> Self {
        Self {
            analyzed: Some(false),
            limit: Some(limit),
            ..Default::default()
        }
    }

    /// Whether a task passes the completion and analysis conditions.
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(completed) = self.completed {
            if task.completed != completed {
                return false;
            }
        }
        if let Some(analyzed) = self.analyzed {
            if task.is_analyzed() != analyzed {
                return false;
            }
        }
        true
    }
}
