//! Pattern aggregation over a task collection.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tasklens_core::{Priority, Task};

use crate::classifier::TextClassifier;
use crate::vocabulary::Category;

/// Aggregate shape of a task collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatterns {
    /// Number of tasks
    pub total_tasks: usize,
    /// Completed tasks
    pub completed_tasks: usize,
    /// High-priority tasks, complete or not
    pub high_priority_tasks: usize,
    /// Tasks per classified category
    pub category_counts: BTreeMap<Category, usize>,
    /// Rounded mean description length in characters
    pub average_description_length: usize,
    /// Tasks whose description states no deadline
    pub tasks_without_deadlines: usize,
    /// Completed fraction in [0, 1]
    pub completion_rate: f64,
}

/// Scans a collection and builds [`TaskPatterns`].
pub struct PatternAggregator<'a> {
    classifier: &'a TextClassifier,
}

impl<'a> PatternAggregator<'a> {
    /// Create an aggregator that categorizes with `classifier`.
    pub fn new(classifier: &'a TextClassifier) -> Self {
        Self { classifier }
    }

    /// Aggregate `tasks`. An empty slice yields all zeros.
    pub fn aggregate(&self, tasks: &[Task]) -> TaskPatterns {
        let mut patterns = TaskPatterns {
            total_tasks: tasks.len(),
            completed_tasks: tasks.iter().filter(|t| t.completed).count(),
            high_priority_tasks: tasks.iter().filter(|t| t.priority == Priority::High).count(),
            ..Default::default()
        };

        let mut total_length = 0usize;
        for task in tasks {
            let category = self.classifier.category(&task.description);
            *patterns.category_counts.entry(category).or_insert(0) += 1;

            total_length += task.description.chars().count();

            if !self.classifier.mentions_deadline(&task.description) {
                patterns.tasks_without_deadlines += 1;
            }
        }

        if !tasks.is_empty() {
            let total = tasks.len() as f64;
            patterns.average_description_length = (total_length as f64 / total).round() as usize;
            patterns.completion_rate = patterns.completed_tasks as f64 / total;
        }

        patterns
    }
}
