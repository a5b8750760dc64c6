//! Progress statistics over a task collection.

use serde::{Deserialize, Serialize};
use tasklens_core::{Priority, Task, Time};

use crate::config::ScoreWeights;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Whole days between `created_at` and `now`, floored.
///
/// Timestamps in the future count as age zero.
pub fn age_in_days(created_at: Time, now: Time) -> i64 {
    let millis = now.signed_duration_since(created_at).num_milliseconds();
    millis.div_euclid(MILLIS_PER_DAY).max(0)
}

/// Counts keyed by priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityCounts {
    /// Low priority
    pub low: usize,
    /// Medium priority
    pub medium: usize,
    /// High priority
    pub high: usize,
}

impl PriorityCounts {
    fn bump(&mut self, priority: Priority) {
        match priority {
            Priority::Low => self.low += 1,
            Priority::Medium => self.medium += 1,
            Priority::High => self.high += 1,
        }
    }

    /// Count for one priority.
    pub fn get(&self, priority: Priority) -> usize {
        match priority {
            Priority::Low => self.low,
            Priority::Medium => self.medium,
            Priority::High => self.high,
        }
    }
}

/// Key metrics of a task collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsRecord {
    /// Number of tasks
    pub total_tasks: usize,
    /// Completed tasks
    pub completed_tasks: usize,
    /// Incomplete tasks
    pub pending_tasks: usize,
    /// Completed percentage in [0, 100]
    pub completion_rate: f64,
    /// Tasks per priority
    pub priority_distribution: PriorityCounts,
    /// Completed tasks per priority
    pub completion_by_priority: PriorityCounts,
    /// Rounded mean age in days
    pub average_task_age: u64,
    /// Composite score in [0, 100]
    pub productivity_score: u32,
}

impl StatsRecord {
    /// High-priority tasks not yet completed.
    pub fn pending_high_priority(&self) -> usize {
        // Deserialized records may carry inconsistent counts
        self.priority_distribution
            .high
            .saturating_sub(self.completion_by_priority.high)
    }
}

/// Computes [`StatsRecord`]s under a set of score weights.
pub struct ProgressStats<'a> {
    weights: &'a ScoreWeights,
}

impl<'a> ProgressStats<'a> {
    /// Create an engine using `weights` for the productivity score.
    pub fn new(weights: &'a ScoreWeights) -> Self {
        Self { weights }
    }

    /// Compute every metric relative to `now`.
    pub fn compute(&self, tasks: &[Task], now: Time) -> StatsRecord {
        let total_tasks = tasks.len();
        let completed_tasks = tasks.iter().filter(|t| t.completed).count();

        let mut priority_distribution = PriorityCounts::default();
        let mut completion_by_priority = PriorityCounts::default();
        for task in tasks {
            priority_distribution.bump(task.priority);
            if task.completed {
                completion_by_priority.bump(task.priority);
            }
        }

        let completion_rate = if total_tasks > 0 {
            completed_tasks as f64 / total_tasks as f64 * 100.0
        } else {
            0.0
        };

        StatsRecord {
            total_tasks,
            completed_tasks,
            pending_tasks: total_tasks - completed_tasks,
            completion_rate,
            priority_distribution,
            completion_by_priority,
            average_task_age: self.average_task_age(tasks, now),
            productivity_score: self.productivity_score(tasks, now),
        }
    }

    /// Rounded mean of per-task day ages; 0 for no tasks.
    pub fn average_task_age(&self, tasks: &[Task], now: Time) -> u64 {
        if tasks.is_empty() {
            return 0;
        }
        let total: i64 = tasks.iter().map(|t| age_in_days(t.created_at, now)).sum();
        (total as f64 / tasks.len() as f64).round() as u64
    }

    /// Weighted, capped blend of completion rate, high-priority completion
    /// and recent completions; 0 for no tasks.
    ///
    /// With no high-priority tasks the high-priority term gets full credit.
    pub fn productivity_score(&self, tasks: &[Task], now: Time) -> u32 {
        if tasks.is_empty() {
            return 0;
        }
        let total = tasks.len() as f64;

        let completed: Vec<&Task> = tasks.iter().filter(|t| t.completed).collect();
        let completion_rate = completed.len() as f64 / total;

        let high_total = tasks.iter().filter(|t| t.priority == Priority::High).count();
        let high_done = completed.iter().filter(|t| t.priority == Priority::High).count();
        let high_rate = if high_total > 0 {
            high_done as f64 / high_total as f64
        } else {
            1.0
        };

        let recent = completed
            .iter()
            .filter(|t| age_in_days(t.created_at, now) <= self.weights.recency_window_days)
            .count();
        let recency_bonus = recent as f64 / total * self.weights.recency;

        let score = completion_rate * self.weights.completion
            + high_rate * self.weights.high_priority
            + recency_bonus;
        (score.clamp(0.0, 1.0) * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use tasklens_core::NewTask;

    fn now() -> Time {
        Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap()
    }

    fn task(priority: Priority, completed: bool, days_old: i64) -> Task {
        let mut task = NewTask::new("t")
            .with_priority(priority)
            .into_task(now() - Duration::days(days_old))
            .unwrap();
        task.completed = completed;
        task
    }

    #[test]
    fn test_age_floors_partial_days() {
        let created = now() - Duration::hours(47);
        assert_eq!(age_in_days(created, now()), 1);
        assert_eq!(age_in_days(now() - Duration::hours(48), now()), 2);
        assert_eq!(age_in_days(now() + Duration::hours(5), now()), 0);
    }

    #[test]
    fn test_pending_high_priority() {
        let weights = ScoreWeights::default();
        let tasks = vec![
            task(Priority::High, true, 0),
            task(Priority::High, false, 0),
            task(Priority::High, false, 0),
            task(Priority::Low, false, 0),
        ];
        let stats = ProgressStats::new(&weights).compute(&tasks, now());
        assert_eq!(stats.pending_high_priority(), 2);

        let inconsistent = StatsRecord {
            priority_distribution: PriorityCounts { high: 1, ..Default::default() },
            completion_by_priority: PriorityCounts { high: 3, ..Default::default() },
            ..Default::default()
        };
        assert_eq!(inconsistent.pending_high_priority(), 0);
    }

    #[test]
    fn test_empty_collection() {
        let weights = ScoreWeights::default();
        let stats = ProgressStats::new(&weights).compute(&[], now());
        assert_eq!(stats, StatsRecord::default());
    }

    #[test]
    fn test_all_completed_high_priority_caps_at_100() {
        let weights = ScoreWeights::default();
        let tasks: Vec<_> = (0..3).map(|_| task(Priority::High, true, 0)).collect();
        let stats = ProgressStats::new(&weights).compute(&tasks, now());
        assert_eq!(stats.completion_rate, 100.0);
        // 0.6 + 0.3 + 0.2 = 1.1, capped
        assert_eq!(stats.productivity_score, 100);
        assert_eq!(stats.pending_high_priority(), 0);
    }

    #[test]
    fn test_no_high_priority_gets_full_credit() {
        let weights = ScoreWeights::default();
        let tasks = vec![task(Priority::Low, false, 30), task(Priority::Medium, false, 30)];
        // 0 * 0.6 + 1 * 0.3 + 0
        assert_eq!(ProgressStats::new(&weights).productivity_score(&tasks, now()), 30);
    }

    #[test]
    fn test_recency_window() {
        let weights = ScoreWeights::default();
        let tasks = vec![
            task(Priority::Medium, true, 7),
            task(Priority::Medium, true, 8),
        ];
        // 1.0 * 0.6 + 0.3 + (1 / 2) * 0.2 = 1.0
        assert_eq!(ProgressStats::new(&weights).productivity_score(&tasks, now()), 100);

        let tasks = vec![
            task(Priority::Medium, true, 8),
            task(Priority::Medium, false, 8),
        ];
        // 0.5 * 0.6 + 0.3 + 0 = 0.6
        assert_eq!(ProgressStats::new(&weights).productivity_score(&tasks, now()), 60);
    }

    #[test]
    fn test_score_monotonic_in_completion() {
        let weights = ScoreWeights::default();
        let engine = ProgressStats::new(&weights);
        let mut tasks: Vec<_> = (0..10).map(|i| task(Priority::High, false, i * 3)).collect();

        let mut previous = engine.productivity_score(&tasks, now());
        for i in 0..tasks.len() {
            tasks[i].completed = true;
            let score = engine.productivity_score(&tasks, now());
            assert!(score >= previous);
            assert!(score <= 100);
            previous = score;
        }
    }

    #[test]
    fn test_distribution_and_age() {
        let weights = ScoreWeights::default();
        let tasks = vec![
            task(Priority::High, true, 1),
            task(Priority::High, false, 2),
            task(Priority::Low, false, 10),
            task(Priority::Medium, true, 4),
        ];
        let stats = ProgressStats::new(&weights).compute(&tasks, now());

        assert_eq!(stats.total_tasks, 4);
        assert_eq!(stats.completed_tasks, 2);
        assert_eq!(stats.pending_tasks, 2);
        assert_eq!(stats.completion_rate, 50.0);
        assert_eq!(stats.priority_distribution, PriorityCounts { low: 1, medium: 1, high: 2 });
        assert_eq!(stats.completion_by_priority, PriorityCounts { low: 0, medium: 1, high: 1 });
        // (1 + 2 + 10 + 4) / 4 = 4.25
        assert_eq!(stats.average_task_age, 4);
        // 0.5 * 0.6 + 0.5 * 0.3 + (2 / 4) * 0.2 = 0.55
        assert_eq!(stats.productivity_score, 55);
        assert_eq!(stats.pending_high_priority(), 1);
    }
}
