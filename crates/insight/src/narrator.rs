//! Prose progress summaries built on [`StatsRecord`].

use serde::{Deserialize, Serialize};
use tasklens_core::{Priority, Task, Time};

use crate::stats::{age_in_days, StatsRecord};

const RECENT_DAYS: i64 = 7;
const MONTHLY_DAYS: i64 = 30;
const INCREASING_ABOVE: usize = 5;
const DECREASING_BELOW: usize = 2;
const MAX_NEXT_STEPS: usize = 3;

/// Coarse direction of task creation volume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// More than five tasks created in the last week
    Increasing,
    /// Two to five tasks created in the last week
    Stable,
    /// Fewer than two tasks created in the last week
    Decreasing,
}

/// Creation and completion activity over recent windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendRecord {
    /// Tasks created in the last 7 days
    pub recent_activity: usize,
    /// Tasks created in the last 30 days
    pub monthly_activity: usize,
    /// Completed tasks among the last 7 days
    pub recent_completions: usize,
    /// Direction label
    pub trend: Trend,
}

/// Process advice with an urgency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// Area such as "Completion"
    pub category: String,
    /// What to do
    pub suggestion: String,
    /// Urgency
    pub priority: Priority,
}

impl Recommendation {
    fn new(category: &str, suggestion: &str, priority: Priority) -> Self {
        Self {
            category: category.to_string(),
            suggestion: suggestion.to_string(),
            priority,
        }
    }
}

/// Narrative summary of a task collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    /// One-paragraph overview
    pub overview: String,
    /// Metrics the prose is derived from
    pub key_metrics: StatsRecord,
    /// Observations, in check order
    pub insights: Vec<String>,
    /// Process advice, in check order
    pub recommendations: Vec<Recommendation>,
    /// Recent activity
    pub trend_analysis: TrendRecord,
    /// At most three concrete next actions
    pub next_steps: Vec<String>,
}

/// Turns statistics and the raw collection into prose.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProgressNarrator;

impl ProgressNarrator {
    /// Assemble the full summary. `stats` must have been computed from
    /// `tasks` at `now`.
    pub fn summarize(&self, stats: StatsRecord, tasks: &[Task], now: Time) -> ProgressSummary {
        ProgressSummary {
            overview: self.overview(&stats),
            insights: self.insights(&stats),
            recommendations: self.recommendations(&stats),
            trend_analysis: self.trends(tasks, now),
            next_steps: self.next_steps(tasks),
            key_metrics: stats,
        }
    }

    /// Templated sentence with counts, rate and a performance label.
    pub fn overview(&self, stats: &StatsRecord) -> String {
        let performance = match stats.productivity_score {
            s if s >= 80 => "excellent",
            s if s >= 60 => "good",
            s if s < 40 => "needs improvement",
            _ => "average",
        };
        format!(
            "You have completed {} out of {} tasks ({}% completion rate). \
             Your current productivity score is {}/100, indicating {} task management performance.",
            stats.completed_tasks,
            stats.total_tasks,
            stats.completion_rate.round(),
            stats.productivity_score,
            performance
        )
    }

    /// Independent checks; several may fire.
    pub fn insights(&self, stats: &StatsRecord) -> Vec<String> {
        let mut insights = Vec::new();

        if stats.completion_rate > 80.0 {
            insights.push(
                "🎉 Excellent completion rate! You're consistently finishing your tasks.".to_string(),
            );
        } else if stats.completion_rate < 30.0 {
            insights.push(
                "⚠️ Low completion rate detected. Consider breaking tasks into smaller, manageable pieces."
                    .to_string(),
            );
        }

        let high_pending = stats.pending_high_priority();
        if high_pending > 3 {
            insights.push(format!(
                "🔥 You have {} pending high-priority tasks. Focus on these first.",
                high_pending
            ));
        }

        if stats.average_task_age > 14 {
            insights.push(
                "📅 Your tasks are staying open for a long time on average. Consider setting deadlines."
                    .to_string(),
            );
        } else if stats.average_task_age < 3 {
            insights.push("⚡ You're completing tasks quickly! Great momentum.".to_string());
        }

        if stats.productivity_score > 85 {
            insights.push(
                "🚀 Outstanding productivity! You're managing tasks very effectively.".to_string(),
            );
        } else if stats.productivity_score < 40 {
            insights.push(
                "💡 Productivity could be improved. Try prioritizing high-impact tasks.".to_string(),
            );
        }

        insights
    }

    /// Process recommendations, in check order.
    pub fn recommendations(&self, stats: &StatsRecord) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();

        if stats.completion_rate < 50.0 {
            recommendations.push(Recommendation::new(
                "Completion",
                "Focus on completing existing tasks before adding new ones",
                Priority::High,
            ));
        }

        let high_ratio = if stats.total_tasks > 0 {
            stats.priority_distribution.high as f64 / stats.total_tasks as f64
        } else {
            0.0
        };
        if high_ratio > 0.4 {
            recommendations.push(Recommendation::new(
                "Priority Management",
                "Too many high-priority tasks. Re-evaluate and redistribute priorities",
                Priority::Medium,
            ));
        }

        if stats.average_task_age > 10 {
            recommendations.push(Recommendation::new(
                "Time Management",
                "Set specific deadlines for tasks to maintain momentum",
                Priority::Medium,
            ));
        }

        if stats.productivity_score < 60 {
            recommendations.push(Recommendation::new(
                "Productivity",
                "Consider using time-blocking or the Pomodoro technique",
                Priority::Low,
            ));
        }

        recommendations
    }

    /// Activity in the last 7 and 30 days.
    pub fn trends(&self, tasks: &[Task], now: Time) -> TrendRecord {
        let recent: Vec<&Task> = tasks
            .iter()
            .filter(|t| age_in_days(t.created_at, now) <= RECENT_DAYS)
            .collect();
        let monthly_activity = tasks
            .iter()
            .filter(|t| age_in_days(t.created_at, now) <= MONTHLY_DAYS)
            .count();

        let trend = match recent.len() {
            n if n > INCREASING_ABOVE => Trend::Increasing,
            n if n < DECREASING_BELOW => Trend::Decreasing,
            _ => Trend::Stable,
        };

        TrendRecord {
            recent_activity: recent.len(),
            monthly_activity,
            recent_completions: recent.iter().filter(|t| t.completed).count(),
            trend,
        }
    }

    /// First pending high-priority task, oldest pending task, then generic
    /// reminders; at most three.
    pub fn next_steps(&self, tasks: &[Task]) -> Vec<String> {
        let mut steps = Vec::new();

        let first_high = tasks
            .iter()
            .find(|t| t.priority == Priority::High && !t.completed);
        if let Some(task) = first_high {
            steps.push(format!("Complete high-priority task: \"{}\"", task.title));
        }

        // min_by_key keeps the last minimum; fold keeps the first
        let oldest = tasks
            .iter()
            .filter(|t| !t.completed)
            .fold(None::<&Task>, |oldest, t| match oldest {
                Some(o) if o.created_at <= t.created_at => Some(o),
                _ => Some(t),
            });
        if let Some(task) = oldest {
            if first_high.map(|h| h.id) != Some(task.id) {
                steps.push(format!("Address oldest pending task: \"{}\"", task.title));
            }
        }

        steps.push("Review and update task priorities".to_string());
        steps.push("Consider breaking down complex tasks into subtasks".to_string());
        steps.truncate(MAX_NEXT_STEPS);
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoreWeights;
    use crate::stats::ProgressStats;
    use chrono::{Duration, TimeZone, Utc};
    use tasklens_core::NewTask;

    fn now() -> Time {
        Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap()
    }

    fn task(title: &str, priority: Priority, completed: bool, days_old: i64) -> Task {
        let mut task = NewTask::new(title)
            .with_priority(priority)
            .into_task(now() - Duration::days(days_old))
            .unwrap();
        task.completed = completed;
        task
    }

    fn summarize(tasks: &[Task]) -> ProgressSummary {
        let weights = ScoreWeights::default();
        let stats = ProgressStats::new(&weights).compute(tasks, now());
        ProgressNarrator.summarize(stats, tasks, now())
    }

    #[test]
    fn test_all_completed_high_priority() {
        let tasks: Vec<_> = (0..3)
            .map(|i| task(&format!("t{}", i), Priority::High, true, 0))
            .collect();
        let summary = summarize(&tasks);

        assert_eq!(summary.key_metrics.completion_rate, 100.0);
        assert_eq!(summary.key_metrics.productivity_score, 100);
        assert!(summary.overview.contains("(100% completion rate)"));
        assert!(summary.overview.contains("100/100, indicating excellent"));
        assert_eq!(
            summary.insights,
            vec![
                "🎉 Excellent completion rate! You're consistently finishing your tasks.",
                "⚡ You're completing tasks quickly! Great momentum.",
                "🚀 Outstanding productivity! You're managing tasks very effectively.",
            ]
        );
        // ratio 1.0 > 0.4
        assert_eq!(summary.recommendations.len(), 1);
        assert_eq!(summary.recommendations[0].category, "Priority Management");
        assert_eq!(
            summary.next_steps,
            vec![
                "Review and update task priorities",
                "Consider breaking down complex tasks into subtasks",
            ]
        );
    }

    #[test]
    fn test_empty_collection() {
        let summary = summarize(&[]);
        assert_eq!(
            summary.overview,
            "You have completed 0 out of 0 tasks (0% completion rate). \
             Your current productivity score is 0/100, indicating needs improvement task management performance."
        );
        assert_eq!(summary.trend_analysis.trend, Trend::Decreasing);
        assert_eq!(summary.trend_analysis.recent_activity, 0);
        let categories: Vec<_> = summary
            .recommendations
            .iter()
            .map(|r| r.category.as_str())
            .collect();
        assert_eq!(categories, vec!["Completion", "Productivity"]);
        assert_eq!(summary.next_steps.len(), 2);
    }

    #[test]
    fn test_overview_labels() {
        let narrator = ProgressNarrator;
        let label = |score: u32| {
            let stats = StatsRecord {
                productivity_score: score,
                ..Default::default()
            };
            narrator.overview(&stats)
        };
        assert!(label(80).contains("indicating excellent"));
        assert!(label(79).contains("indicating good"));
        assert!(label(60).contains("indicating good"));
        assert!(label(59).contains("indicating average"));
        assert!(label(40).contains("indicating average"));
        assert!(label(39).contains("indicating needs improvement"));
    }

    #[test]
    fn test_insights_for_stalled_collection() {
        let tasks: Vec<_> = (0..5)
            .map(|i| task(&format!("t{}", i), Priority::High, false, 20))
            .collect();
        let summary = summarize(&tasks);
        assert_eq!(
            summary.insights,
            vec![
                "⚠️ Low completion rate detected. Consider breaking tasks into smaller, manageable pieces.",
                "🔥 You have 5 pending high-priority tasks. Focus on these first.",
                "📅 Your tasks are staying open for a long time on average. Consider setting deadlines.",
                "💡 Productivity could be improved. Try prioritizing high-impact tasks.",
            ]
        );
        let categories: Vec<_> = summary
            .recommendations
            .iter()
            .map(|r| r.category.as_str())
            .collect();
        assert_eq!(
            categories,
            vec!["Completion", "Priority Management", "Time Management", "Productivity"]
        );
        assert_eq!(summary.recommendations[0].priority, Priority::High);
        assert_eq!(summary.recommendations[3].priority, Priority::Low);
    }

    #[test]
    fn test_trend_thresholds() {
        let narrator = ProgressNarrator;
        let fresh = |n: usize| -> Vec<Task> {
            (0..n).map(|_| task("t", Priority::Medium, false, 7)).collect()
        };
        assert_eq!(narrator.trends(&fresh(1), now()).trend, Trend::Decreasing);
        assert_eq!(narrator.trends(&fresh(2), now()).trend, Trend::Stable);
        assert_eq!(narrator.trends(&fresh(5), now()).trend, Trend::Stable);
        assert_eq!(narrator.trends(&fresh(6), now()).trend, Trend::Increasing);
    }

    #[test]
    fn test_trend_windows() {
        let tasks = vec![
            task("a", Priority::Medium, true, 0),
            task("b", Priority::Medium, false, 7),
            task("c", Priority::Medium, true, 8),
            task("d", Priority::Medium, false, 30),
            task("e", Priority::Medium, false, 31),
        ];
        let trends = ProgressNarrator.trends(&tasks, now());
        assert_eq!(trends.recent_activity, 2);
        assert_eq!(trends.monthly_activity, 4);
        assert_eq!(trends.recent_completions, 1);
    }

    #[test]
    fn test_next_steps_high_then_oldest() {
        let tasks = vec![
            task("Old chore", Priority::Low, false, 20),
            task("Ship hotfix", Priority::High, false, 1),
            task("Done", Priority::Low, true, 40),
        ];
        assert_eq!(
            ProgressNarrator.next_steps(&tasks),
            vec![
                "Complete high-priority task: \"Ship hotfix\"",
                "Address oldest pending task: \"Old chore\"",
                "Review and update task priorities",
            ]
        );
    }

    #[test]
    fn test_next_steps_skip_duplicate_task() {
        let tasks = vec![
            task("Ship hotfix", Priority::High, false, 20),
            task("Chore", Priority::Low, false, 1),
        ];
        assert_eq!(
            ProgressNarrator.next_steps(&tasks),
            vec![
                "Complete high-priority task: \"Ship hotfix\"",
                "Review and update task priorities",
                "Consider breaking down complex tasks into subtasks",
            ]
        );
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let json = serde_json::to_value(summarize(&[task("a", Priority::Low, false, 0)])).unwrap();
        assert!(json["keyMetrics"]["productivityScore"].is_number());
        assert_eq!(json["trendAnalysis"]["trend"], "decreasing");
        assert!(json["nextSteps"].is_array());
        assert_eq!(json["recommendations"][0]["priority"], "high");
    }
}
