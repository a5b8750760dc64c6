//! Collection-level suggestions.
//!
//! Four independent rule groups run in a fixed order (priority,
//! productivity, organization, time management) and their output is
//! concatenated without deduplication.

use serde::{Deserialize, Serialize};
use tasklens_core::{Priority, Task, Time};

use crate::classifier::TextClassifier;
use crate::patterns::{PatternAggregator, TaskPatterns};
use crate::stats::age_in_days;

const HIGH_PRIORITY_OVERLOAD: usize = 3;
const STALE_LOW_PRIORITY_DAYS: i64 = 7;
const LOW_COMPLETION_RATE: f64 = 0.3;
const BRIEF_DESCRIPTION_CHARS: usize = 20;
const MISSING_DEADLINE_SHARE: f64 = 0.7;
const MANY_CATEGORIES: usize = 5;
const DOMINANT_CATEGORY_SHARE: f64 = 0.6;
const RECENT_TASK_DAYS: i64 = 1;
const CREATION_BURST: usize = 10;
const OLD_TASK_DAYS: i64 = 14;

/// Rule group that produced a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestionKind {
    /// Priority hygiene
    Priority,
    /// Completion and description quality
    Productivity,
    /// Category spread
    Organization,
    /// Task creation rate and age
    TimeManagement,
}

/// Severity of a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionLevel {
    /// Worth knowing
    Info,
    /// Worth acting on
    Warning,
}

/// A recommendation derived from a task collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Rule group
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    /// Severity
    pub level: SuggestionLevel,
    /// Short headline
    pub title: String,
    /// What was observed
    pub message: String,
    /// What to do about it
    pub action: String,
}

impl Suggestion {
    fn new(
        kind: SuggestionKind,
        level: SuggestionLevel,
        title: impl Into<String>,
        message: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            level,
            title: title.into(),
            message: message.into(),
            action: action.into(),
        }
    }
}

/// Runs the suggestion rules against a collection.
pub struct SuggestionGenerator<'a> {
    classifier: &'a TextClassifier,
}

impl<'a> SuggestionGenerator<'a> {
    /// Create a generator that categorizes with `classifier`.
    pub fn new(classifier: &'a TextClassifier) -> Self {
        Self { classifier }
    }

    /// All suggestions for `tasks`, ages measured at `now`.
    pub fn generate(&self, tasks: &[Task], now: Time) -> Vec<Suggestion> {
        let patterns = PatternAggregator::new(self.classifier).aggregate(tasks);

        let mut suggestions = Vec::new();
        suggestions.extend(priority_suggestions(tasks, now));
        suggestions.extend(productivity_suggestions(&patterns));
        suggestions.extend(organization_suggestions(&patterns));
        suggestions.extend(time_management_suggestions(tasks, now));
        suggestions
    }
}

fn priority_suggestions(tasks: &[Task], now: Time) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    let high_incomplete = tasks
        .iter()
        .filter(|t| t.priority == Priority::High && !t.completed)
        .count();
    if high_incomplete > HIGH_PRIORITY_OVERLOAD {
        suggestions.push(Suggestion::new(
            SuggestionKind::Priority,
            SuggestionLevel::Warning,
            "High Priority Task Overload",
            format!(
                "You have {} high-priority tasks. Consider reviewing if all are truly urgent.",
                high_incomplete
            ),
            "Review and potentially downgrade some tasks to medium priority",
        ));
    }

    let stale_low = tasks
        .iter()
        .filter(|t| {
            t.priority == Priority::Low
                && !t.completed
                && age_in_days(t.created_at, now) > STALE_LOW_PRIORITY_DAYS
        })
        .count();
    if stale_low > 0 {
        suggestions.push(Suggestion::new(
            SuggestionKind::Priority,
            SuggestionLevel::Info,
            "Stale Low Priority Tasks",
            format!("You have {} low-priority tasks older than a week.", stale_low),
            "Consider completing or removing these tasks to maintain focus",
        ));
    }

    suggestions
}

fn productivity_suggestions(patterns: &TaskPatterns) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    // An empty collection reads as 0% complete with zero-length descriptions
    if patterns.completion_rate < LOW_COMPLETION_RATE {
        suggestions.push(Suggestion::new(
            SuggestionKind::Productivity,
            SuggestionLevel::Warning,
            "Low Task Completion Rate",
            format!(
                "Your completion rate is {}%. This might indicate task overload.",
                (patterns.completion_rate * 100.0).round()
            ),
            "Consider breaking large tasks into smaller, manageable chunks",
        ));
    }

    if patterns.average_description_length < BRIEF_DESCRIPTION_CHARS {
        suggestions.push(Suggestion::new(
            SuggestionKind::Productivity,
            SuggestionLevel::Info,
            "Task Descriptions Too Brief",
            "Your task descriptions are quite short, which might lead to unclear objectives.",
            "Add more detail to task descriptions for better clarity",
        ));
    }

    if patterns.tasks_without_deadlines as f64 > patterns.total_tasks as f64 * MISSING_DEADLINE_SHARE
    {
        suggestions.push(Suggestion::new(
            SuggestionKind::Productivity,
            SuggestionLevel::Info,
            "Missing Deadlines",
            "Most of your tasks don't have deadlines, which can hurt prioritization.",
            "Consider adding target completion dates to your tasks",
        ));
    }

    suggestions
}

fn organization_suggestions(patterns: &TaskPatterns) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    let category_count = patterns.category_counts.len();
    if category_count > MANY_CATEGORIES {
        suggestions.push(Suggestion::new(
            SuggestionKind::Organization,
            SuggestionLevel::Info,
            "Many Task Categories",
            format!("You have tasks across {} different categories.", category_count),
            "Consider using tags or projects to better organize related tasks",
        ));
    }

    let dominant = patterns
        .category_counts
        .iter()
        .fold(None, |best: Option<(_, usize)>, (category, &count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((*category, count)),
        });
    if let Some((category, count)) = dominant {
        if count as f64 > patterns.total_tasks as f64 * DOMINANT_CATEGORY_SHARE {
            suggestions.push(Suggestion::new(
                SuggestionKind::Organization,
                SuggestionLevel::Info,
                format!("{} Task Focus", category),
                format!("Most of your tasks are {}-related.", category),
                "Consider batching similar tasks for more efficient workflow",
            ));
        }
    }

    suggestions
}

fn time_management_suggestions(tasks: &[Task], now: Time) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    let recent = tasks
        .iter()
        .filter(|t| age_in_days(t.created_at, now) <= RECENT_TASK_DAYS)
        .count();
    if recent > CREATION_BURST {
        suggestions.push(Suggestion::new(
            SuggestionKind::TimeManagement,
            SuggestionLevel::Warning,
            "High Task Creation Rate",
            format!("You've created {} tasks in the last day.", recent),
            "Consider if you're taking on too much or if tasks should be combined",
        ));
    }

    let old_incomplete = tasks
        .iter()
        .filter(|t| !t.completed && age_in_days(t.created_at, now) > OLD_TASK_DAYS)
        .count();
    if old_incomplete > 0 {
        suggestions.push(Suggestion::new(
            SuggestionKind::TimeManagement,
            SuggestionLevel::Info,
            "Old Incomplete Tasks",
            format!(
                "You have {} tasks older than 2 weeks that are still incomplete.",
                old_incomplete
            ),
            "Review these tasks - they might need to be updated, delegated, or removed",
        ));
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use tasklens_core::NewTask;

    fn now() -> Time {
        Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap()
    }

    fn task(description: &str, priority: Priority, completed: bool, days_old: i64) -> Task {
        let mut task = NewTask::new("t")
            .with_description(description)
            .with_priority(priority)
            .into_task(now() - Duration::days(days_old))
            .unwrap();
        task.completed = completed;
        task
    }

    fn generate(tasks: &[Task]) -> Vec<Suggestion> {
        let classifier = TextClassifier::default();
        SuggestionGenerator::new(&classifier).generate(tasks, now())
    }

    fn titles(suggestions: &[Suggestion]) -> Vec<&str> {
        suggestions.iter().map(|s| s.title.as_str()).collect()
    }

    const DETAILED: &str = "Implement the export endpoint, due Friday";

    #[test]
    fn test_empty_collection_suggestions() {
        let suggestions = generate(&[]);
        assert_eq!(
            titles(&suggestions),
            vec!["Low Task Completion Rate", "Task Descriptions Too Brief"]
        );
        assert!(suggestions
            .iter()
            .all(|s| s.kind == SuggestionKind::Productivity));
        assert!(suggestions[0].message.contains("0%"));
    }

    #[test]
    fn test_four_fresh_high_priority_tasks() {
        let tasks: Vec<_> = (0..4).map(|_| task("", Priority::High, false, 0)).collect();
        let suggestions = generate(&tasks);

        let priority: Vec<_> = suggestions
            .iter()
            .filter(|s| s.kind == SuggestionKind::Priority)
            .collect();
        assert_eq!(priority.len(), 1);
        assert_eq!(priority[0].level, SuggestionLevel::Warning);
        assert_eq!(priority[0].title, "High Priority Task Overload");
        assert!(priority[0].message.contains("You have 4 high-priority tasks"));
    }

    #[test]
    fn test_three_high_priority_tasks_is_not_overload() {
        let tasks: Vec<_> = (0..3).map(|_| task(DETAILED, Priority::High, false, 0)).collect();
        assert!(!titles(&generate(&tasks)).contains(&"High Priority Task Overload"));
    }

    #[test]
    fn test_completed_high_priority_not_counted() {
        let mut tasks: Vec<_> = (0..4).map(|_| task(DETAILED, Priority::High, false, 0)).collect();
        tasks[0].completed = true;
        assert!(!titles(&generate(&tasks)).contains(&"High Priority Task Overload"));
    }

    #[test]
    fn test_stale_low_priority_boundary() {
        let at_seven = vec![task(DETAILED, Priority::Low, false, 7)];
        assert!(!titles(&generate(&at_seven)).contains(&"Stale Low Priority Tasks"));

        let at_eight = vec![task(DETAILED, Priority::Low, false, 8)];
        assert!(titles(&generate(&at_eight)).contains(&"Stale Low Priority Tasks"));
    }

    #[test]
    fn test_productivity_rules() {
        let tasks = vec![
            task("Fix bug", Priority::Medium, false, 0),
            task("Call bob", Priority::Medium, false, 0),
            task("Write the changelog", Priority::Medium, false, 0),
            task("Ship it", Priority::Medium, true, 0),
        ];
        let suggestions = generate(&tasks);
        let productivity: Vec<_> = suggestions
            .iter()
            .filter(|s| s.kind == SuggestionKind::Productivity)
            .map(|s| s.title.as_str())
            .collect();
        assert_eq!(
            productivity,
            vec!["Low Task Completion Rate", "Task Descriptions Too Brief", "Missing Deadlines"]
        );
        assert!(suggestions[0].message.contains("25%"));
    }

    #[test]
    fn test_dominant_category() {
        let tasks = vec![
            task("Fix the checkout bug, due today", Priority::Medium, true, 0),
            task("Review API code, due tomorrow", Priority::Medium, true, 0),
            task("Refactor feature flags, deadline Monday", Priority::Medium, true, 0),
            task("Plan the team offsite, due next week", Priority::Medium, true, 0),
        ];
        let suggestions = generate(&tasks);
        assert_eq!(titles(&suggestions), vec!["development Task Focus"]);
        assert_eq!(suggestions[0].kind, SuggestionKind::Organization);
        assert_eq!(suggestions[0].message, "Most of your tasks are development-related.");
    }

    #[test]
    fn test_dominant_category_boundary() {
        let mut tasks = vec![
            task("Fix the checkout bug, due today", Priority::Medium, true, 0),
            task("Review API code, due tomorrow", Priority::Medium, true, 0),
            task("Refactor feature flags, deadline Monday", Priority::Medium, true, 0),
            task("Plan the team offsite, due next week", Priority::Medium, true, 0),
            task("Buy groceries, due today", Priority::Medium, true, 0),
        ];
        // 3 of 5 is exactly 60%
        assert!(generate(&tasks).is_empty());

        tasks.push(task("Fix the login bug, due today", Priority::Medium, true, 0));
        assert_eq!(titles(&generate(&tasks)), vec!["development Task Focus"]);
    }

    #[test]
    fn test_many_categories() {
        let descriptions = [
            "Fix the bug, due today",
            "Update the mockup, due today",
            "Weekly standup, due today",
            "Update the readme, due today",
            "Write a test, due today",
            "Deploy, due today",
            "Buy groceries, due today",
        ];
        let tasks: Vec<_> = descriptions
            .iter()
            .map(|d| task(d, Priority::Medium, true, 0))
            .collect();
        let suggestions = generate(&tasks);
        assert_eq!(titles(&suggestions), vec!["Many Task Categories"]);
        assert!(suggestions[0].message.contains("7 different categories"));
    }

    #[test]
    fn test_time_management_rules() {
        let mut tasks: Vec<_> = (0..11).map(|_| task(DETAILED, Priority::Medium, true, 1)).collect();
        tasks.push(task(DETAILED, Priority::Medium, false, 15));
        let suggestions = generate(&tasks);

        let time: Vec<_> = suggestions
            .iter()
            .filter(|s| s.kind == SuggestionKind::TimeManagement)
            .collect();
        assert_eq!(time.len(), 2);
        assert_eq!(time[0].title, "High Task Creation Rate");
        assert!(time[0].message.contains("11 tasks"));
        assert_eq!(time[1].title, "Old Incomplete Tasks");
        assert_eq!(time[1].level, SuggestionLevel::Info);
    }

    #[test]
    fn test_creation_burst_boundary() {
        let mut tasks: Vec<_> = (0..10).map(|_| task(DETAILED, Priority::Medium, true, 0)).collect();
        tasks.push(task(DETAILED, Priority::Medium, true, 2));
        assert!(!titles(&generate(&tasks)).contains(&"High Task Creation Rate"));

        tasks.push(task(DETAILED, Priority::Medium, true, 1));
        let suggestions = generate(&tasks);
        assert!(titles(&suggestions).contains(&"High Task Creation Rate"));
        assert!(suggestions
            .iter()
            .any(|s| s.message == "You've created 11 tasks in the last day."));
    }

    #[test]
    fn test_old_incomplete_boundary() {
        let at_fourteen = vec![task(DETAILED, Priority::Medium, false, 14)];
        assert!(!titles(&generate(&at_fourteen)).contains(&"Old Incomplete Tasks"));

        let at_fifteen = vec![task(DETAILED, Priority::Medium, false, 15)];
        assert!(titles(&generate(&at_fifteen)).contains(&"Old Incomplete Tasks"));

        let completed = vec![task(DETAILED, Priority::Medium, true, 30)];
        assert!(!titles(&generate(&completed)).contains(&"Old Incomplete Tasks"));
    }

    #[test]
    fn test_group_order() {
        let mut tasks: Vec<_> = (0..4).map(|_| task("", Priority::High, false, 20)).collect();
        tasks.push(task("", Priority::Low, false, 20));
        let kinds: Vec<_> = generate(&tasks).iter().map(|s| s.kind).collect();

        let mut sorted = kinds.clone();
        sorted.sort_by_key(|k| match k {
            SuggestionKind::Priority => 0,
            SuggestionKind::Productivity => 1,
            SuggestionKind::Organization => 2,
            SuggestionKind::TimeManagement => 3,
        });
        assert_eq!(kinds, sorted);
        assert_eq!(kinds.first(), Some(&SuggestionKind::Priority));
        assert_eq!(kinds.last(), Some(&SuggestionKind::TimeManagement));
    }

    #[test]
    fn test_suggestion_serializes_type_field() {
        let suggestion = Suggestion::new(
            SuggestionKind::TimeManagement,
            SuggestionLevel::Warning,
            "t",
            "m",
            "a",
        );
        let json = serde_json::to_value(&suggestion).unwrap();
        assert_eq!(json["type"], "time-management");
        assert_eq!(json["level"], "warning");
    }
}
