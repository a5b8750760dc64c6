//! Entry point bundling every insight operation behind one configuration.

use std::sync::Arc;

use chrono::Utc;
use tasklens_core::{Task, Time};
use tracing::{debug, Span};

use crate::classifier::{Analysis, TextClassifier};
use crate::config::InsightConfig;
use crate::narrator::{ProgressNarrator, ProgressSummary};
use crate::patterns::{PatternAggregator, TaskPatterns};
use crate::stats::{ProgressStats, StatsRecord};
use crate::suggestions::{Suggestion, SuggestionGenerator};

/// Insight engine.
///
/// Holds no task state; every call is a pure function of its arguments.
/// The `*_at` variants take the reference instant explicitly, the others
/// read the clock once per call.
pub struct InsightEngine {
    config: InsightConfig,
    classifier: TextClassifier,
    span: Span,
}

impl Default for InsightEngine {
    fn default() -> Self {
        Self::new(InsightConfig::default())
    }
}

impl InsightEngine {
    /// Create an engine from a validated configuration.
    pub fn new(config: InsightConfig) -> Self {
        let classifier = TextClassifier::new(Arc::new(config.vocabulary.clone()));
        Self {
            config,
            classifier,
            span: Span::none(),
        }
    }

    /// Record diagnostics under `span` instead of the current span.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &InsightConfig {
        &self.config
    }

    /// Classifier used for per-description analysis.
    pub fn classifier(&self) -> &TextClassifier {
        &self.classifier
    }

    /// Analyze one description.
    pub fn analyze(&self, text: &str) -> Analysis {
        let _guard = self.span.enter();
        let analysis = self.classifier.analyze(text);
        debug!(
            "Analyzed description ({} chars): {} / {:?}",
            text.chars().count(),
            analysis.category,
            analysis.priority
        );
        analysis
    }

    /// Collection patterns.
    pub fn patterns(&self, tasks: &[Task]) -> TaskPatterns {
        PatternAggregator::new(&self.classifier).aggregate(tasks)
    }

    /// Suggestions for `tasks` as of now.
    pub fn suggest(&self, tasks: &[Task]) -> Vec<Suggestion> {
        self.suggest_at(tasks, Utc::now())
    }

    /// Suggestions for `tasks` as of `now`.
    pub fn suggest_at(&self, tasks: &[Task], now: Time) -> Vec<Suggestion> {
        let _guard = self.span.enter();
        let suggestions = SuggestionGenerator::new(&self.classifier).generate(tasks, now);
        debug!(
            "Generated {} suggestions for {} tasks",
            suggestions.len(),
            tasks.len()
        );
        suggestions
    }

    /// Key metrics as of `now`.
    pub fn stats_at(&self, tasks: &[Task], now: Time) -> StatsRecord {
        ProgressStats::new(&self.config.weights).compute(tasks, now)
    }

    /// Progress summary as of now.
    pub fn summarize(&self, tasks: &[Task]) -> ProgressSummary {
        self.summarize_at(tasks, Utc::now())
    }

    /// Progress summary as of `now`.
    pub fn summarize_at(&self, tasks: &[Task], now: Time) -> ProgressSummary {
        let _guard = self.span.enter();
        let stats = self.stats_at(tasks, now);
        let summary = ProgressNarrator.summarize(stats, tasks, now);
        debug!(
            "Summarized {} tasks, productivity score {}",
            tasks.len(),
            summary.key_metrics.productivity_score
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Complexity;
    use crate::config::ScoreWeights;
    use crate::narrator::Trend;
    use crate::suggestions::{SuggestionKind, SuggestionLevel};
    use crate::vocabulary::Category;
    use chrono::{Duration, TimeZone};
    use tasklens_core::{NewTask, Priority};

    fn now() -> Time {
        Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap()
    }

    fn task(title: &str, description: &str, priority: Priority, completed: bool) -> Task {
        let mut task = NewTask::new(title)
            .with_description(description)
            .with_priority(priority)
            .into_task(now())
            .unwrap();
        task.completed = completed;
        task
    }

    #[test]
    fn test_analyze_login_bug() {
        let engine = InsightEngine::default();
        let analysis = engine.analyze("Fix urgent critical bug in login API");
        assert_eq!(analysis.priority, Priority::High);
        assert_eq!(analysis.category, Category::Development);
        assert_eq!(analysis.complexity, Complexity::High);
    }

    #[test]
    fn test_four_high_priority_tasks_one_warning() {
        let engine = InsightEngine::default();
        let tasks: Vec<_> = (0..4)
            .map(|i| task(&format!("t{}", i), "", Priority::High, false))
            .collect();
        let suggestions = engine.suggest_at(&tasks, now());
        let priority: Vec<_> = suggestions
            .iter()
            .filter(|s| s.kind == SuggestionKind::Priority)
            .collect();
        assert_eq!(priority.len(), 1);
        assert_eq!(priority[0].level, SuggestionLevel::Warning);
        assert!(priority[0].message.contains('4'));
    }

    #[test]
    fn test_summary_all_completed_high() {
        let engine = InsightEngine::default();
        let tasks: Vec<_> = (0..3)
            .map(|i| task(&format!("t{}", i), "Ship it", Priority::High, true))
            .collect();
        let summary = engine.summarize_at(&tasks, now());
        assert_eq!(summary.key_metrics.completion_rate, 100.0);
        assert_eq!(summary.key_metrics.productivity_score, 100);
        assert_eq!(summary.trend_analysis.trend, Trend::Stable);
    }

    #[test]
    fn test_deterministic_for_fixed_instant() {
        let engine = InsightEngine::default();
        let tasks = vec![
            task("a", "Write the docs, due Friday", Priority::Low, false),
            task("b", "Fix the flaky test", Priority::High, true),
        ];
        assert_eq!(engine.summarize_at(&tasks, now()), engine.summarize_at(&tasks, now()));
        assert_eq!(engine.suggest_at(&tasks, now()), engine.suggest_at(&tasks, now()));
    }

    #[test]
    fn test_custom_weights() {
        let config = InsightConfig {
            weights: ScoreWeights {
                completion: 1.0,
                high_priority: 0.0,
                recency: 0.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let engine = InsightEngine::new(config);
        let mut tasks = vec![
            task("a", "x", Priority::Low, true),
            task("b", "x", Priority::Low, false),
        ];
        tasks[1].created_at = now() - Duration::days(3);
        assert_eq!(engine.stats_at(&tasks, now()).productivity_score, 50);
    }

    #[test]
    fn test_custom_vocabulary_reaches_classifier() {
        let mut config = InsightConfig::default();
        config.vocabulary.high_priority.push("blocker".to_string());
        let engine = InsightEngine::new(config).with_span(tracing::info_span!("insight"));
        assert_eq!(engine.analyze("release blocker").priority, Priority::High);
    }
}
