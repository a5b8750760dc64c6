//! Insight Engine
//!
//! Heuristic text classification and statistical aggregation over task
//! collections: per-description analysis, collection-level suggestions and
//! progress summaries. Every operation is a synchronous pure function of its
//! inputs and a reference instant.

#![warn(missing_docs)]

pub mod vocabulary;
pub mod classifier;
pub mod estimator;
pub mod patterns;
pub mod suggestions;
pub mod stats;
pub mod narrator;
pub mod config;
pub mod engine;

pub use vocabulary::{Category, CategoryKeywords, Vocabulary};
pub use classifier::{Analysis, Complexity, Sentiment, TextClassifier};
pub use estimator::TimeEstimator;
pub use patterns::{PatternAggregator, TaskPatterns};
pub use suggestions::{Suggestion, SuggestionGenerator, SuggestionKind, SuggestionLevel};
pub use stats::{age_in_days, PriorityCounts, ProgressStats, StatsRecord};
pub use narrator::{ProgressNarrator, ProgressSummary, Recommendation, Trend, TrendRecord};
pub use config::{ConfigError, InsightConfig, ScoreWeights};
pub use engine::InsightEngine;
