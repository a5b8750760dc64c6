//! Text classification of task descriptions.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tasklens_core::Priority;

use crate::estimator::TimeEstimator;
use crate::vocabulary::{contains_any, Category, Vocabulary};

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").unwrap());

const MAX_KEYWORDS: usize = 5;
const MIN_KEYWORD_CHARS: usize = 3;

const BRIEF_DESCRIPTION_CHARS: usize = 20;
const LONG_DESCRIPTION_CHARS: usize = 200;
const LOW_COMPLEXITY_CHARS: usize = 50;
const MEDIUM_COMPLEXITY_CHARS: usize = 150;

/// Overall tone of a description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    /// More positive than negative words
    Positive,
    /// Balanced or no signal
    Neutral,
    /// More negative than positive words
    Negative,
}

/// Estimated complexity of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    /// Quick or basic work
    Low,
    /// Ordinary work
    Medium,
    /// Involved work
    High,
}

/// Structured analysis of one description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    /// Tone
    pub sentiment: Sentiment,
    /// Priority inferred from wording
    pub priority: Priority,
    /// Category from the ordered keyword table
    pub category: Category,
    /// Duration such as "45 minutes"
    pub estimated_time: String,
    /// Complexity level
    pub complexity: Complexity,
    /// Up to five keywords, in order of appearance
    pub keywords: Vec<String>,
    /// Improvement hints for the description
    pub suggestions: Vec<String>,
}

/// Keyword-driven classifier over a [`Vocabulary`].
#[derive(Debug, Clone)]
pub struct TextClassifier {
    vocabulary: Arc<Vocabulary>,
}

impl Default for TextClassifier {
    fn default() -> Self {
        Self::new(Arc::new(Vocabulary::default()))
    }
}

impl TextClassifier {
    /// Create a classifier over the given tables.
    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        Self { vocabulary }
    }

    /// The tables in use.
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Run every classifier and the time estimator over `text`.
    pub fn analyze(&self, text: &str) -> Analysis {
        Analysis {
            sentiment: self.sentiment(text),
            priority: self.priority(text),
            category: self.category(text),
            estimated_time: TimeEstimator::new(self.vocabulary.clone()).estimate(text),
            complexity: self.complexity(text),
            keywords: self.keywords(text),
            suggestions: self.suggestions(text),
        }
    }

    /// Net count of positive versus negative whole-word matches.
    pub fn sentiment(&self, text: &str) -> Sentiment {
        let lower = text.to_lowercase();
        let score: i64 = lower
            .split_whitespace()
            .map(|word| {
                let mut delta = 0;
                if self.vocabulary.positive_words.iter().any(|w| w == word) {
                    delta += 1;
                }
                if self.vocabulary.negative_words.iter().any(|w| w == word) {
                    delta -= 1;
                }
                delta
            })
            .sum();

        match score {
            s if s > 0 => Sentiment::Positive,
            s if s < 0 => Sentiment::Negative,
            _ => Sentiment::Neutral,
        }
    }

    /// High-priority wording wins over low-priority wording.
    pub fn priority(&self, text: &str) -> Priority {
        let lower = text.to_lowercase();
        if contains_any(&lower, &self.vocabulary.high_priority) {
            Priority::High
        } else if contains_any(&lower, &self.vocabulary.low_priority) {
            Priority::Low
        } else {
            Priority::Medium
        }
    }

    /// First category in table order with a substring match.
    pub fn category(&self, text: &str) -> Category {
        let lower = text.to_lowercase();
        self.vocabulary
            .categories
            .iter()
            .find(|entry| contains_any(&lower, &entry.keywords))
            .map(|entry| entry.category)
            .unwrap_or(Category::General)
    }

    /// Indicator words (low, then medium, then high), else description length.
    pub fn complexity(&self, text: &str) -> Complexity {
        let lower = text.to_lowercase();
        let indicators = [
            (Complexity::Low, &self.vocabulary.low_complexity),
            (Complexity::Medium, &self.vocabulary.medium_complexity),
            (Complexity::High, &self.vocabulary.high_complexity),
        ];
        if let Some((level, _)) = indicators
            .iter()
            .find(|(_, words)| contains_any(&lower, words))
        {
            return *level;
        }

        match text.chars().count() {
            n if n < LOW_COMPLEXITY_CHARS => Complexity::Low,
            n if n < MEDIUM_COMPLEXITY_CHARS => Complexity::Medium,
            _ => Complexity::High,
        }
    }

    /// First five non-stop-word tokens longer than two characters.
    pub fn keywords(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        let cleaned = NON_WORD.replace_all(&lower, "");
        cleaned
            .split_whitespace()
            .filter(|word| word.chars().count() >= MIN_KEYWORD_CHARS)
            .filter(|word| !self.vocabulary.stop_words.iter().any(|s| s.as_str() == *word))
            .take(MAX_KEYWORDS)
            .map(str::to_string)
            .collect()
    }

    /// Whether the text states a deadline.
    pub fn mentions_deadline(&self, text: &str) -> bool {
        contains_any(&text.to_lowercase(), &self.vocabulary.deadline_markers)
    }

    /// Hints for making the description more useful.
    pub fn suggestions(&self, text: &str) -> Vec<String> {
        let length = text.chars().count();
        let mut suggestions = Vec::new();

        if length < BRIEF_DESCRIPTION_CHARS {
            suggestions.push(
                "Consider adding more details to better understand the task scope".to_string(),
            );
        }

        if !self.mentions_deadline(text) {
            suggestions.push("Consider adding a deadline or target completion date".to_string());
        }

        if length > LONG_DESCRIPTION_CHARS {
            suggestions
                .push("Consider breaking this into smaller, more manageable sub-tasks".to_string());
        }

        if !contains_any(&text.to_lowercase(), &self.vocabulary.action_verbs) {
            suggestions.push(
                "Consider starting with an action verb (create, build, fix, etc.) for clarity"
                    .to_string(),
            );
        }

        suggestions
    }
}
