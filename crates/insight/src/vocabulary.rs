//! Keyword tables driving the classifier.
//!
//! The tables are plain data: a [`Vocabulary`] can be serialized, diffed and
//! replaced from configuration without touching the classification code.
//! All entries are matched against lowercased text, so they are stored
//! lowercase (see [`Vocabulary::normalize`]).

use serde::{Deserialize, Serialize};

/// Current revision of the built-in tables.
pub const VOCABULARY_VERSION: u32 = 1;

const POSITIVE_WORDS: &[&str] = &["easy", "simple", "fun", "exciting", "quick", "straightforward"];
const NEGATIVE_WORDS: &[&str] = &["difficult", "complex", "urgent", "critical", "challenging", "hard"];

const HIGH_PRIORITY: &[&str] = &["urgent", "critical", "asap", "emergency", "deadline"];
const LOW_PRIORITY: &[&str] = &["someday", "maybe", "eventually", "nice to have"];

const CATEGORIES: &[(Category, &[&str])] = &[
    (Category::Development, &["code", "programming", "development", "bug", "feature", "api"]),
    (Category::Design, &["design", "ui", "ux", "mockup", "wireframe", "prototype"]),
    (Category::Meeting, &["meeting", "call", "discussion", "standup", "review"]),
    (Category::Documentation, &["documentation", "docs", "readme", "guide", "manual"]),
    (Category::Testing, &["test", "testing", "qa", "quality", "validation"]),
    (Category::Deployment, &["deploy", "deployment", "release", "publish", "production"]),
];

const LOW_COMPLEXITY: &[&str] = &["simple", "easy", "quick", "basic"];
const MEDIUM_COMPLEXITY: &[&str] = &["moderate", "standard", "normal"];
const HIGH_COMPLEXITY: &[&str] = &[
    "complex", "difficult", "advanced", "comprehensive", "integration", "critical",
];

const QUICK_INDICATORS: &[&str] = &["quick", "simple", "easy", "small"];
const LONG_INDICATORS: &[&str] = &["complex", "difficult", "large", "comprehensive"];

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "is", "are", "was", "were",
];

const DEADLINE_MARKERS: &[&str] = &["deadline", "due"];
const ACTION_VERBS: &[&str] = &["create", "build", "design", "implement", "fix", "update", "review"];

/// Task category. Closed set; `General` is the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Code, bugs, features
    Development,
    /// UI/UX work
    Design,
    /// Calls, reviews, standups
    Meeting,
    /// Docs and guides
    Documentation,
    /// QA and validation
    Testing,
    /// Releases and rollouts
    Deployment,
    /// Anything else
    General,
}

impl Category {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Development => "development",
            Category::Design => "design",
            Category::Meeting => "meeting",
            Category::Documentation => "documentation",
            Category::Testing => "testing",
            Category::Deployment => "deployment",
            Category::General => "general",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keywords that select one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryKeywords {
    /// Category selected on match
    pub category: Category,
    /// Substrings that trigger it
    pub keywords: Vec<String>,
}

/// Every keyword table used by the classifier and the time estimator.
///
/// `categories` is ordered: the first entry with a match wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    /// Table revision
    pub version: u32,
    /// Tokens that raise sentiment
    pub positive_words: Vec<String>,
    /// Tokens that lower sentiment
    pub negative_words: Vec<String>,
    /// Substrings forcing high priority
    pub high_priority: Vec<String>,
    /// Substrings suggesting low priority
    pub low_priority: Vec<String>,
    /// Ordered category table
    pub categories: Vec<CategoryKeywords>,
    /// Low complexity indicators
    pub low_complexity: Vec<String>,
    /// Medium complexity indicators
    pub medium_complexity: Vec<String>,
    /// High complexity indicators
    pub high_complexity: Vec<String>,
    /// Indicators that halve the time estimate
    pub quick_indicators: Vec<String>,
    /// Indicators that double the time estimate
    pub long_indicators: Vec<String>,
    /// Tokens dropped from keyword extraction
    pub stop_words: Vec<String>,
    /// Substrings that count as a stated deadline
    pub deadline_markers: Vec<String>,
    /// Verbs that make a description actionable
    pub action_verbs: Vec<String>,
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            version: VOCABULARY_VERSION,
            positive_words: owned(POSITIVE_WORDS),
            negative_words: owned(NEGATIVE_WORDS),
            high_priority: owned(HIGH_PRIORITY),
            low_priority: owned(LOW_PRIORITY),
            categories: CATEGORIES
                .iter()
                .map(|(category, keywords)| CategoryKeywords {
                    category: *category,
                    keywords: owned(keywords),
                })
                .collect(),
            low_complexity: owned(LOW_COMPLEXITY),
            medium_complexity: owned(MEDIUM_COMPLEXITY),
            high_complexity: owned(HIGH_COMPLEXITY),
            quick_indicators: owned(QUICK_INDICATORS),
            long_indicators: owned(LONG_INDICATORS),
            stop_words: owned(STOP_WORDS),
            deadline_markers: owned(DEADLINE_MARKERS),
            action_verbs: owned(ACTION_VERBS),
        }
    }
}

impl Vocabulary {
    /// Lowercase and trim every entry, dropping blanks.
    pub fn normalize(&mut self) {
        let lists = [
            &mut self.positive_words,
            &mut self.negative_words,
            &mut self.high_priority,
            &mut self.low_priority,
            &mut self.low_complexity,
            &mut self.medium_complexity,
            &mut self.high_complexity,
            &mut self.quick_indicators,
            &mut self.long_indicators,
            &mut self.stop_words,
            &mut self.deadline_markers,
            &mut self.action_verbs,
        ];
        for list in lists {
            normalize_list(list);
        }
        for entry in &mut self.categories {
            normalize_list(&mut entry.keywords);
        }
    }
}

fn normalize_list(list: &mut Vec<String>) {
    *list = list
        .iter()
        .map(|w| w.trim().to_lowercase())
        .filter(|w| !w.is_empty())
        .collect();
}

/// Whether `lower` contains any of `words` as a substring.
pub(crate) fn contains_any(lower: &str, words: &[String]) -> bool {
    words.iter().any(|w| lower.contains(w.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_category_order() {
        let order: Vec<_> = Vocabulary::default()
            .categories
            .iter()
            .map(|c| c.category)
            .collect();
        assert_eq!(
            order,
            vec![
                Category::Development,
                Category::Design,
                Category::Meeting,
                Category::Documentation,
                Category::Testing,
                Category::Deployment,
            ]
        );
    }

    #[test]
    fn test_default_tables_are_normalized() {
        let vocab = Vocabulary::default();
        let mut normalized = vocab.clone();
        normalized.normalize();
        assert_eq!(vocab, normalized);
    }

    #[test]
    fn test_normalize_lowercases_and_drops_blanks() {
        let mut vocab = Vocabulary {
            action_verbs: vec![" Ship ".to_string(), "".to_string()],
            ..Default::default()
        };
        vocab.normalize();
        assert_eq!(vocab.action_verbs, vec!["ship"]);
    }

    #[test]
    fn test_category_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Category::Documentation).unwrap(),
            "\"documentation\""
        );
        assert_eq!(Category::General.to_string(), "general");
    }

    #[test]
    fn test_partial_vocabulary_falls_back_to_defaults() {
        let vocab: Vocabulary = serde_json::from_str(r#"{"stop_words": ["todo"]}"#).unwrap();
        assert_eq!(vocab.stop_words, vec!["todo"]);
        assert_eq!(vocab.categories.len(), 6);
    }
}
