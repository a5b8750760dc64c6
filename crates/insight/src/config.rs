//! Engine configuration: score weights and keyword tables.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::vocabulary::{Category, Vocabulary};

/// Errors raised while loading or validating an [`InsightConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for this schema
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Values decode but break an invariant
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Policy constants of the productivity score.
///
/// The defaults are the historical tuning; they have no deeper derivation
/// and are exposed so deployments can adjust them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Weight of the overall completion fraction
    pub completion: f64,
    /// Weight of the high-priority completion fraction
    pub high_priority: f64,
    /// Weight of the recently-completed fraction
    pub recency: f64,
    /// Age in days under which a completed task counts as recent
    pub recency_window_days: i64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            completion: 0.6,
            high_priority: 0.3,
            recency: 0.2,
            recency_window_days: 7,
        }
    }
}

/// Full engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    /// Productivity score weights
    pub weights: ScoreWeights,
    /// Keyword tables
    pub vocabulary: Vocabulary,
}

impl InsightConfig {
    /// Parse, normalize and validate a JSON document. Missing fields take
    /// their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let mut config: InsightConfig = serde_json::from_str(json)?;
        config.vocabulary.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    /// Check weights and the category table.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.weights;
        for (name, value) in [
            ("completion", w.completion),
            ("high_priority", w.high_priority),
            ("recency", w.recency),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "weight '{}' must be a non-negative number, got {}",
                    name, value
                )));
            }
        }
        if w.recency_window_days < 0 {
            return Err(ConfigError::Invalid(format!(
                "recency_window_days must not be negative, got {}",
                w.recency_window_days
            )));
        }

        let mut seen = Vec::new();
        for entry in &self.vocabulary.categories {
            if entry.category == Category::General {
                return Err(ConfigError::Invalid(
                    "'general' is the fallback category and cannot have keywords".to_string(),
                ));
            }
            if seen.contains(&entry.category) {
                return Err(ConfigError::Invalid(format!(
                    "category '{}' listed more than once",
                    entry.category
                )));
            }
            seen.push(entry.category);
        }

        Ok(())
    }
}
