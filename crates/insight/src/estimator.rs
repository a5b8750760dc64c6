//! Completion time estimation.

use std::sync::Arc;

use crate::vocabulary::{contains_any, Vocabulary};

const MIN_MINUTES: f64 = 30.0;
const MINUTES_PER_WORD: f64 = 5.0;

/// Word-count based time estimator.
#[derive(Debug, Clone)]
pub struct TimeEstimator {
    vocabulary: Arc<Vocabulary>,
}

impl Default for TimeEstimator {
    fn default() -> Self {
        Self::new(Arc::new(Vocabulary::default()))
    }
}

impl TimeEstimator {
    /// Create an estimator over the given tables.
    pub fn new(vocabulary: Arc<Vocabulary>) -> Self {
        Self { vocabulary }
    }

    /// Estimated minutes: five per word with a 30 minute floor, halved for
    /// quick wording and doubled for long wording.
    ///
    /// An empty description counts as zero words.
    pub fn estimate_minutes(&self, text: &str) -> u64 {
        let lower = text.to_lowercase();
        let words = text.split_whitespace().count() as f64;

        let mut minutes = (words * MINUTES_PER_WORD).max(MIN_MINUTES);
        if contains_any(&lower, &self.vocabulary.quick_indicators) {
            minutes *= 0.5;
        }
        if contains_any(&lower, &self.vocabulary.long_indicators) {
            minutes *= 2.0;
        }
        minutes.round() as u64
    }

    /// Estimate formatted as `"<n> minutes"`.
    pub fn estimate(&self, text: &str) -> String {
        format!("{} minutes", self.estimate_minutes(text))
    }
}
