//! Topic labeling capability.
//!
//! The pipeline only depends on `classify(title) -> label`; the labeling
//! algorithm behind it is swappable. The shipped baseline is a
//! deterministic keyword-bucket classifier over the cleaned title, which
//! keeps runs reproducible with no model state.

use anyhow::{anyhow, Result};
use regex::Regex;

pub trait TopicClassifier {
    /// Assign a topic label to a title, or `None` when no bucket matches.
    fn classify(&self, title: &str) -> Option<String>;
}

/// Baseline classifier: first keyword bucket whose terms appear in the
/// lowercased, punctuation-stripped title wins. Bucket order is fixed, so
/// labeling is deterministic.
pub struct KeywordClassifier {
    cleaner: Regex,
    buckets: Vec<(String, Vec<String>)>,
}

impl KeywordClassifier {
    pub fn new(buckets: Vec<(String, Vec<String>)>) -> Result<Self> {
        Ok(Self {
            cleaner: Regex::new(r"[^\w\s]").map_err(|e| anyhow!("invalid cleaner pattern: {e}"))?,
            buckets,
        })
    }

    pub fn with_default_buckets() -> Result<Self> {
        let buckets = [
            ("music", vec!["mv", "official audio", "live", "cover", "playlist"]),
            ("gaming", vec!["gameplay", "speedrun", "walkthrough", "ranked"]),
            ("news", vec!["news", "breaking", "briefing"]),
            ("education", vec!["tutorial", "lecture", "explained", "how to"]),
            ("sports", vec!["highlights", "vs", "match", "full game"]),
            ("food", vec!["recipe", "cooking", "mukbang", "asmr"]),
        ];
        Self::new(
            buckets
                .into_iter()
                .map(|(label, terms)| {
                    (
                        label.to_string(),
                        terms.into_iter().map(str::to_string).collect(),
                    )
                })
                .collect(),
        )
    }

    fn clean(&self, title: &str) -> String {
        self.cleaner.replace_all(title, "").to_lowercase()
    }
}

impl TopicClassifier for KeywordClassifier {
    fn classify(&self, title: &str) -> Option<String> {
        let cleaned = self.clean(title);
        self.buckets
            .iter()
            .find(|(_, terms)| terms.iter().any(|term| cleaned.contains(term.as_str())))
            .map(|(label, _)| label.clone())
    }
}
