//! Sentiment labels and extraction from rendered page content.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

lazy_static! {
    static ref LABEL_PATTERN: Regex =
        Regex::new(r"(?i)\b(positive|negative|neutral)\b").expect("label pattern compiles");
}

/// The three category names as they appear on the results page.
pub const CATEGORY_NAMES: [&str; 3] = ["Positive", "Negative", "Neutral"];

/// Normalized classifier output. `Unknown` marks an extraction failure, never
/// a real classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
    Unknown,
}

impl SentimentLabel {
    pub fn is_unknown(&self) -> bool {
        matches!(self, SentimentLabel::Unknown)
    }

    /// Case-insensitive parse of a bare category name.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "positive" => SentimentLabel::Positive,
            "negative" => SentimentLabel::Negative,
            "neutral" => SentimentLabel::Neutral,
            _ => SentimentLabel::Unknown,
        }
    }

    /// First whole-word category name in `haystack`, or `Unknown`.
    pub fn extract(haystack: &str) -> Self {
        LABEL_PATTERN
            .captures(haystack)
            .and_then(|c| c.get(1))
            .map(|m| Self::from_name(m.as_str()))
            .unwrap_or(SentimentLabel::Unknown)
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "Positive"),
            SentimentLabel::Negative => write!(f, "Negative"),
            SentimentLabel::Neutral => write!(f, "Neutral"),
            SentimentLabel::Unknown => write!(f, "Unknown"),
        }
    }
}
