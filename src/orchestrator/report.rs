//! Run report and its operator-facing renderings.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::oracle::SentimentLabel;
use crate::relation::{RelationOutcome, UnknownPolicy};
use crate::transform::{Text, Transformation};

/// Everything one metamorphic check produced.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub original: Text,
    pub original_label: SentimentLabel,
    pub transformation: Transformation,
    pub transformed_label: SentimentLabel,
    pub outcome: RelationOutcome,
    pub unknown_policy: UnknownPolicy,
}

impl RunReport {
    pub fn transformed_text(&self) -> &Text {
        &self.transformation.text
    }

    /// No substitution happened, so the comparison carries no information.
    pub fn is_degenerate(&self) -> bool {
        self.transformation.is_identity()
    }

    /// Both labels are extraction failures.
    pub fn is_uninformative(&self) -> bool {
        self.original_label.is_unknown() && self.transformed_label.is_unknown()
    }

    pub fn verdict_line(&self) -> String {
        if self.is_degenerate() {
            format!("{} (degenerate: no transformation applied)", self.outcome)
        } else {
            self.outcome.to_string()
        }
    }

    /// The three report lines printed by the binary.
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Original:    {}  → {}", self.original, self.original_label),
            format!("Transformed: {}  → {}", self.transformed_text(), self.transformed_label),
            self.verdict_line(),
        ]
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
