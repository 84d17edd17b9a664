//! Metamorphic Relation Checker
//!
//! Synonym substitution must not change the predicted sentiment class.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MetamorphError;
use crate::oracle::SentimentLabel;

/// Result of comparing the two oracle outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationOutcome {
    Satisfied,
    Violated,
}

impl fmt::Display for RelationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationOutcome::Satisfied => write!(f, "MR Satisfied"),
            RelationOutcome::Violated => write!(f, "MR Violated"),
        }
    }
}

/// How a pair of `Unknown` labels is judged.
///
/// `Equality` is plain label equality, so (Unknown, Unknown) is Satisfied even
/// though neither call produced information. `UnknownViolates` treats any
/// Unknown as a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownPolicy {
    #[default]
    Equality,
    UnknownViolates,
}

impl FromStr for UnknownPolicy {
    type Err = MetamorphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "equality" => Ok(UnknownPolicy::Equality),
            "unknown_violates" | "strict" => Ok(UnknownPolicy::UnknownViolates),
            other => Err(MetamorphError::Config(format!("unknown policy '{other}'"))),
        }
    }
}

/// Compares labels for an original and a transformed input.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelationChecker {
    policy: UnknownPolicy,
}

impl RelationChecker {
    pub fn new(policy: UnknownPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> UnknownPolicy {
        self.policy
    }

    pub fn check(&self, original: SentimentLabel, transformed: SentimentLabel) -> RelationOutcome {
        let unknown = original.is_unknown() || transformed.is_unknown();
        if unknown && self.policy == UnknownPolicy::UnknownViolates {
            return RelationOutcome::Violated;
        }
        if original == transformed {
            RelationOutcome::Satisfied
        } else {
            RelationOutcome::Violated
        }
    }
}
