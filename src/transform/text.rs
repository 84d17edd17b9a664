//! Immutable whitespace-tokenized text.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// An ordered sequence of word tokens. Never mutated; edits produce a new value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Text {
    tokens: Vec<String>,
}

impl Text {
    /// Split on whitespace. Punctuation stays attached to its word.
    pub fn new(raw: &str) -> Self {
        Self {
            tokens: raw.split_whitespace().map(str::to_string).collect(),
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Copy of this text with the token at `index` replaced.
    pub fn with_token(&self, index: usize, replacement: impl Into<String>) -> Self {
        let mut tokens = self.tokens.clone();
        if let Some(slot) = tokens.get_mut(index) {
            *slot = replacement.into();
        }
        Self { tokens }
    }

    /// Positions at which `self` and `other` differ, for equal-length texts.
    pub fn differing_positions(&self, other: &Text) -> Vec<usize> {
        self.tokens
            .iter()
            .zip(&other.tokens)
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(|(i, _)| i)
            .collect()
    }
}

impl fmt::Display for Text {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens.join(" "))
    }
}

impl From<&str> for Text {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl Serialize for Text {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Text {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Text::new(&raw))
    }
}
