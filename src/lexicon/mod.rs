//! Lexical Corpus Module
//!
//! Part-of-speech tagging, sense lookup and stop words. The corpus is built
//! once by the caller and handed to the transformation engine; nothing here
//! is process-global.

mod memory;
mod morphy;
mod stopwords;
mod tagger;
mod wordnet;

pub use memory::InMemoryCorpus;
pub use stopwords::StopWords;
pub use tagger::HeuristicTagger;
pub use wordnet::WordNetCorpus;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Coarse grammatical category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartOfSpeech {
    Adjective,
    Verb,
    Noun,
    Adverb,
    Other,
}

impl PartOfSpeech {
    /// Categories that carry substitutable lexical content.
    pub const CONTENT: [PartOfSpeech; 4] = [
        PartOfSpeech::Noun,
        PartOfSpeech::Verb,
        PartOfSpeech::Adjective,
        PartOfSpeech::Adverb,
    ];

    pub fn is_content(&self) -> bool {
        !matches!(self, PartOfSpeech::Other)
    }

    /// Suffix of the WordNet database files for this category.
    pub fn wordnet_suffix(&self) -> Option<&'static str> {
        match self {
            PartOfSpeech::Noun => Some("noun"),
            PartOfSpeech::Verb => Some("verb"),
            PartOfSpeech::Adjective => Some("adj"),
            PartOfSpeech::Adverb => Some("adv"),
            PartOfSpeech::Other => None,
        }
    }
}

impl fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PartOfSpeech::Adjective => write!(f, "adjective"),
            PartOfSpeech::Verb => write!(f, "verb"),
            PartOfSpeech::Noun => write!(f, "noun"),
            PartOfSpeech::Adverb => write!(f, "adverb"),
            PartOfSpeech::Other => write!(f, "other"),
        }
    }
}

/// Lexical data the transformation engine consumes.
///
/// Implementations are fully loaded before the first call, so lookups are
/// infallible.
pub trait LexicalCorpus: Send + Sync {
    /// One tag per token, same length and order as `tokens`.
    fn tag(&self, tokens: &[String]) -> Vec<PartOfSpeech>;

    /// Sense groups of `word` under `pos`, most common sense first. Each group
    /// lists the word forms of that sense in corpus order.
    fn senses(&self, word: &str, pos: PartOfSpeech) -> Vec<Vec<String>>;

    /// Case-insensitive stop-word membership.
    fn is_stop_word(&self, word: &str) -> bool;
}

impl<C: LexicalCorpus + ?Sized> LexicalCorpus for Arc<C> {
    fn tag(&self, tokens: &[String]) -> Vec<PartOfSpeech> {
        (**self).tag(tokens)
    }

    fn senses(&self, word: &str, pos: PartOfSpeech) -> Vec<Vec<String>> {
        (**self).senses(word, pos)
    }

    fn is_stop_word(&self, word: &str) -> bool {
        (**self).is_stop_word(word)
    }
}
