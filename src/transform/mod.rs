//! Transformation Engine
//!
//! Produces a semantically equivalent variant of a sentence by replacing one
//! content word with a synonym of the same part of speech.
//!
//! Selection is deliberately simple: the first eligible token, its most
//! common sense that offers any other word form, and that sense's first such
//! form. Sense groups can contain weak or context-inappropriate members, so
//! the chosen synonym is sometimes a poor fit for the sentence.

mod text;

pub use text::Text;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::lexicon::{LexicalCorpus, PartOfSpeech};

/// The single edit a transformation made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitution {
    pub position: usize,
    pub original: String,
    pub replacement: String,
    pub pos: PartOfSpeech,
    /// Index of the sense group the replacement came from.
    pub sense: usize,
}

/// Output of [`SynonymReplacement::transform`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transformation {
    pub text: Text,
    /// `None` when no token admitted a synonym and `text` equals the input.
    pub substitution: Option<Substitution>,
}

impl Transformation {
    pub fn is_identity(&self) -> bool {
        self.substitution.is_none()
    }
}

/// Single-word synonym substitution over an injected corpus.
pub struct SynonymReplacement<C> {
    corpus: C,
}

impl<C: LexicalCorpus> SynonymReplacement<C> {
    pub fn new(corpus: C) -> Self {
        Self { corpus }
    }

    /// Replace the first substitutable token, or return the input unchanged.
    pub fn transform(&self, text: &Text) -> Transformation {
        let tokens = text.tokens();
        let tags = self.corpus.tag(tokens);

        for (position, (token, &pos)) in tokens.iter().zip(&tags).enumerate() {
            if self.corpus.is_stop_word(token) || !pos.is_content() {
                continue;
            }
            let Some((sense, replacement)) = self.first_alternate(token, pos) else {
                debug!("No alternate form for '{}' as {}", token, pos);
                continue;
            };

            info!("Substituting '{}' -> '{}' ({}, sense {})", token, replacement, pos, sense);
            return Transformation {
                text: text.with_token(position, replacement.clone()),
                substitution: Some(Substitution {
                    position,
                    original: token.clone(),
                    replacement,
                    pos,
                    sense,
                }),
            };
        }

        info!("No substitutable token in '{}'", text);
        Transformation {
            text: text.clone(),
            substitution: None,
        }
    }

    /// First form, in sense order, that differs from `word` ignoring case.
    fn first_alternate(&self, word: &str, pos: PartOfSpeech) -> Option<(usize, String)> {
        let source = word.to_lowercase();
        self.corpus
            .senses(word, pos)
            .into_iter()
            .enumerate()
            .find_map(|(i, group)| {
                group
                    .into_iter()
                    .find(|form| form.to_lowercase() != source)
                    .map(|form| (i, form))
            })
    }
}
