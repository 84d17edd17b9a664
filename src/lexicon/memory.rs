//! In-memory corpus assembled with a builder. Handy for tests and for
//! embedding a small fixed vocabulary.

use std::collections::HashMap;

use super::{HeuristicTagger, LexicalCorpus, PartOfSpeech, StopWords};

#[derive(Debug, Clone, Default)]
pub struct InMemoryCorpus {
    senses: HashMap<(String, PartOfSpeech), Vec<Vec<String>>>,
    /// Categories per lemma in registration order.
    parts: HashMap<String, Vec<PartOfSpeech>>,
    /// Explicit tags that bypass the heuristic tagger.
    tags: HashMap<String, PartOfSpeech>,
    stop_words: StopWords,
}

impl InMemoryCorpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register sense groups for `word` under `pos`, most common first.
    pub fn with_senses(mut self, word: &str, pos: PartOfSpeech, groups: &[&[&str]]) -> Self {
        let key = word.to_lowercase();
        let groups: Vec<Vec<String>> = groups
            .iter()
            .map(|g| g.iter().map(|w| w.to_string()).collect())
            .collect();
        self.senses
            .entry((key.clone(), pos))
            .or_default()
            .extend(groups);
        let parts = self.parts.entry(key).or_default();
        if !parts.contains(&pos) {
            parts.push(pos);
        }
        self
    }

    /// Force the tag of `word` regardless of context.
    pub fn with_tag(mut self, word: &str, pos: PartOfSpeech) -> Self {
        self.tags.insert(word.to_lowercase(), pos);
        self
    }

    pub fn with_stop_words(mut self, stop_words: StopWords) -> Self {
        self.stop_words = stop_words;
        self
    }
}

impl LexicalCorpus for InMemoryCorpus {
    fn tag(&self, tokens: &[String]) -> Vec<PartOfSpeech> {
        let tagger = HeuristicTagger::new(|w: &str| self.parts.get(w).cloned().unwrap_or_default());
        tagger
            .tag(tokens)
            .into_iter()
            .zip(tokens)
            .map(|(guess, token)| {
                self.tags
                    .get(&token.to_lowercase())
                    .copied()
                    .unwrap_or(guess)
            })
            .collect()
    }

    fn senses(&self, word: &str, pos: PartOfSpeech) -> Vec<Vec<String>> {
        self.senses
            .get(&(word.to_lowercase(), pos))
            .cloned()
            .unwrap_or_default()
    }

    fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }
}
