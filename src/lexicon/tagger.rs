//! Part-of-speech tagger
//!
//! Deterministic, lexicon-driven tagging: closed-class word lists first, then
//! the categories the lexicon knows a word under, disambiguated by the
//! previous and next token, then suffix rules for unknown words.

use super::PartOfSpeech;

const SUBJECT_PRONOUNS: &[&str] = &["i", "you", "we", "they", "he", "she", "it", "who"];

const DETERMINERS: &[&str] = &[
    "a", "an", "the", "this", "that", "these", "those", "my", "your", "his", "her", "its", "our",
    "their", "some", "any", "no", "every", "each", "another", "such",
];

/// Words after which a bare form is read as a verb.
const VERB_TRIGGERS: &[&str] = &[
    "to", "will", "would", "can", "could", "shall", "should", "may", "might", "must", "do",
    "does", "did", "don't", "doesn't", "didn't", "won't", "can't", "cannot", "not", "never",
];

const AUXILIARIES: &[&str] = &[
    "is", "am", "are", "was", "were", "be", "been", "being", "has", "have", "had", "having",
    "isn't", "aren't", "wasn't", "weren't", "seem", "seems", "seemed", "feel", "feels", "felt",
    "look", "looks", "looked",
];

/// Degree adverbs that precede adjectives.
const INTENSIFIERS: &[&str] = &[
    "very", "so", "too", "really", "quite", "extremely", "pretty", "rather", "fairly", "truly",
    "absolutely", "totally",
];

const FUNCTION_WORDS: &[&str] = &[
    "me", "him", "us", "them", "mine", "yours", "ours", "theirs", "myself", "yourself", "and",
    "or", "but", "nor", "of", "in", "on", "at", "for", "with", "by", "from", "about", "as",
    "into", "onto", "than", "if", "because", "while", "though", "although", "until", "over",
    "under", "between", "through", "during", "before", "after", "without", "within", "what",
    "which", "whom", "whose", "where", "when", "why", "how", "there", "here", "all", "both",
];

const ADVERB_SUFFIXES: &[&str] = &["ly"];
const VERB_SUFFIXES: &[&str] = &["ing", "ed", "ize", "ise", "ify"];
const ADJECTIVE_SUFFIXES: &[&str] = &["ous", "ful", "ive", "able", "ible", "less", "ic", "al", "ish"];
const NOUN_SUFFIXES: &[&str] = &["tion", "sion", "ness", "ment", "ity", "ism", "ship", "hood"];

/// Tags a token sequence using a lexicon lookup.
///
/// `known` returns the content categories a lowercase word is listed under,
/// most frequent first. An empty list means the word is unknown.
pub struct HeuristicTagger<F> {
    known: F,
}

impl<F> HeuristicTagger<F>
where
    F: Fn(&str) -> Vec<PartOfSpeech>,
{
    pub fn new(known: F) -> Self {
        Self { known }
    }

    pub fn tag(&self, tokens: &[String]) -> Vec<PartOfSpeech> {
        let words: Vec<String> = tokens.iter().map(|t| normalize(t)).collect();
        let mut tags: Vec<PartOfSpeech> = Vec::with_capacity(words.len());

        for (i, word) in words.iter().enumerate() {
            let prev = i.checked_sub(1).map(|p| (words[p].as_str(), tags[p]));
            let next = words.get(i + 1).map(String::as_str);
            let capitalized = tokens[i].chars().next().is_some_and(char::is_uppercase);
            let tag = self.tag_word(word, prev, next, capitalized && i > 0);
            tags.push(tag);
        }
        tags
    }

    fn tag_word(
        &self,
        word: &str,
        prev: Option<(&str, PartOfSpeech)>,
        next: Option<&str>,
        mid_sentence_capital: bool,
    ) -> PartOfSpeech {
        if word.is_empty() || word.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
            return PartOfSpeech::Other;
        }
        if AUXILIARIES.contains(&word) {
            return PartOfSpeech::Verb;
        }
        if INTENSIFIERS.contains(&word) {
            return PartOfSpeech::Adverb;
        }
        if SUBJECT_PRONOUNS.contains(&word)
            || DETERMINERS.contains(&word)
            || VERB_TRIGGERS.contains(&word)
            || FUNCTION_WORDS.contains(&word)
        {
            return PartOfSpeech::Other;
        }

        let candidates: Vec<PartOfSpeech> = (self.known)(word)
            .into_iter()
            .filter(PartOfSpeech::is_content)
            .collect();

        match candidates.as_slice() {
            [] => {
                if mid_sentence_capital {
                    PartOfSpeech::Noun
                } else {
                    by_suffix(word).unwrap_or(PartOfSpeech::Noun)
                }
            }
            [only] => *only,
            _ => self.disambiguate(word, &candidates, prev, next),
        }
    }

    fn disambiguate(
        &self,
        word: &str,
        candidates: &[PartOfSpeech],
        prev: Option<(&str, PartOfSpeech)>,
        next: Option<&str>,
    ) -> PartOfSpeech {
        let has = |pos: PartOfSpeech| candidates.contains(&pos);

        if let Some((prev_word, prev_tag)) = prev {
            if (SUBJECT_PRONOUNS.contains(&prev_word) || VERB_TRIGGERS.contains(&prev_word))
                && has(PartOfSpeech::Verb)
            {
                return PartOfSpeech::Verb;
            }
            if INTENSIFIERS.contains(&prev_word) {
                if has(PartOfSpeech::Adjective) {
                    return PartOfSpeech::Adjective;
                }
                if has(PartOfSpeech::Adverb) {
                    return PartOfSpeech::Adverb;
                }
            }
            if DETERMINERS.contains(&prev_word) || prev_tag == PartOfSpeech::Adjective {
                let next_is_noun = next
                    .map(|n| (self.known)(n).contains(&PartOfSpeech::Noun))
                    .unwrap_or(false);
                if next_is_noun && has(PartOfSpeech::Adjective) {
                    return PartOfSpeech::Adjective;
                }
                if has(PartOfSpeech::Noun) {
                    return PartOfSpeech::Noun;
                }
            }
            if AUXILIARIES.contains(&prev_word) && has(PartOfSpeech::Adjective) {
                return PartOfSpeech::Adjective;
            }
            if prev_tag == PartOfSpeech::Verb && has(PartOfSpeech::Noun) {
                return PartOfSpeech::Noun;
            }
        }

        if let Some(pos) = by_suffix(word).filter(|p| has(*p)) {
            return pos;
        }
        candidates[0]
    }
}

/// Lowercase with surrounding punctuation removed (apostrophes kept).
fn normalize(token: &str) -> String {
    token
        .trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
        .to_lowercase()
}

fn by_suffix(word: &str) -> Option<PartOfSpeech> {
    let ends = |suffixes: &[&str]| suffixes.iter().any(|s| word.len() > s.len() + 2 && word.ends_with(s));
    if ends(ADVERB_SUFFIXES) {
        Some(PartOfSpeech::Adverb)
    } else if ends(NOUN_SUFFIXES) {
        Some(PartOfSpeech::Noun)
    } else if ends(VERB_SUFFIXES) {
        Some(PartOfSpeech::Verb)
    } else if ends(ADJECTIVE_SUFFIXES) {
        Some(PartOfSpeech::Adjective)
    } else {
        None
    }
}
