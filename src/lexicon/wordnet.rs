//! WordNet Corpus
//!
//! Reads a Princeton WordNet 3.x `dict/` directory: `index.<pos>` maps lemmas
//! to synset offsets in sense order, `data.<pos>` holds the synsets at those
//! byte offsets, `<pos>.exc` lists irregular inflections. Everything is read
//! into memory when the corpus is opened.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use super::morphy::base_forms;
use super::{HeuristicTagger, LexicalCorpus, PartOfSpeech, StopWords};
use crate::error::{MetamorphError, Result};

/// Lemma index and synset data for one part of speech.
#[derive(Debug, Default)]
struct PosTable {
    index: HashMap<String, Vec<usize>>,
    data: String,
    exceptions: HashMap<String, Vec<String>>,
}

impl PosTable {
    /// Word forms of the synset at `offset`, adjective markers stripped.
    fn synset_words(&self, offset: usize) -> Option<Vec<String>> {
        let line = self.data.get(offset..)?.lines().next()?;
        let mut fields = line.split_whitespace();
        let _offset = fields.next()?;
        let _lex_filenum = fields.next()?;
        let _ss_type = fields.next()?;
        let w_cnt = usize::from_str_radix(fields.next()?, 16).ok()?;

        let mut words = Vec::with_capacity(w_cnt);
        for _ in 0..w_cnt {
            let word = fields.next()?;
            let _lex_id = fields.next()?;
            words.push(strip_marker(word).to_string());
        }
        Some(words)
    }
}

/// `good(a)` -> `good`; syntactic markers only occur on adjectives.
fn strip_marker(word: &str) -> &str {
    match word.find('(') {
        Some(i) if word.ends_with(')') => &word[..i],
        _ => word,
    }
}

pub struct WordNetCorpus {
    tables: HashMap<PartOfSpeech, PosTable>,
    stop_words: StopWords,
}

impl WordNetCorpus {
    /// Load the database under `root`. Index and data files are required for
    /// all four categories; exception lists are optional.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(MetamorphError::Corpus {
                path: root,
                detail: "not a directory; point METAMORPH_WORDNET_DIR at a WordNet dict/".to_string(),
            });
        }

        let mut tables = HashMap::new();
        for pos in PartOfSpeech::CONTENT {
            let table = load_table(&root, pos)?;
            debug!("Loaded {} {} lemmas", table.index.len(), pos);
            tables.insert(pos, table);
        }

        info!("WordNet loaded from {}", root.display());
        Ok(Self {
            tables,
            stop_words: StopWords::english(),
        })
    }

    pub fn with_stop_words(mut self, stop_words: StopWords) -> Self {
        self.stop_words = stop_words;
        self
    }

    fn lemma_known(&self, pos: PartOfSpeech, lemma: &str) -> bool {
        self.tables
            .get(&pos)
            .is_some_and(|t| t.index.contains_key(lemma))
    }

    /// Content categories `word` (or a base form of it) is listed under,
    /// most senses first.
    fn known_parts(&self, word: &str) -> Vec<PartOfSpeech> {
        let mut parts: Vec<(PartOfSpeech, usize)> = PartOfSpeech::CONTENT
            .iter()
            .filter_map(|&pos| {
                let table = self.tables.get(&pos)?;
                let count: usize = base_forms(word, pos, &table.exceptions, |f| {
                    table.index.contains_key(f)
                })
                .iter()
                .filter_map(|f| table.index.get(f))
                .map(Vec::len)
                .sum();
                (count > 0).then_some((pos, count))
            })
            .collect();
        // Stable sort keeps CONTENT order on ties.
        parts.sort_by(|a, b| b.1.cmp(&a.1));
        parts.into_iter().map(|(pos, _)| pos).collect()
    }
}

impl LexicalCorpus for WordNetCorpus {
    fn tag(&self, tokens: &[String]) -> Vec<PartOfSpeech> {
        HeuristicTagger::new(|w: &str| self.known_parts(w)).tag(tokens)
    }

    fn senses(&self, word: &str, pos: PartOfSpeech) -> Vec<Vec<String>> {
        let Some(table) = self.tables.get(&pos) else {
            return Vec::new();
        };
        let lower = word.to_lowercase();
        let forms = base_forms(&lower, pos, &table.exceptions, |f| self.lemma_known(pos, f));

        let mut seen = HashSet::new();
        let mut groups = Vec::new();
        for form in forms {
            for &offset in table.index.get(&form).into_iter().flatten() {
                if !seen.insert(offset) {
                    continue;
                }
                if let Some(words) = table.synset_words(offset) {
                    groups.push(words);
                }
            }
        }
        groups
    }

    fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }
}

fn load_table(root: &Path, pos: PartOfSpeech) -> Result<PosTable> {
    let suffix = pos.wordnet_suffix().ok_or_else(|| MetamorphError::Corpus {
        path: root.to_path_buf(),
        detail: format!("no WordNet files for {pos}"),
    })?;

    let index_path = root.join(format!("index.{suffix}"));
    let data_path = root.join(format!("data.{suffix}"));
    let exc_path = root.join(format!("{suffix}.exc"));

    let index_text = read(&index_path)?;
    let index = parse_index(&index_text).map_err(|detail| MetamorphError::Corpus {
        path: index_path.clone(),
        detail,
    })?;
    let data = read(&data_path)?;
    let exceptions = if exc_path.exists() {
        parse_exceptions(&read(&exc_path)?)
    } else {
        HashMap::new()
    };

    Ok(PosTable {
        index,
        data,
        exceptions,
    })
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| MetamorphError::Corpus {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

/// `lemma pos synset_cnt p_cnt [ptr...] sense_cnt tagsense_cnt offset...`
fn parse_index(text: &str) -> std::result::Result<HashMap<String, Vec<usize>>, String> {
    let mut index = HashMap::new();
    for (n, line) in text.lines().enumerate() {
        // License header lines start with two spaces.
        if line.starts_with(' ') || line.trim().is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split_whitespace().collect();
        let bad = || format!("malformed index line {}", n + 1);
        if fields.len() < 4 {
            return Err(bad());
        }
        let synset_cnt: usize = fields[2].parse().map_err(|_| bad())?;
        if fields.len() < synset_cnt + 4 {
            return Err(bad());
        }
        let offsets = fields[fields.len() - synset_cnt..]
            .iter()
            .map(|f| f.parse::<usize>().map_err(|_| bad()))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        index.insert(fields[0].to_string(), offsets);
    }
    Ok(index)
}

/// `inflected base [base...]`
fn parse_exceptions(text: &str) -> HashMap<String, Vec<String>> {
    text.lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let form = fields.next()?;
            let bases: Vec<String> = fields.map(str::to_string).collect();
            (!bases.is_empty()).then(|| (form.to_string(), bases))
        })
        .collect()
}
