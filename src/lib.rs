//! Metamorphic Testing for Web-Hosted Sentiment Classifiers
//!
//! Checks that a black-box sentiment classifier, reachable only through its
//! web page, gives the same label to a sentence and to a copy of it with one
//! word swapped for a synonym.
//!
//! - `transform`: single-word synonym substitution over a lexical corpus
//! - `oracle`: drives the classifier page through a browser session
//! - `relation`: compares the two labels
//! - `orchestrator`: sequences a run and owns the browser session

pub mod browser;
pub mod config;
pub mod error;
pub mod lexicon;
pub mod oracle;
pub mod orchestrator;
pub mod relation;
pub mod transform;
pub mod utils;

// Re-exports for convenience
pub use config::MetamorphConfig;
pub use error::{MetamorphError, Result};
pub use oracle::{SentimentLabel, SentimentOracle};
pub use orchestrator::{Orchestrator, RunReport};
pub use relation::{RelationChecker, RelationOutcome, UnknownPolicy};
pub use transform::{SynonymReplacement, Text, Transformation};
