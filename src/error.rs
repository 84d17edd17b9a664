//! Error Types
//!
//! One error enum for the whole pipeline. Local misses (a locator that does
//! not match this pass, a results condition that never appears) are absorbed
//! where a fallback exists; only exhaustion of every alternative surfaces here.

use std::path::PathBuf;
use std::time::Duration;

use crate::browser::Locator;

/// Failure modes of a metamorphic run.
#[derive(Debug, thiserror::Error)]
pub enum MetamorphError {
    /// The locator resolver polled every candidate until its deadline without a visible match.
    #[error("No visible element matched any of [{}] within {timeout:?}", join_locators(.locators))]
    NoMatchingElement {
        /// Candidates that were tried, in priority order.
        locators: Vec<Locator>,
        /// The deadline that elapsed.
        timeout: Duration,
    },

    /// The target page could not be loaded or its input surface could not be located.
    #[error("Oracle unavailable at {url}: {reason}")]
    OracleUnavailable {
        /// Page the oracle was driving.
        url: String,
        /// What went wrong.
        reason: String,
    },

    /// A bounded wait elapsed before its condition held.
    #[error("Timed out after {timeout:?} waiting for {what}")]
    Timeout {
        /// Human-readable description of the awaited condition.
        what: String,
        /// The deadline that elapsed.
        timeout: Duration,
    },

    /// The WebDriver endpoint answered a command with an error payload.
    #[error("WebDriver command {command} failed ({error}): {message}")]
    WebDriver {
        /// Command that failed, e.g. `POST /element`.
        command: String,
        /// W3C error code, e.g. `no such element`.
        error: String,
        /// Driver-supplied message.
        message: String,
    },

    /// The WebDriver endpoint could not be reached or returned an unreadable body.
    #[error("WebDriver transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Lexical data was missing or malformed.
    #[error("Lexical corpus error at {path}: {detail}")]
    Corpus {
        /// File or directory being read.
        path: PathBuf,
        /// Nature of the problem.
        detail: String,
    },

    /// Configuration was rejected.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Filesystem error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn join_locators(locators: &[Locator]) -> String {
    locators
        .iter()
        .map(|l| l.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MetamorphError>;
