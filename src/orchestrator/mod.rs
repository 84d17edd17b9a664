//! Orchestrator
//!
//! Runs one metamorphic check: transform the input, classify the original,
//! classify the variant, compare. Owns the browser session for the whole run
//! and releases it on every exit path.

mod report;

pub use report::RunReport;

use std::future::Future;
use std::time::Duration;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::browser::{BrowserSession, SessionProvider};
use crate::config::{MetamorphConfig, TargetConfig, TimeoutConfig};
use crate::error::{MetamorphError, Result};
use crate::lexicon::LexicalCorpus;
use crate::oracle::{SentimentOracle, WebOracle};
use crate::relation::RelationChecker;
use crate::transform::{SynonymReplacement, Text};

pub struct Orchestrator<C> {
    engine: SynonymReplacement<C>,
    checker: RelationChecker,
    target: TargetConfig,
    timeouts: TimeoutConfig,
}

impl<C: LexicalCorpus> Orchestrator<C> {
    pub fn new(corpus: C, config: &MetamorphConfig) -> Self {
        Self {
            engine: SynonymReplacement::new(corpus),
            checker: RelationChecker::new(config.unknown_policy),
            target: config.target.clone(),
            timeouts: config.timeouts,
        }
    }

    pub fn with_checker(mut self, checker: RelationChecker) -> Self {
        self.checker = checker;
        self
    }

    pub fn run_timeout(&self) -> Duration {
        self.timeouts.run()
    }

    /// Open a session, run the check against the live page, release the session.
    ///
    /// Opening and releasing are bounded by the session timeout, the check by
    /// the run timeout. The session is released whether the run succeeds,
    /// fails or times out.
    pub async fn run<P: SessionProvider>(&self, provider: &P, text: &Text) -> Result<RunReport> {
        let session = bounded(self.timeouts.session(), "browser session start", provider.open())
            .await
            .map_err(|e| MetamorphError::OracleUnavailable {
                url: self.target.tool_url.clone(),
                reason: format!("could not open a browser session: {e}"),
            })?;

        let outcome = {
            let oracle = WebOracle::new(&session, self.target.clone(), self.timeouts);
            bounded(self.run_timeout(), "metamorphic run", self.run_with_oracle(&oracle, text)).await
        };

        release(&session, self.timeouts.session()).await;
        outcome
    }

    /// The check itself, against any oracle.
    pub async fn run_with_oracle<O>(&self, oracle: &O, text: &Text) -> Result<RunReport>
    where
        O: SentimentOracle + ?Sized,
    {
        let run_id = Uuid::new_v4();
        let span = info_span!("run", %run_id);
        async {
            let started_at = chrono::Utc::now();

            let transformation = self.engine.transform(text);
            if transformation.is_identity() {
                warn!("No transformation applied to '{}'; the check is degenerate", text);
            }

            let original_label = oracle.predict(text).await?;
            let transformed_label = oracle.predict(&transformation.text).await?;
            let outcome = self.checker.check(original_label, transformed_label);
            info!(
                "'{}' -> {}, '{}' -> {}: {}",
                text, original_label, transformation.text, transformed_label, outcome
            );

            Ok::<_, MetamorphError>(RunReport {
                run_id,
                started_at,
                original: text.clone(),
                original_label,
                transformation,
                transformed_label,
                outcome,
                unknown_policy: self.checker.policy(),
            })
        }
        .instrument(span)
        .await
    }
}

/// Await `fut` for at most `limit`.
async fn bounded<T, F>(limit: Duration, what: &str, fut: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::time::timeout(limit, fut)
        .await
        .unwrap_or_else(|_| {
            Err(MetamorphError::Timeout {
                what: what.to_string(),
                timeout: limit,
            })
        })
}

async fn release<S: BrowserSession>(session: &S, limit: Duration) {
    if let Err(e) = bounded(limit, "browser session release", session.quit()).await {
        warn!("Failed to release browser session: {}", e);
    }
}
