//! Prediction Oracle
//!
//! Obtains a sentiment label for arbitrary text by driving the classifier's
//! web page: load → type → submit → await results → extract.
//!
//! The page is a live third-party surface, so every step after the input is
//! submitted has a fallback. A URL that never changes falls through to the
//! content marker; a marker that never appears falls through to label
//! lookup; a missing label element falls through to scanning the whole page.
//! Only an unreachable page or an unlocatable input field aborts the call.

mod label;

pub use label::{SentimentLabel, CATEGORY_NAMES};

use async_trait::async_trait;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::browser::{BrowserSession, ElementRef, Locator, LocatorResolver, Poller};
use crate::config::{TargetConfig, TimeoutConfig};
use crate::error::{MetamorphError, Result};
use crate::transform::Text;
use crate::utils::truncate_text;

/// Bytes of page content echoed into debug logs.
const LOG_PREVIEW_BYTES: usize = 400;

/// Anything that can classify a text.
#[async_trait]
pub trait SentimentOracle: Send + Sync {
    /// Exactly one label per call. Errors only when the classifier is unreachable.
    async fn predict(&self, text: &Text) -> Result<SentimentLabel>;
}

/// Oracle backed by a browser session pointed at the classifier's page.
pub struct WebOracle<'s, S: ?Sized> {
    session: &'s S,
    target: TargetConfig,
    timeouts: TimeoutConfig,
}

impl<'s, S: BrowserSession + ?Sized> WebOracle<'s, S> {
    pub fn new(session: &'s S, target: TargetConfig, timeouts: TimeoutConfig) -> Self {
        Self {
            session,
            target,
            timeouts,
        }
    }

    fn resolver(&self) -> LocatorResolver<'_, S> {
        LocatorResolver::new(self.session).with_interval(self.timeouts.poll_interval())
    }

    fn unavailable(&self, reason: impl Into<String>) -> MetamorphError {
        MetamorphError::OracleUnavailable {
            url: self.target.tool_url.clone(),
            reason: reason.into(),
        }
    }

    /// Load a fresh page, fill the input and trigger the analysis.
    async fn submit(&self, text: &Text) -> Result<()> {
        self.session
            .navigate(&self.target.tool_url)
            .await
            .map_err(|e| self.unavailable(format!("page load failed: {e}")))?;

        let input = self
            .resolver()
            .resolve(&self.target.input_locators, self.timeouts.input())
            .await
            .map_err(|e| self.unavailable(format!("input field not found: {e}")))?;

        self.prepare_input(&input).await;

        let entry = async {
            self.session.click(&input).await?;
            self.session.send_keys(&input, &text.to_string()).await?;
            let submit = self
                .resolver()
                .resolve(&self.target.submit_locators, self.timeouts.input())
                .await?;
            self.session.click(&submit).await?;
            Ok::<(), MetamorphError>(())
        };
        entry
            .await
            .map_err(|e| self.unavailable(format!("could not submit text: {e}")))
    }

    /// Clear pre-existing content when the element is a text-entry control.
    async fn prepare_input(&self, input: &ElementRef) {
        let tag = match self.session.tag_name(input).await {
            Ok(tag) => tag.to_ascii_lowercase(),
            Err(e) => {
                debug!("Could not read input tag name: {}", e);
                return;
            }
        };
        if tag == "input" || tag == "textarea" {
            if let Err(e) = self.session.clear(input).await {
                debug!("Clearing <{}> failed, typing over it: {}", tag, e);
            }
        }
    }

    /// Wait for the results URL, then for the completion marker. Timeouts degrade.
    async fn await_results(&self) -> Result<()> {
        let poller = Poller::new(self.timeouts.poll_interval(), self.timeouts.results());

        let fragment = self.target.results_fragment.as_str();
        let url_wait = poller
            .until("results URL", || async move {
                let url = self.session.current_url().await?;
                Ok(url.contains(fragment).then_some(url))
            })
            .await;
        match url_wait {
            Ok(url) => debug!("Reached results page {}", url),
            Err(MetamorphError::Timeout { timeout, .. }) => {
                warn!(
                    "URL never contained '{}' within {:?}; checking page content",
                    fragment, timeout
                );
            }
            Err(e) => return Err(e),
        }

        let markers: Vec<&str> = self.target.results_markers.iter().map(String::as_str).collect();
        if markers.is_empty() {
            return Ok(());
        }
        let marker = Locator::containing_text(None, &markers);
        match self.present(&marker, poller).await {
            Ok(_) => debug!("Results marker present"),
            Err(MetamorphError::Timeout { timeout, .. }) => {
                warn!("No results marker within {:?}; extracting anyway", timeout);
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Poll until `locator` is present in the markup, visible or not.
    async fn present(&self, locator: &Locator, poller: Poller) -> Result<ElementRef> {
        poller
            .until("element presence", || async move {
                Ok(self.session.find_element(locator).await?.found())
            })
            .await
    }

    /// Label element text plus page content, or page content alone.
    async fn search_space(&self) -> Result<String> {
        let poller = Poller::new(self.timeouts.poll_interval(), self.timeouts.label());
        let label_locator =
            Locator::containing_text(Some(self.target.label_tag.as_str()), &CATEGORY_NAMES);

        let node_text = match self.present(&label_locator, poller).await {
            Ok(node) => match self.session.text(&node).await {
                Ok(text) => Some(text),
                Err(e) => {
                    debug!("Label element unreadable, scanning page: {}", e);
                    None
                }
            },
            Err(MetamorphError::Timeout { .. }) => {
                warn!("No label element; scanning whole page");
                None
            }
            Err(e) => return Err(e),
        };

        let source = self.session.page_source().await?;
        let source = html_escape::decode_html_entities(&source).into_owned();
        Ok(match node_text {
            Some(text) => format!("{} {}", text, source),
            None => source,
        })
    }
}

#[async_trait]
impl<'s, S: BrowserSession + ?Sized> SentimentOracle for WebOracle<'s, S> {
    async fn predict(&self, text: &Text) -> Result<SentimentLabel> {
        let span = info_span!("predict", text = %text);
        async {
            self.submit(text).await?;
            self.await_results().await?;
            let haystack = self.search_space().await?;
            debug!("Search space: {}", truncate_text(&haystack, LOG_PREVIEW_BYTES));

            let label = SentimentLabel::extract(&haystack);
            info!("Oracle labelled '{}' as {}", text, label);
            Ok::<_, MetamorphError>(label)
        }
        .instrument(span)
        .await
    }
}

