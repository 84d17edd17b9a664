//! Shared fakes: a scripted classifier page behind `BrowserSession`, a
//! provider for it, and a keyword-driven stub oracle.

#![allow(dead_code)]

pub mod driver;

use async_trait::async_trait;
use std::sync::{Arc, Mutex, MutexGuard};

use metamorph::browser::{BrowserSession, ElementRef, Locator, Lookup, Miss, SessionProvider};
use metamorph::config::{MetamorphConfig, TimeoutConfig};
use metamorph::lexicon::{InMemoryCorpus, PartOfSpeech};
use metamorph::{MetamorphError, Result, SentimentLabel, SentimentOracle, Text, UnknownPolicy};

pub const PREFILLED: &str = "Type your text here";

/// How the fake page behaves.
#[derive(Clone)]
pub struct SiteBehavior {
    pub reachable: bool,
    pub input_present: bool,
    pub submit_present: bool,
    /// Tag reported for the input element.
    pub input_tag: &'static str,
    /// Whether submitting moves to the `-results` URL.
    pub redirects: bool,
    /// Whether the verdict is rendered in an `h4` or only in body text.
    pub label_heading: bool,
    /// Whether reading the label element's text fails as if it went stale.
    pub label_unreadable: bool,
    /// Whether releasing the session never completes.
    pub quit_hangs: bool,
    /// Verdict word shown for a submitted text, if any.
    pub classify: fn(&str) -> Option<&'static str>,
}

impl Default for SiteBehavior {
    fn default() -> Self {
        Self {
            reachable: true,
            input_present: true,
            submit_present: true,
            input_tag: "textarea",
            redirects: true,
            label_heading: true,
            label_unreadable: false,
            quit_hangs: false,
            classify: loves_are_positive,
        }
    }
}

pub fn loves_are_positive(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    if lower.contains("love") || lower.contains("adore") {
        Some("Positive")
    } else if lower.contains("hate") {
        Some("Negative")
    } else {
        Some("Neutral")
    }
}

pub fn never_decides(_: &str) -> Option<&'static str> {
    None
}

#[derive(Debug, Default)]
pub struct SiteState {
    pub url: String,
    pub field: String,
    pub submitted: Vec<String>,
    pub navigations: usize,
    pub clears: usize,
    pub quits: usize,
    /// Submissions recorded before the current page load.
    loaded_at: usize,
}

impl SiteState {
    fn showing_results(&self) -> Option<&str> {
        if self.submitted.len() > self.loaded_at {
            self.submitted.last().map(String::as_str)
        } else {
            None
        }
    }
}

pub struct FakeSite {
    behavior: SiteBehavior,
    state: Mutex<SiteState>,
}

impl FakeSite {
    pub fn new(behavior: SiteBehavior) -> Self {
        Self {
            behavior,
            state: Mutex::new(SiteState::default()),
        }
    }

    pub fn state(&self) -> MutexGuard<'_, SiteState> {
        self.state.lock().unwrap()
    }

    fn showing_results(&self) -> bool {
        self.state().showing_results().is_some()
    }

    fn verdict(&self) -> Option<&'static str> {
        let state = self.state();
        state.showing_results().and_then(self.behavior.classify)
    }
}

fn element(id: &str) -> Lookup {
    Lookup::Found(ElementRef(id.to_string()))
}

#[async_trait]
impl BrowserSession for FakeSite {
    async fn navigate(&self, url: &str) -> Result<()> {
        if !self.behavior.reachable {
            return Err(MetamorphError::WebDriver {
                command: "POST /url".to_string(),
                error: "unknown error".to_string(),
                message: "net::ERR_NAME_NOT_RESOLVED".to_string(),
            });
        }
        let mut state = self.state();
        state.url = url.to_string();
        state.field = PREFILLED.to_string();
        state.navigations += 1;
        state.loaded_at = state.submitted.len();
        Ok(())
    }

    async fn find_element(&self, locator: &Locator) -> Result<Lookup> {
        let selector = locator.selector.as_str();
        let results = self.showing_results();

        if selector.contains("Happiness-Score-Text") {
            return Ok(if self.behavior.input_present && !results {
                element("input")
            } else {
                Lookup::NotFound(Miss::Absent)
            });
        }
        if selector.contains("happiness-score-button") {
            return Ok(if self.behavior.submit_present && !results {
                element("submit")
            } else {
                Lookup::NotFound(Miss::Absent)
            });
        }
        if selector.starts_with("//h4") && self.behavior.label_heading && self.verdict().is_some() {
            return Ok(element("label"));
        }
        if selector.contains("Your text was analyzed") && results {
            return Ok(element("marker"));
        }
        Ok(Lookup::NotFound(Miss::Absent))
    }

    async fn is_displayed(&self, _element: &ElementRef) -> Result<bool> {
        Ok(true)
    }

    async fn tag_name(&self, element: &ElementRef) -> Result<String> {
        Ok(match element.id() {
            "input" => self.behavior.input_tag,
            "submit" => "input",
            "label" => "h4",
            _ => "div",
        }
        .to_string())
    }

    async fn text(&self, element: &ElementRef) -> Result<String> {
        if element.id() == "label" && self.behavior.label_unreadable {
            return Err(MetamorphError::WebDriver {
                command: "GET /element/label/text".to_string(),
                error: "stale element reference".to_string(),
                message: "element is not attached to the page document".to_string(),
            });
        }
        Ok(match element.id() {
            "label" => self.verdict().unwrap_or_default().to_string(),
            "marker" => "Your text was analyzed".to_string(),
            _ => String::new(),
        })
    }

    async fn clear(&self, element: &ElementRef) -> Result<()> {
        let mut state = self.state();
        if element.id() == "input" {
            state.field.clear();
        }
        state.clears += 1;
        Ok(())
    }

    async fn click(&self, element: &ElementRef) -> Result<()> {
        if element.id() == "submit" {
            let mut state = self.state();
            let typed = state.field.clone();
            state.submitted.push(typed);
            if self.behavior.redirects {
                state.url = format!("{}-results", state.url);
            }
        }
        Ok(())
    }

    async fn send_keys(&self, element: &ElementRef, text: &str) -> Result<()> {
        if element.id() == "input" {
            self.state().field.push_str(text);
        }
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.state().url.clone())
    }

    async fn page_source(&self) -> Result<String> {
        if !self.showing_results() {
            return Ok(
                "<html><body><textarea id=\"Happiness-Score-Text-3\"></textarea></body></html>"
                    .to_string(),
            );
        }
        Ok(match (self.verdict(), self.behavior.label_heading) {
            (Some(word), true) => format!(
                "<html><body><h2>Your text was analyzed</h2><h4>{}</h4></body></html>",
                word
            ),
            (Some(word), false) => format!(
                "<html><body><h2>Your text was analyzed</h2><p>Overall sentiment: {}</p></body></html>",
                word
            ),
            (None, _) => "<html><body><h2>Your text was analyzed</h2><p>We couldn&#39;t decide.</p></body></html>"
                .to_string(),
        })
    }

    async fn quit(&self) -> Result<()> {
        self.state().quits += 1;
        if self.behavior.quit_hangs {
            std::future::pending::<()>().await;
        }
        Ok(())
    }
}

/// Hands out the same shared site for every session.
pub struct SiteProvider {
    pub site: Arc<FakeSite>,
    pub fail_open: bool,
}

impl SiteProvider {
    pub fn new(behavior: SiteBehavior) -> Self {
        Self {
            site: Arc::new(FakeSite::new(behavior)),
            fail_open: false,
        }
    }
}

#[async_trait]
impl SessionProvider for SiteProvider {
    type Session = Arc<FakeSite>;

    async fn open(&self) -> Result<Arc<FakeSite>> {
        if self.fail_open {
            return Err(MetamorphError::WebDriver {
                command: "POST /session".to_string(),
                error: "session not created".to_string(),
                message: "chrome not reachable".to_string(),
            });
        }
        Ok(self.site.clone())
    }
}

/// Oracle that labels texts with a plain function and records every call.
pub struct StubOracle<F> {
    classify: F,
    pub calls: Mutex<Vec<String>>,
}

impl<F> StubOracle<F>
where
    F: Fn(&str) -> SentimentLabel + Send + Sync,
{
    pub fn new(classify: F) -> Self {
        Self {
            classify,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl<F> SentimentOracle for StubOracle<F>
where
    F: Fn(&str) -> SentimentLabel + Send + Sync,
{
    async fn predict(&self, text: &Text) -> Result<SentimentLabel> {
        let raw = text.to_string();
        self.calls.lock().unwrap().push(raw.clone());
        Ok((self.classify)(&raw))
    }
}

pub fn movie_corpus() -> InMemoryCorpus {
    InMemoryCorpus::new()
        .with_senses("love", PartOfSpeech::Noun, &[&["love"], &["love", "passion"]])
        .with_senses(
            "love",
            PartOfSpeech::Verb,
            &[&["love"], &["love", "adore", "enjoy"]],
        )
        .with_senses("movie", PartOfSpeech::Noun, &[&["movie", "film", "picture"]])
}

pub fn fast_timeouts() -> TimeoutConfig {
    TimeoutConfig {
        input_ms: 1_000,
        results_ms: 2_000,
        label_ms: 2_000,
        poll_interval_ms: 50,
        run_ms: 60_000,
        session_ms: 5_000,
    }
}

pub fn test_config(policy: UnknownPolicy) -> MetamorphConfig {
    MetamorphConfig {
        timeouts: fast_timeouts(),
        unknown_policy: policy,
        ..MetamorphConfig::default()
    }
}
