//! Configuration
//!
//! Built-in defaults reproduce the ClientZen sentiment tool setup. A YAML file
//! named by `METAMORPH_CONFIG` may override any of it, and `METAMORPH_*`
//! environment variables override the file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::browser::Locator;
use crate::error::{MetamorphError, Result};
use crate::relation::UnknownPolicy;

pub const CONFIG_PATH_VAR: &str = "METAMORPH_CONFIG";

/// Where the classifier lives and how its page is laid out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub tool_url: String,
    /// Path fragment present in the URL once results are shown.
    pub results_fragment: String,
    pub input_locators: Vec<Locator>,
    pub submit_locators: Vec<Locator>,
    /// Text fragments that show the analysis completed.
    pub results_markers: Vec<String>,
    /// Tag of the element expected to carry the label, e.g. `h4`.
    pub label_tag: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            tool_url: "https://www.clientzen.io/sentiment-analysis-tool".to_string(),
            results_fragment: "/sentiment-analysis-tool-results".to_string(),
            input_locators: vec![Locator::css("#Happiness-Score-Text-3")],
            submit_locators: vec![Locator::xpath("//input[@id='happiness-score-button']")],
            results_markers: vec!["Your text was analyzed".to_string(), "Results".to_string()],
            label_tag: "h4".to_string(),
        }
    }
}

/// Driver endpoint and browser launch flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub webdriver_url: String,
    pub headless: bool,
    pub window_width: u32,
    pub window_height: u32,
    pub language: String,
    pub page_load_timeout_ms: u64,
    /// Ceiling on a single HTTP exchange with the driver. Must exceed the page-load timeout.
    pub command_timeout_ms: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
            headless: false,
            window_width: 1400,
            window_height: 900,
            language: "en-US".to_string(),
            page_load_timeout_ms: 40_000,
            command_timeout_ms: 60_000,
        }
    }
}

/// Bounds on every wait the oracle performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    pub input_ms: u64,
    pub results_ms: u64,
    pub label_ms: u64,
    pub poll_interval_ms: u64,
    /// Ceiling on a whole orchestrated run.
    pub run_ms: u64,
    /// Ceiling on opening or releasing a browser session.
    pub session_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            input_ms: 10_000,
            results_ms: 20_000,
            label_ms: 20_000,
            poll_interval_ms: 250,
            run_ms: 180_000,
            session_ms: 60_000,
        }
    }
}

impl TimeoutConfig {
    pub fn input(&self) -> Duration {
        Duration::from_millis(self.input_ms)
    }

    pub fn results(&self) -> Duration {
        Duration::from_millis(self.results_ms)
    }

    pub fn label(&self) -> Duration {
        Duration::from_millis(self.label_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn run(&self) -> Duration {
        Duration::from_millis(self.run_ms)
    }

    pub fn session(&self) -> Duration {
        Duration::from_millis(self.session_ms)
    }
}

impl BrowserConfig {
    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetamorphConfig {
    pub target: TargetConfig,
    pub browser: BrowserConfig,
    pub timeouts: TimeoutConfig,
    /// Root of a WordNet `dict/` directory.
    pub wordnet_dir: PathBuf,
    pub unknown_policy: UnknownPolicy,
    /// Sentence the binary checks.
    pub scenario_text: String,
    /// Emit the run report as JSON instead of text lines.
    pub report_json: bool,
}

impl Default for MetamorphConfig {
    fn default() -> Self {
        Self {
            target: TargetConfig::default(),
            browser: BrowserConfig::default(),
            timeouts: TimeoutConfig::default(),
            wordnet_dir: PathBuf::from("wordnet/dict"),
            unknown_policy: UnknownPolicy::default(),
            scenario_text: "I love movie".to_string(),
            report_json: false,
        }
    }
}

impl MetamorphConfig {
    /// Defaults, then the optional file, then the environment.
    pub fn load() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| MetamorphError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Apply `METAMORPH_*` overrides read through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("METAMORPH_TOOL_URL") {
            self.target.tool_url = v;
        }
        if let Some(v) = lookup("METAMORPH_RESULTS_FRAGMENT") {
            self.target.results_fragment = v;
        }
        if let Some(v) = lookup("METAMORPH_WEBDRIVER_URL") {
            self.browser.webdriver_url = v;
        }
        if let Some(v) = lookup("METAMORPH_HEADLESS") {
            self.browser.headless = parse_flag("METAMORPH_HEADLESS", &v)?;
        }
        if let Some(v) = lookup("METAMORPH_WORDNET_DIR") {
            self.wordnet_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("METAMORPH_UNKNOWN_POLICY") {
            self.unknown_policy = v.parse()?;
        }
        if let Some(v) = lookup("METAMORPH_TEXT") {
            self.scenario_text = v;
        }
        if let Some(v) = lookup("METAMORPH_REPORT_JSON") {
            self.report_json = parse_flag("METAMORPH_REPORT_JSON", &v)?;
        }
        if let Some(v) = lookup("METAMORPH_RUN_TIMEOUT_SECS") {
            let secs: u64 = v
                .parse()
                .map_err(|_| MetamorphError::Config(format!("METAMORPH_RUN_TIMEOUT_SECS: {v}")))?;
            self.timeouts.run_ms = secs.saturating_mul(1000);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.target.tool_url.trim().is_empty() {
            return Err(MetamorphError::Config("target.tool_url is empty".to_string()));
        }
        if self.browser.webdriver_url.trim().is_empty() {
            return Err(MetamorphError::Config("browser.webdriver_url is empty".to_string()));
        }
        if self.target.input_locators.is_empty() || self.target.submit_locators.is_empty() {
            return Err(MetamorphError::Config(
                "target needs at least one input and one submit locator".to_string(),
            ));
        }
        let t = &self.timeouts;
        let b = &self.browser;
        let named = [
            ("timeouts.input_ms", t.input_ms),
            ("timeouts.results_ms", t.results_ms),
            ("timeouts.label_ms", t.label_ms),
            ("timeouts.poll_interval_ms", t.poll_interval_ms),
            ("timeouts.run_ms", t.run_ms),
            ("timeouts.session_ms", t.session_ms),
            ("browser.page_load_timeout_ms", b.page_load_timeout_ms),
            ("browser.command_timeout_ms", b.command_timeout_ms),
        ];
        if let Some((name, _)) = named.iter().find(|(_, v)| *v == 0) {
            return Err(MetamorphError::Config(format!("{name} must be positive")));
        }
        if b.command_timeout_ms <= b.page_load_timeout_ms {
            return Err(MetamorphError::Config(
                "browser.command_timeout_ms must exceed browser.page_load_timeout_ms".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(MetamorphError::Config(format!("{name}: expected a boolean, got '{other}'"))),
    }
}
