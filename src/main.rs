//! Metamorphic check of the ClientZen sentiment tool.
//!
//! Runs one fixed scenario: classify a sentence, classify a synonym-swapped
//! copy, and report whether the label held.

use anyhow::{Context, Result};
use tracing::info;

use metamorph::browser::WebDriverProvider;
use metamorph::lexicon::WordNetCorpus;
use metamorph::utils::init_logging;
use metamorph::{MetamorphConfig, Orchestrator, Text};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    init_logging()?;

    let config = MetamorphConfig::load().context("Failed to load configuration")?;
    info!("Target: {}", config.target.tool_url);

    let corpus = WordNetCorpus::open(&config.wordnet_dir)
        .with_context(|| format!("Failed to load WordNet from {}", config.wordnet_dir.display()))?;

    let orchestrator = Orchestrator::new(corpus, &config);
    let provider = WebDriverProvider::new(config.browser.clone());
    let text = Text::new(&config.scenario_text);

    let report = orchestrator
        .run(&provider, &text)
        .await
        .context("Metamorphic run failed")?;

    if config.report_json {
        println!("{}", report.to_json()?);
    } else {
        for line in report.lines() {
            println!("{}", line);
        }
    }

    Ok(())
}
