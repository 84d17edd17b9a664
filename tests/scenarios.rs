//! End-to-end metamorphic runs.
//!
//! Runs against a stub oracle exercise transformation and comparison alone;
//! runs through `Orchestrator::run` drive the scripted page via a session
//! provider and check the session is always released.

mod support;

use std::time::Duration;

use metamorph::browser::WebDriverProvider;
use metamorph::lexicon::InMemoryCorpus;
use metamorph::{
    MetamorphError, Orchestrator, RelationChecker, RelationOutcome, SentimentLabel, Text,
    UnknownPolicy,
};

use support::driver::ScriptedDriver;
use support::{
    movie_corpus, never_decides, test_config, SiteBehavior, SiteProvider, StubOracle,
};

fn keyword_label(text: &str) -> SentimentLabel {
    let lower = text.to_lowercase();
    if lower.contains("love") || lower.contains("adore") {
        SentimentLabel::Positive
    } else {
        SentimentLabel::Neutral
    }
}

fn orchestrator(policy: UnknownPolicy) -> Orchestrator<InMemoryCorpus> {
    Orchestrator::new(movie_corpus(), &test_config(policy))
}

#[tokio::test]
async fn test_synonym_keeps_label() {
    let oracle = StubOracle::new(keyword_label);
    let report = orchestrator(UnknownPolicy::Equality)
        .run_with_oracle(&oracle, &Text::new("I love movie"))
        .await
        .unwrap();

    assert_eq!(report.transformed_text().to_string(), "I adore movie");
    assert_eq!(report.original_label, SentimentLabel::Positive);
    assert_eq!(report.transformed_label, SentimentLabel::Positive);
    assert_eq!(report.outcome, RelationOutcome::Satisfied);
    assert_eq!(report.lines()[2], "MR Satisfied");
    // Original first, then the variant.
    assert_eq!(oracle.calls(), vec!["I love movie", "I adore movie"]);
}

#[tokio::test]
async fn test_label_flip_is_a_violation() {
    let oracle = StubOracle::new(|text: &str| {
        if text == "I love movie" {
            SentimentLabel::Positive
        } else {
            SentimentLabel::Negative
        }
    });
    let report = orchestrator(UnknownPolicy::Equality)
        .run_with_oracle(&oracle, &Text::new("I love movie"))
        .await
        .unwrap();

    assert_eq!(report.outcome, RelationOutcome::Violated);
    assert_eq!(report.lines()[2], "MR Violated");
}

#[tokio::test]
async fn test_stop_words_only_is_degenerate() {
    let oracle = StubOracle::new(keyword_label);
    let report = orchestrator(UnknownPolicy::Equality)
        .run_with_oracle(&oracle, &Text::new("the a an"))
        .await
        .unwrap();

    assert!(report.is_degenerate());
    assert_eq!(report.transformed_text(), &report.original);
    assert_eq!(report.outcome, RelationOutcome::Satisfied);
    assert!(report.verdict_line().contains("degenerate"));
    assert_eq!(oracle.calls().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_unknown_pair_counts_as_satisfied_under_equality() {
    let provider = SiteProvider::new(SiteBehavior {
        classify: never_decides,
        ..SiteBehavior::default()
    });
    let report = orchestrator(UnknownPolicy::Equality)
        .run(&provider, &Text::new("I love movie"))
        .await
        .unwrap();

    assert_eq!(report.original_label, SentimentLabel::Unknown);
    assert_eq!(report.transformed_label, SentimentLabel::Unknown);
    assert!(report.is_uninformative());
    assert_eq!(report.outcome, RelationOutcome::Satisfied);
}

#[tokio::test(start_paused = true)]
async fn test_unknown_pair_is_violated_when_configured() {
    let provider = SiteProvider::new(SiteBehavior {
        classify: never_decides,
        ..SiteBehavior::default()
    });
    let report = orchestrator(UnknownPolicy::UnknownViolates)
        .run(&provider, &Text::new("I love movie"))
        .await
        .unwrap();

    assert_eq!(report.outcome, RelationOutcome::Violated);
    assert_eq!(report.unknown_policy, UnknownPolicy::UnknownViolates);
}

#[tokio::test]
async fn test_checker_override() {
    let oracle = StubOracle::new(|_: &str| SentimentLabel::Unknown);
    let report = orchestrator(UnknownPolicy::Equality)
        .with_checker(RelationChecker::new(UnknownPolicy::UnknownViolates))
        .run_with_oracle(&oracle, &Text::new("I love movie"))
        .await
        .unwrap();
    assert_eq!(report.outcome, RelationOutcome::Violated);
}

#[tokio::test(start_paused = true)]
async fn test_live_run_releases_session() {
    let provider = SiteProvider::new(SiteBehavior::default());
    let report = orchestrator(UnknownPolicy::Equality)
        .run(&provider, &Text::new("I love movie"))
        .await
        .unwrap();

    assert_eq!(report.outcome, RelationOutcome::Satisfied);
    assert_eq!(report.original_label, SentimentLabel::Positive);
    assert_eq!(report.transformed_label, SentimentLabel::Positive);

    let state = provider.site.state();
    assert_eq!(state.submitted, vec!["I love movie".to_string(), "I adore movie".to_string()]);
    assert_eq!(state.quits, 1);
}

#[tokio::test(start_paused = true)]
async fn test_unavailable_oracle_still_releases_session() {
    let provider = SiteProvider::new(SiteBehavior {
        reachable: false,
        ..SiteBehavior::default()
    });
    let err = orchestrator(UnknownPolicy::Equality)
        .run(&provider, &Text::new("I love movie"))
        .await
        .unwrap_err();

    assert!(matches!(err, MetamorphError::OracleUnavailable { .. }));
    assert_eq!(provider.site.state().quits, 1);
}

#[tokio::test(start_paused = true)]
async fn test_run_timeout_still_releases_session() {
    let provider = SiteProvider::new(SiteBehavior {
        classify: never_decides,
        redirects: false,
        ..SiteBehavior::default()
    });
    let mut config = test_config(UnknownPolicy::Equality);
    config.timeouts.run_ms = 1_500;
    let orchestrator = Orchestrator::new(movie_corpus(), &config);

    let err = orchestrator
        .run(&provider, &Text::new("I love movie"))
        .await
        .unwrap_err();

    match err {
        MetamorphError::Timeout { timeout, .. } => {
            assert_eq!(timeout, Duration::from_millis(1_500))
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(provider.site.state().quits, 1);
}

#[tokio::test]
async fn test_session_open_failure_is_unavailable() {
    let mut provider = SiteProvider::new(SiteBehavior::default());
    provider.fail_open = true;
    let err = orchestrator(UnknownPolicy::Equality)
        .run(&provider, &Text::new("I love movie"))
        .await
        .unwrap_err();

    assert!(matches!(err, MetamorphError::OracleUnavailable { .. }));
    assert!(err.to_string().contains("could not open a browser session"));
    assert_eq!(provider.site.state().quits, 0);
}

#[tokio::test]
async fn test_silent_driver_cannot_stall_a_run() {
    let driver = ScriptedDriver::silent().await;
    let mut config = test_config(UnknownPolicy::Equality);
    config.browser.webdriver_url = driver.url.clone();
    config.timeouts.run_ms = 500;
    config.timeouts.session_ms = 500;
    let provider = WebDriverProvider::new(config.browser.clone());
    let orchestrator = Orchestrator::new(movie_corpus(), &config);

    let outcome = tokio::time::timeout(
        Duration::from_secs(5),
        orchestrator.run(&provider, &Text::new("I love movie")),
    )
    .await
    .expect("run must finish within its own bounds");

    let err = outcome.unwrap_err();
    assert!(matches!(err, MetamorphError::OracleUnavailable { .. }), "{err}");
    assert!(err.to_string().contains("browser session start"));
}

#[tokio::test(start_paused = true)]
async fn test_hanging_release_is_bounded() {
    let provider = SiteProvider::new(SiteBehavior {
        quit_hangs: true,
        ..SiteBehavior::default()
    });
    let report = orchestrator(UnknownPolicy::Equality)
        .run(&provider, &Text::new("I love movie"))
        .await
        .unwrap();

    assert_eq!(report.outcome, RelationOutcome::Satisfied);
    assert_eq!(provider.site.state().quits, 1);
}
