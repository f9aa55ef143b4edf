//! Integration tests for the compatibility harness

use dialectcheck_compat::{run, CompatHarness, CompatReport};
use dialectcheck_core::{Catalog, CaseStatus, TestCase, Tier};
use dialectcheck_sql::{OracleError, Preflight, SqlParserOracle, ValidationOracle};
use pretty_assertions::assert_eq;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Oracle answering from a fixed script keyed by query text
struct ScriptedOracle {
    answers: HashMap<String, Result<bool, OracleError>>,
    calls: AtomicUsize,
    delay: Option<fn(&str) -> Duration>,
}

impl ScriptedOracle {
    fn new(answers: Vec<(&str, Result<bool, OracleError>)>) -> Self {
        Self {
            answers: answers
                .into_iter()
                .map(|(query, answer)| (query.to_string(), answer))
                .collect(),
            calls: AtomicUsize::new(0),
            delay: None,
        }
    }

    fn with_delay(mut self, delay: fn(&str) -> Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ValidationOracle for ScriptedOracle {
    fn name(&self) -> &str {
        "scripted"
    }

    fn validate(&self, query: &str) -> Result<bool, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            std::thread::sleep(delay(query));
        }
        self.answers
            .get(query)
            .cloned()
            .unwrap_or_else(|| Err(OracleError::Internal(format!("unscripted query: {}", query))))
    }
}

fn two_version_catalog() -> Catalog {
    Catalog::new(vec![
        TestCase::new("5.x+", "Select", "q1"),
        TestCase::new("5.x+", "Insert", "q2"),
        TestCase::new("5.x+", "Update", "q3"),
        TestCase::new("5.x+", "Delete", "q4"),
        TestCase::new("8.0+", "CTE", "q5"),
        TestCase::new("8.0+", "Window", "q6"),
    ])
}

fn two_version_oracle() -> ScriptedOracle {
    ScriptedOracle::new(vec![
        ("q1", Ok(true)),
        ("q2", Ok(true)),
        ("q3", Ok(true)),
        ("q4", Ok(false)),
        ("q5", Ok(true)),
        ("q6", Ok(true)),
    ])
}

#[test]
fn two_versions_partial_and_full() {
    let catalog = two_version_catalog();
    let oracle = two_version_oracle();

    let report = run(&catalog, &oracle);

    let legacy = report.summary("5.x+").unwrap();
    assert_eq!((legacy.total, legacy.passed), (4, 3));
    assert_eq!(legacy.percentage, 75.0);
    assert_eq!(legacy.tier, Tier::Partial);

    let modern = report.summary("8.0+").unwrap();
    assert_eq!((modern.total, modern.passed), (2, 2));
    assert_eq!(modern.percentage, 100.0);
    assert_eq!(modern.tier, Tier::Full);

    assert_eq!(report.overall_passed, 5);
    assert_eq!(report.overall_total, 6);
    assert_eq!(report.overall_percentage, 83.3);
    assert_eq!(report.recommendation, Tier::Partial);

    assert_eq!(report.results[3].note, "Syntax error");
    assert_eq!(oracle.calls(), 6);
}

#[test]
fn oracle_error_is_isolated_to_its_case() {
    let catalog = Catalog::new(vec![TestCase::new("8.4+", "Multi-Value Index", "q1")]);
    let oracle = ScriptedOracle::new(vec![(
        "q1",
        Err(OracleError::Internal("unsupported construct".to_string())),
    )]);

    let report = run(&catalog, &oracle);

    let result = &report.results[0];
    assert_eq!(result.status, CaseStatus::Fail);
    assert_ne!(result.note, "Syntax error");
    assert!(result.note.contains("unsupported construct"));

    let summary = report.summary("8.4+").unwrap();
    assert_eq!((summary.total, summary.passed), (1, 0));
    assert_eq!(summary.percentage, 0.0);
    assert_eq!(summary.tier, Tier::Limited);
}

#[test]
fn error_and_rejection_differ_only_in_note() {
    let catalog = two_version_catalog();

    let rejecting = two_version_oracle();
    let erroring = ScriptedOracle::new(vec![
        ("q1", Ok(true)),
        ("q2", Ok(true)),
        ("q3", Ok(true)),
        ("q4", Err(OracleError::Internal("crashed".to_string()))),
        ("q5", Ok(true)),
        ("q6", Ok(true)),
    ]);

    let rejected = run(&catalog, &rejecting);
    let errored = run(&catalog, &erroring);

    assert_eq!(rejected.summaries, errored.summaries);
    assert_eq!(rejected.overall_percentage, errored.overall_percentage);
    assert_eq!(rejected.recommendation, errored.recommendation);

    for (index, (a, b)) in rejected.results.iter().zip(&errored.results).enumerate() {
        assert_eq!(a.status, b.status);
        if index == 3 {
            assert_ne!(a.note, b.note);
        } else {
            assert_eq!(a, b);
        }
    }
}

#[test]
fn every_case_failing_still_completes() {
    let catalog = two_version_catalog();
    let oracle = ScriptedOracle::new(Vec::new());

    let report = run(&catalog, &oracle);

    assert_eq!(report.overall_total, 6);
    assert_eq!(report.overall_passed, 0);
    assert!(report
        .results
        .iter()
        .all(|r| r.note.starts_with("oracle error: internal failure: unscripted query")));
}

#[test]
fn empty_catalog_yields_empty_report() {
    let oracle = ScriptedOracle::new(Vec::new());
    let report = run(&Catalog::default(), &oracle);

    assert!(report.summaries.is_empty());
    assert!(report.results.is_empty());
    assert_eq!(report.overall_total, 0);
    assert_eq!(report.overall_percentage, 0.0);
    assert_eq!(oracle.calls(), 0);
}

#[test]
fn summaries_follow_catalog_tag_order() {
    let catalog = Catalog::new(vec![
        TestCase::new("8.0+", "a", "q1"),
        TestCase::new("5.x+", "b", "q2"),
        TestCase::new("8.0+", "c", "q3"),
        TestCase::new("5.7+", "d", "q4"),
    ]);
    let oracle = ScriptedOracle::new(vec![
        ("q1", Ok(true)),
        ("q2", Ok(true)),
        ("q3", Ok(false)),
        ("q4", Ok(true)),
    ]);

    let report = run(&catalog, &oracle);
    let tags: Vec<_> = report.summaries.iter().map(|s| s.version_tag.as_str()).collect();
    assert_eq!(tags, catalog.version_tags());

    let features: Vec<_> = report.results.iter().map(|r| r.feature_name.as_str()).collect();
    assert_eq!(features, vec!["a", "b", "c", "d"]);
}

#[test]
fn totals_match_catalog_length() {
    let catalog = Catalog::mysql_baseline();
    let oracle = SqlParserOracle::mysql();

    let report = run(&catalog, &oracle);

    let summed: usize = report.summaries.iter().map(|s| s.total).sum();
    assert_eq!(report.overall_total, catalog.len());
    assert_eq!(summed, catalog.len());
    for summary in &report.summaries {
        assert!(summary.passed <= summary.total);
    }
    assert_eq!(report.results[0].status, CaseStatus::Pass);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_run_matches_sequential() {
    let catalog = two_version_catalog();
    // Earlier cases take longer so they complete last
    let oracle = Arc::new(two_version_oracle().with_delay(|query| {
        let n: u64 = query.trim_start_matches('q').parse().unwrap_or(0);
        Duration::from_millis(60 - n * 10)
    }));

    let sequential = run(&catalog, &*oracle);
    let harness = CompatHarness::new(oracle.clone()).with_workers(4);
    let concurrent = harness.run_concurrent(&catalog).await;

    assert_eq!(concurrent, sequential);
    assert_eq!(oracle.calls(), 12);
}

#[tokio::test]
async fn concurrent_run_isolates_panics() {
    struct PanicsOnSecond;

    impl ValidationOracle for PanicsOnSecond {
        fn name(&self) -> &str {
            "panics-on-second"
        }

        fn validate(&self, query: &str) -> Result<bool, OracleError> {
            if query == "q2" {
                panic!("second case blew up");
            }
            Ok(true)
        }
    }

    let catalog = Catalog::new(vec![
        TestCase::new("a", "one", "q1"),
        TestCase::new("a", "two", "q2"),
        TestCase::new("b", "three", "q3"),
    ]);

    let report = CompatHarness::new(Arc::new(PanicsOnSecond))
        .with_workers(2)
        .run_concurrent(&catalog)
        .await;

    assert_eq!(report.overall_passed, 2);
    assert_eq!(report.results[1].status, CaseStatus::Fail);
    assert!(report.results[1].note.contains("second case blew up"));
    assert_eq!(report.summary("b").unwrap().tier, Tier::Full);
}

#[test]
fn preflight_reports_unavailable_oracle() {
    struct Unloaded;

    impl ValidationOracle for Unloaded {
        fn name(&self) -> &str {
            "unloaded"
        }

        fn validate(&self, _query: &str) -> Result<bool, OracleError> {
            Err(OracleError::Unavailable("extension not loaded".to_string()))
        }
    }

    let harness = CompatHarness::new(Arc::new(Unloaded));
    assert!(matches!(
        harness.preflight("SELECT VERSION()"),
        Err(OracleError::Unavailable(_))
    ));

    let ready = CompatHarness::new(Arc::new(SqlParserOracle::mysql()));
    assert_eq!(ready.preflight("SELECT VERSION()"), Ok(Preflight::Ready));
}

#[test]
fn rendered_report_covers_every_section() {
    let catalog = two_version_catalog();
    let report = run(&catalog, &two_version_oracle());
    let text = CompatReport::new("scripted", report).render(false);

    assert!(text.contains("Compatibility Test Results (Syntax-Only):"));
    assert!(text.contains("! 5.x+: 3/4 tests passed (75.0%)"));
    assert!(text.contains("✓ 8.0+: 2/2 tests passed (100.0%)"));
    assert!(text.contains("Overall Compatibility: 5/6 tests passed (83.3%)"));
    assert!(text.contains("Good compatibility with some limitations on newer features."));
    assert!(text.contains("| 5.x+          | 3/4                | Partial       |"));
    assert!(text.contains("| 8.0+          | 2/2                | Full          |"));
}
