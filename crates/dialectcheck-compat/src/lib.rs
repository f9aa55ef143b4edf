//! Compatibility harness for syntax-validation oracles
//!
//! This crate drives a probe catalog through a `ValidationOracle` and
//! classifies the outcome per dialect-version tag:
//! - Per-case pass/fail with failure isolation (one bad case never aborts a run)
//! - Per-version pass percentages and Full/Partial/Limited tiers
//! - An overall verdict computed across every case
//! - Terminal and JSON renderings of the result

pub mod harness;
pub mod metrics;
pub mod report;

pub use harness::{check_case, run, CompatHarness};
pub use metrics::{build_report, summarize};
pub use report::CompatReport;
