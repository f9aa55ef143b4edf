//! Results model: per-case outcomes, per-version summaries and the report
//!
//! Everything here is plain data. Values are produced once by the harness
//! and never mutated afterwards.

use crate::catalog::TestCase;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Note attached to a case the oracle accepted
pub const NOTE_OK: &str = "OK";

/// Note attached to a case the oracle rejected
pub const NOTE_SYNTAX_ERROR: &str = "Syntax error";

/// Minimum percentage for [`Tier::Full`]
pub const FULL_THRESHOLD: f64 = 90.0;

/// Minimum percentage for [`Tier::Partial`]
pub const PARTIAL_THRESHOLD: f64 = 70.0;

/// `passed / total * 100` rounded half-up to one decimal, `0.0` for an empty group
///
/// Computed in integer tenths so exact halves such as 23/80 (28.75) round up.
pub fn percentage_of(passed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let (passed, total) = (passed as u128, total as u128);
    let tenths = (passed * 2000 + total) / (2 * total);
    tenths as f64 / 10.0
}

/// Pass/fail status of one case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    Pass,
    Fail,
}

impl CaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Pass => "PASS",
            CaseStatus::Fail => "FAIL",
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Compatibility tier derived from a pass percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    /// 90% and above
    Full,

    /// From 70% up to (not including) 90%
    Partial,

    /// Below 70%
    Limited,
}

impl Tier {
    /// Classify a percentage. NaN falls through to `Limited`.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= FULL_THRESHOLD {
            Tier::Full
        } else if percentage >= PARTIAL_THRESHOLD {
            Tier::Partial
        } else {
            Tier::Limited
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Full => "Full",
            Tier::Partial => "Partial",
            Tier::Limited => "Limited",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Outcome of validating a single test case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseResult {
    /// Version tag of the originating case
    pub version_tag: String,

    /// Feature name of the originating case
    pub feature_name: String,

    pub status: CaseStatus,

    /// Short diagnostic ("OK", "Syntax error", "oracle error: ...")
    pub note: String,
}

impl CaseResult {
    fn from_case(case: &TestCase, status: CaseStatus, note: String) -> Self {
        Self {
            version_tag: case.version_tag.clone(),
            feature_name: case.feature_name.clone(),
            status,
            note,
        }
    }

    /// The oracle accepted the query
    pub fn accepted(case: &TestCase) -> Self {
        Self::from_case(case, CaseStatus::Pass, NOTE_OK.to_string())
    }

    /// The oracle rejected the query
    pub fn rejected(case: &TestCase) -> Self {
        Self::from_case(case, CaseStatus::Fail, NOTE_SYNTAX_ERROR.to_string())
    }

    /// The oracle failed while validating the query
    pub fn oracle_error(case: &TestCase, message: impl fmt::Display) -> Self {
        Self::from_case(case, CaseStatus::Fail, format!("oracle error: {}", message))
    }

    pub fn is_pass(&self) -> bool {
        self.status == CaseStatus::Pass
    }
}

/// Aggregate for one version tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionSummary {
    pub version_tag: String,

    /// Number of cases carrying this tag
    pub total: usize,

    /// Number of those cases that passed
    pub passed: usize,

    /// `passed / total * 100`, one decimal
    pub percentage: f64,

    pub tier: Tier,
}

impl VersionSummary {
    /// Build a summary from raw counts.
    ///
    /// A group with zero cases is defined as 0.0% / `Limited`. `passed` is
    /// clamped to `total`.
    pub fn from_counts(version_tag: impl Into<String>, total: usize, passed: usize) -> Self {
        let passed = passed.min(total);
        let percentage = percentage_of(passed, total);
        Self {
            version_tag: version_tag.into(),
            total,
            passed,
            percentage,
            tier: Tier::from_percentage(percentage),
        }
    }

    pub fn failed(&self) -> usize {
        self.total.saturating_sub(self.passed)
    }
}

/// Top-level result of a compatibility run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Per-case results in catalog order
    pub results: Vec<CaseResult>,

    /// Per-version summaries in first-seen tag order
    pub summaries: Vec<VersionSummary>,

    pub overall_passed: usize,

    pub overall_total: usize,

    /// Computed over all cases, not averaged over versions
    pub overall_percentage: f64,

    /// Tier for the overall percentage
    pub recommendation: Tier,
}

impl Report {
    /// Assemble a report from ordered results and summaries
    pub fn new(results: Vec<CaseResult>, summaries: Vec<VersionSummary>) -> Self {
        let overall_total = results.len();
        let overall_passed = results.iter().filter(|r| r.is_pass()).count();
        let overall_percentage = percentage_of(overall_passed, overall_total);

        Self {
            results,
            summaries,
            overall_passed,
            overall_total,
            overall_percentage,
            recommendation: Tier::from_percentage(overall_percentage),
        }
    }

    /// Look up the summary for a version tag
    pub fn summary(&self, version_tag: &str) -> Option<&VersionSummary> {
        self.summaries.iter().find(|s| s.version_tag == version_tag)
    }

    pub fn overall_failed(&self) -> usize {
        self.overall_total.saturating_sub(self.overall_passed)
    }
}
