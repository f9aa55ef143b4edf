//! Compatibility report generation

use colored::Colorize;
use dialectcheck_core::config::DEFAULT_FEATURE_WIDTH;
use dialectcheck_core::{CaseStatus, Report, Tier};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

const RULE_WIDTH: usize = 70;

/// A finished run, ready to be rendered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompatReport {
    /// Oracle that produced the results
    pub oracle: String,

    /// Timestamp (RFC 3339)
    pub generated_at: String,

    /// Aggregated results
    pub report: Report,

    #[serde(skip, default = "default_feature_width")]
    feature_width: usize,
}

fn default_feature_width() -> usize {
    DEFAULT_FEATURE_WIDTH
}

/// Status icon for a tier
pub fn status_icon(tier: Tier) -> &'static str {
    match tier {
        Tier::Full => "✓",
        Tier::Partial => "!",
        Tier::Limited => "✗",
    }
}

/// Recommendation text for the overall tier
pub fn recommendation_text(tier: Tier) -> &'static str {
    match tier {
        Tier::Full => "Excellent compatibility! The validator accepts statements across all probed versions.",
        Tier::Partial => "Good compatibility with some limitations on newer features.",
        Tier::Limited => "Limited compatibility. Consider a different dialect or validator.",
    }
}

/// Truncate to at most `width` characters (not bytes)
fn truncate(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

fn paint_tier(text: String, tier: Tier, color: bool) -> String {
    if !color {
        return text;
    }
    match tier {
        Tier::Full => text.green().to_string(),
        Tier::Partial => text.yellow().to_string(),
        Tier::Limited => text.red().to_string(),
    }
}

fn paint_status(text: String, status: CaseStatus, color: bool) -> String {
    match status {
        CaseStatus::Pass => paint_tier(text, Tier::Full, color),
        CaseStatus::Fail => paint_tier(text, Tier::Limited, color),
    }
}

/// Title plus an `=` underline of the same width
fn heading(out: &mut String, title: &str, color: bool) {
    let underline = "=".repeat(title.chars().count());
    if color {
        let _ = writeln!(out, "{}\n{}", title.bold(), underline);
    } else {
        let _ = writeln!(out, "{}\n{}", title, underline);
    }
}

impl CompatReport {
    /// Wrap a report produced by `oracle`
    pub fn new(oracle: impl Into<String>, report: Report) -> Self {
        Self {
            oracle: oracle.into(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            report,
            feature_width: DEFAULT_FEATURE_WIDTH,
        }
    }

    /// Set the width feature names are truncated to
    pub fn with_feature_width(mut self, width: usize) -> Self {
        self.feature_width = width.max(1);
        self
    }

    /// Render the full text report
    ///
    /// Pure projection of the report; with `color` off the output contains
    /// no escape codes.
    pub fn render(&self, color: bool) -> String {
        let mut out = String::new();
        let report = &self.report;
        let feature_col = self.feature_width + 2;

        // Per-case table
        heading(&mut out, "Compatibility Test Results (Syntax-Only):", color);
        let _ = writeln!(
            out,
            "{:<8} {:<feature_col$} {:<12} {}",
            "Version", "Feature", "Syntax", "Notes"
        );
        let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));

        for result in &report.results {
            let marker = match result.status {
                CaseStatus::Pass => "✓ PASS",
                CaseStatus::Fail => "✗ FAIL",
            };
            let _ = writeln!(
                out,
                "{:<8} {:<feature_col$} {} {}",
                result.version_tag,
                truncate(&result.feature_name, self.feature_width),
                paint_status(format!("{:<12}", marker), result.status, color),
                result.note
            );
        }

        // Per-version summary
        let _ = writeln!(out, "\n{}", "-".repeat(RULE_WIDTH));
        heading(&mut out, "Summary by Version:", color);
        for summary in &report.summaries {
            let line = format!(
                "{} {}: {}/{} tests passed ({:.1}%)",
                status_icon(summary.tier),
                summary.version_tag,
                summary.passed,
                summary.total,
                summary.percentage
            );
            let _ = writeln!(out, "{}", paint_tier(line, summary.tier, color));
        }

        let _ = writeln!(
            out,
            "\nOverall Compatibility: {}/{} tests passed ({:.1}%)",
            report.overall_passed, report.overall_total, report.overall_percentage
        );

        // Recommendation
        let _ = writeln!(out);
        heading(&mut out, "Recommendations:", color);
        let recommendation = format!(
            "{} {}",
            status_icon(report.recommendation),
            recommendation_text(report.recommendation)
        );
        let _ = writeln!(out, "{}", paint_tier(recommendation, report.recommendation, color));

        // Compatibility matrix
        let _ = writeln!(out);
        heading(&mut out, "Compatibility Matrix:", color);
        let _ = writeln!(out, "| {:<13} | {:<18} | {:<13} |", "Version", "Features Supported", "Compatibility");
        let _ = writeln!(out, "|{}|{}|{}|", "-".repeat(15), "-".repeat(20), "-".repeat(15));
        for summary in &report.summaries {
            let _ = writeln!(
                out,
                "| {:<13} | {:<18} | {:<13} |",
                summary.version_tag,
                format!("{}/{}", summary.passed, summary.total),
                summary.tier.as_str()
            );
        }

        out
    }

    /// Print the report to stdout
    pub fn print_terminal_report(&self, color: bool) {
        print!("{}", self.render(color));
    }

    /// Export report as JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Export report as JSON to file
    pub fn save_json(&self, path: impl AsRef<std::path::Path>) -> std::io::Result<()> {
        let json = self.to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
