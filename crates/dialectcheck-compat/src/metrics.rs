//! Per-version aggregation of case results

use dialectcheck_core::{CaseResult, Report, VersionSummary};
use std::collections::HashMap;

/// Group results by version tag, in first-seen order
///
/// Groups only come into existence when a result carries their tag, so
/// every returned summary has `total >= 1`.
pub fn summarize(results: &[CaseResult]) -> Vec<VersionSummary> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();

    for result in results {
        let entry = counts.entry(result.version_tag.as_str()).or_insert_with(|| {
            order.push(result.version_tag.as_str());
            (0, 0)
        });
        entry.0 += 1;
        if result.is_pass() {
            entry.1 += 1;
        }
    }

    order
        .into_iter()
        .map(|tag| {
            let (total, passed) = counts[tag];
            VersionSummary::from_counts(tag, total, passed)
        })
        .collect()
}

/// Build the final report from results in catalog order
pub fn build_report(results: Vec<CaseResult>) -> Report {
    let summaries = summarize(&results);
    Report::new(results, summaries)
}
