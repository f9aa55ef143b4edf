//! Test harness for running a probe catalog through a validation oracle

use crate::metrics::build_report;

use dialectcheck_core::{CaseResult, Catalog, Config, Report, TestCase};
use dialectcheck_sql::{OracleError, Preflight, ValidationOracle};

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Validate one case, absorbing any oracle failure into a `Fail` result
///
/// Errors and panics raised by the oracle are caught here so that a single
/// misbehaving case cannot abort the batch. The process panic hook still
/// runs first, so a panicking oracle prints its usual message to stderr;
/// callers that need a clean terminal should install their own hook.
pub fn check_case(oracle: &dyn ValidationOracle, case: &TestCase) -> CaseResult {
    let outcome = catch_unwind(AssertUnwindSafe(|| oracle.validate(&case.query)))
        .unwrap_or_else(|payload| Err(OracleError::Panicked(panic_message(payload))));

    let result = match outcome {
        Ok(true) => CaseResult::accepted(case),
        Ok(false) => CaseResult::rejected(case),
        Err(e) => {
            tracing::warn!(
                version = %case.version_tag,
                feature = %case.feature_name,
                error = %e,
                "oracle failed, recording case as FAIL"
            );
            CaseResult::oracle_error(case, e)
        }
    };

    tracing::debug!(
        version = %result.version_tag,
        feature = %result.feature_name,
        status = %result.status,
        "case checked"
    );
    result
}

/// Run every case sequentially, in catalog order
pub fn run(catalog: &Catalog, oracle: &dyn ValidationOracle) -> Report {
    let results = catalog.iter().map(|case| check_case(oracle, case)).collect();
    finish(build_report(results))
}

fn finish(report: Report) -> Report {
    tracing::info!(
        passed = report.overall_passed,
        total = report.overall_total,
        percentage = report.overall_percentage,
        tier = %report.recommendation,
        "compatibility run complete"
    );
    report
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Harness binding an oracle to a worker budget
pub struct CompatHarness {
    /// Oracle every case is validated against
    oracle: Arc<dyn ValidationOracle>,

    /// Maximum concurrent oracle calls
    workers: usize,
}

impl CompatHarness {
    /// Create a sequential harness
    pub fn new(oracle: Arc<dyn ValidationOracle>) -> Self {
        Self { oracle, workers: 1 }
    }

    /// Create a harness using the worker budget from config
    pub fn from_config(oracle: Arc<dyn ValidationOracle>, config: &Config) -> Self {
        Self::new(oracle).with_workers(config.workers)
    }

    /// Set the worker budget (clamped to at least one)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn oracle_name(&self) -> &str {
        self.oracle.name()
    }

    /// Check the oracle before anything is validated
    pub fn preflight(&self, probe: &str) -> Result<Preflight, OracleError> {
        self.oracle.preflight(probe)
    }

    /// Run the catalog sequentially
    pub fn run(&self, catalog: &Catalog) -> Report {
        tracing::info!(
            oracle = self.oracle.name(),
            cases = catalog.len(),
            "running compatibility catalog"
        );
        run(catalog, &*self.oracle)
    }

    /// Run the catalog with up to `workers` oracle calls in flight
    ///
    /// Results are collected in catalog order no matter which case finishes
    /// first, so the report is identical to a sequential run.
    pub async fn run_concurrent(&self, catalog: &Catalog) -> Report {
        if self.workers <= 1 {
            return self.run(catalog);
        }

        tracing::info!(
            oracle = self.oracle.name(),
            cases = catalog.len(),
            workers = self.workers,
            "running compatibility catalog concurrently"
        );

        let semaphore = Arc::new(Semaphore::new(self.workers));
        let mut handles = Vec::with_capacity(catalog.len());

        for case in catalog.iter() {
            // The semaphore is never closed, so a permit is always granted
            let permit = Arc::clone(&semaphore).acquire_owned().await.ok();
            let oracle = Arc::clone(&self.oracle);
            let case = case.clone();

            handles.push(tokio::task::spawn_blocking(move || {
                let _permit = permit;
                check_case(&*oracle, &case)
            }));
        }

        let mut results = Vec::with_capacity(handles.len());
        for (case, handle) in catalog.iter().zip(handles) {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!(feature = %case.feature_name, error = %e, "worker failed");
                    CaseResult::oracle_error(case, format!("worker failed: {}", e))
                }
            };
            results.push(result);
        }

        finish(build_report(results))
    }
}
