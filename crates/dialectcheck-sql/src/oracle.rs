//! Validation oracle contract

/// Errors an oracle can raise instead of answering
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    /// The oracle cannot be reached at all
    #[error("oracle unavailable: {0}")]
    Unavailable(String),

    /// The oracle failed while handling one query
    #[error("internal failure: {0}")]
    Internal(String),

    /// The oracle panicked while handling one query
    #[error("panicked: {0}")]
    Panicked(String),
}

/// Result of a successful preflight check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preflight {
    /// The probe query was accepted
    Ready,

    /// The oracle answers, but the probe did not come back clean
    Degraded { reason: String },
}

/// A capability that judges whether a query string is syntactically valid
///
/// Implementations must be callable from several threads at once; the
/// harness may validate independent cases concurrently.
pub trait ValidationOracle: Send + Sync {
    /// Human-readable oracle name (e.g. "sqlparser/mysql")
    fn name(&self) -> &str;

    /// `Ok(true)` if the query is well-formed, `Ok(false)` if it is rejected
    fn validate(&self, query: &str) -> Result<bool, OracleError>;

    /// Check that the oracle can be used at all
    ///
    /// Only [`OracleError::Unavailable`] should be returned from here.
    fn check_available(&self) -> Result<(), OracleError> {
        Ok(())
    }

    /// Health check run once before any case is validated
    ///
    /// An `Err` is fatal for the run. A probe that is rejected or fails
    /// is reported as [`Preflight::Degraded`] and the run may proceed.
    fn preflight(&self, probe: &str) -> Result<Preflight, OracleError> {
        self.check_available()?;

        match self.validate(probe) {
            Ok(true) => Ok(Preflight::Ready),
            Ok(false) => Ok(Preflight::Degraded {
                reason: format!("probe query rejected: {}", probe),
            }),
            Err(OracleError::Unavailable(reason)) => Err(OracleError::Unavailable(reason)),
            Err(e) => Ok(Preflight::Degraded {
                reason: format!("could not validate probe query: {}", e),
            }),
        }
    }
}

impl<T: ValidationOracle + ?Sized> ValidationOracle for std::sync::Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn validate(&self, query: &str) -> Result<bool, OracleError> {
        (**self).validate(query)
    }

    fn check_available(&self) -> Result<(), OracleError> {
        (**self).check_available()
    }

    fn preflight(&self, probe: &str) -> Result<Preflight, OracleError> {
        (**self).preflight(probe)
    }
}
