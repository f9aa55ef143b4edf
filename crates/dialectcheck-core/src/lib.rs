//! dialectcheck Core
//!
//! Domain model shared by every crate in the workspace: the probe catalog,
//! per-case results, per-version summaries, tiers and the final report.
//! Nothing in here talks to an oracle; see `dialectcheck-sql` for that.

pub mod catalog;
pub mod config;
pub mod report;

pub use catalog::{Catalog, CatalogError, TestCase};
pub use config::{Config, ConfigError, DialectConfig};
pub use report::{percentage_of, CaseResult, CaseStatus, Report, Tier, VersionSummary};
