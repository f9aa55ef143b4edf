//! Syntax-validation oracles
//!
//! This crate handles:
//! - The `ValidationOracle` contract the compat harness drives
//! - A sqlparser-backed oracle with per-dialect grammars
//! - Query inspection (type, placeholders, normalized text)

pub mod inspection;
pub mod oracle;
pub mod parser;

pub use inspection::{QueryInspection, QueryType};
pub use oracle::{OracleError, Preflight, ValidationOracle};
pub use parser::SqlParserOracle;
