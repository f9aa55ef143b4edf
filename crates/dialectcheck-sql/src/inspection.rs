//! Query inspection results
//!
//! A richer view of one query than the plain validity bit: the kind of
//! statement, how many bind placeholders it carries and the canonical text
//! the parser renders it back to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Statement kind, derived from the leading keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QueryType {
    Unknown,
    Select,
    Insert,
    Update,
    Delete,
    Create,
    Drop,
    Alter,
    Show,
    Describe,
    Explain,
}

impl QueryType {
    /// Classify by the first keyword, ignoring leading whitespace and case.
    ///
    /// Works on invalid SQL too; it never consults the parser.
    pub fn detect(query: &str) -> Self {
        let keyword: String = query
            .trim_start()
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_ascii_uppercase();

        match keyword.as_str() {
            "SELECT" => QueryType::Select,
            "INSERT" => QueryType::Insert,
            "UPDATE" => QueryType::Update,
            "DELETE" => QueryType::Delete,
            "CREATE" => QueryType::Create,
            "DROP" => QueryType::Drop,
            "ALTER" => QueryType::Alter,
            "SHOW" => QueryType::Show,
            "DESCRIBE" => QueryType::Describe,
            "EXPLAIN" => QueryType::Explain,
            _ => QueryType::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::Unknown => "UNKNOWN",
            QueryType::Select => "SELECT",
            QueryType::Insert => "INSERT",
            QueryType::Update => "UPDATE",
            QueryType::Delete => "DELETE",
            QueryType::Create => "CREATE",
            QueryType::Drop => "DROP",
            QueryType::Alter => "ALTER",
            QueryType::Show => "SHOW",
            QueryType::Describe => "DESCRIBE",
            QueryType::Explain => "EXPLAIN",
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the oracle can say about one query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryInspection {
    pub is_valid: bool,

    pub query_type: QueryType,

    /// Parser message when the query was rejected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Number of bind placeholders (`?`, `$1`, `:name`)
    pub parameter_count: usize,

    /// Canonical rendering of the parsed statements (valid queries only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalized_query: Option<String>,

    /// Number of statements the query parsed into
    pub statement_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_leading_keyword() {
        assert_eq!(QueryType::detect("SELECT 1"), QueryType::Select);
        assert_eq!(QueryType::detect("  \n\tinsert into t values (1)"), QueryType::Insert);
        assert_eq!(QueryType::detect("Describe users"), QueryType::Describe);
        assert_eq!(QueryType::detect("EXPLAIN SELECT 1"), QueryType::Explain);
        assert_eq!(QueryType::detect("WITH t AS (SELECT 1) SELECT 1"), QueryType::Unknown);
        assert_eq!(QueryType::detect(""), QueryType::Unknown);
    }

    #[test]
    fn detect_requires_whole_keyword() {
        assert_eq!(QueryType::detect("SELECTED"), QueryType::Unknown);
        assert_eq!(QueryType::detect("DROP("), QueryType::Drop);
    }

    #[test]
    fn detect_ignores_validity() {
        assert_eq!(QueryType::detect("SELECT FROM WHERE"), QueryType::Select);
    }

    #[test]
    fn query_type_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&QueryType::Alter).ok(),
            Some("\"ALTER\"".to_string())
        );
    }
}
