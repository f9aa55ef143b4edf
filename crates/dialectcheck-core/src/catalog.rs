//! Probe catalog
//!
//! A catalog is an ordered, immutable list of tagged SQL probes. Order is
//! significant: it is the order cases are validated in and the order they
//! are displayed in.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// A single compatibility probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    /// Dialect-version bucket (e.g. "5.7+"), treated as an opaque grouping key
    #[serde(rename = "version")]
    pub version_tag: String,

    /// Human-readable name of the probed feature
    #[serde(rename = "feature")]
    pub feature_name: String,

    /// Literal SQL submitted to the oracle
    pub query: String,
}

impl TestCase {
    /// Create a new test case
    pub fn new(
        version_tag: impl Into<String>,
        feature_name: impl Into<String>,
        query: impl Into<String>,
    ) -> Self {
        Self {
            version_tag: version_tag.into(),
            feature_name: feature_name.into(),
            query: query.into(),
        }
    }
}

/// Ordered, immutable collection of test cases
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    cases: Vec<TestCase>,
}

impl Catalog {
    /// Create a catalog from cases, keeping their order
    pub fn new(cases: Vec<TestCase>) -> Self {
        Self { cases }
    }

    /// Cases in canonical order
    pub fn entries(&self) -> &[TestCase] {
        &self.cases
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TestCase> {
        self.cases.iter()
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Distinct version tags in first-seen order
    pub fn version_tags(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = Vec::new();
        for case in &self.cases {
            if !tags.contains(&case.version_tag.as_str()) {
                tags.push(&case.version_tag);
            }
        }
        tags
    }

    /// Built-in MySQL probe set, from plain DML up to 8.4 syntax
    pub fn mysql_baseline() -> Self {
        Self::new(vec![
            TestCase::new(
                "5.x+",
                "Basic SELECT",
                r#"SELECT id, name FROM users WHERE status = "active""#,
            ),
            TestCase::new(
                "5.x+",
                "Basic INSERT",
                r#"INSERT INTO users (name, email) VALUES ("John", "john@example.com")"#,
            ),
            TestCase::new(
                "5.x+",
                "Basic UPDATE",
                r#"UPDATE users SET status = "active" WHERE id = 1"#,
            ),
            TestCase::new(
                "5.x+",
                "Basic DELETE",
                r#"DELETE FROM users WHERE status = "inactive""#,
            ),
            TestCase::new(
                "5.6+",
                "Simple Subquery",
                "SELECT * FROM users WHERE id IN (SELECT user_id FROM orders)",
            ),
            TestCase::new(
                "5.6+",
                "Window Functions Syntax",
                "SELECT name, ROW_NUMBER() OVER (ORDER BY id) as row_num FROM users",
            ),
            TestCase::new(
                "5.7+",
                "JSON Functions",
                r#"SELECT JSON_EXTRACT(data, "$.type") as user_type FROM users"#,
            ),
            TestCase::new(
                "5.7+",
                "Generated Columns",
                r#"ALTER TABLE users ADD COLUMN full_name VARCHAR(100) GENERATED ALWAYS AS (CONCAT(first_name, " ", last_name))"#,
            ),
            TestCase::new(
                "8.0+",
                "Common Table Expressions",
                "WITH user_stats AS (SELECT id, name FROM users) SELECT * FROM user_stats",
            ),
            TestCase::new(
                "8.0+",
                "Window Functions Advanced",
                "SELECT name, RANK() OVER (PARTITION BY department ORDER BY salary DESC) as rank FROM employees",
            ),
            TestCase::new("8.0+", "Roles Syntax", "CREATE ROLE app_read, app_write"),
            TestCase::new(
                "8.4+",
                "Multi-Value Index Syntax",
                r#"CREATE INDEX idx_tags ON articles((CAST(tags->"$[*]" AS CHAR(50) ARRAY)))"#,
            ),
        ])
    }

    /// Load a catalog file; `.json` is read as JSON, anything else as TOML
    pub fn from_file(path: &Path) -> Result<Self, CatalogError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::IoError(format!("{}: {}", path.display(), e)))?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&contents),
            _ => Self::from_toml(&contents),
        }
    }

    /// Parse a catalog from TOML (`[[cases]]` tables)
    pub fn from_toml(toml: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog =
            toml::from_str(toml).map_err(|e| CatalogError::ParseError(e.to_string()))?;
        catalog.validated()
    }

    /// Parse a catalog from JSON (`{"cases": [...]}`)
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog =
            serde_json::from_str(json).map_err(|e| CatalogError::ParseError(e.to_string()))?;
        catalog.validated()
    }

    fn validated(self) -> Result<Self, CatalogError> {
        for (index, case) in self.cases.iter().enumerate() {
            if case.version_tag.trim().is_empty() {
                return Err(CatalogError::InvalidCase { index, field: "version" });
            }
            if case.query.trim().is_empty() {
                return Err(CatalogError::InvalidCase { index, field: "query" });
            }
        }
        Ok(self)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a TestCase;
    type IntoIter = std::slice::Iter<'a, TestCase>;

    fn into_iter(self) -> Self::IntoIter {
        self.cases.iter()
    }
}

/// Catalog loading errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Case #{index} has an empty `{field}`")]
    InvalidCase { index: usize, field: &'static str },
}
