//! Oracle backed by datafusion-sqlparser-rs
//!
//! Judges syntax only. Nothing is prepared or executed, so unknown tables
//! and columns never make a query invalid.

use crate::inspection::{QueryInspection, QueryType};
use crate::oracle::{OracleError, ValidationOracle};
use dialectcheck_core::DialectConfig;
use sqlparser::ast::Statement;
use sqlparser::dialect::{
    AnsiDialect, BigQueryDialect, Dialect, GenericDialect, MySqlDialect, PostgreSqlDialect,
    SnowflakeDialect,
};
use sqlparser::parser::{Parser, ParserError};
use sqlparser::tokenizer::{Token, Tokenizer};

/// SQL parser oracle with configurable dialect
pub struct SqlParserOracle {
    dialect: Box<dyn Dialect + Send + Sync>,
    name: String,
}

impl SqlParserOracle {
    fn with_dialect(dialect: Box<dyn Dialect + Send + Sync>, label: &str) -> Self {
        Self {
            dialect,
            name: format!("sqlparser/{}", label),
        }
    }

    /// Create an oracle for MySQL
    pub fn mysql() -> Self {
        Self::with_dialect(Box::new(MySqlDialect {}), "mysql")
    }

    /// Create an oracle for PostgreSQL
    pub fn postgres() -> Self {
        Self::with_dialect(Box::new(PostgreSqlDialect {}), "postgres")
    }

    /// Create an oracle for BigQuery
    pub fn bigquery() -> Self {
        Self::with_dialect(Box::new(BigQueryDialect {}), "bigquery")
    }

    /// Create an oracle for Snowflake
    pub fn snowflake() -> Self {
        Self::with_dialect(Box::new(SnowflakeDialect {}), "snowflake")
    }

    /// Create an oracle with the permissive generic grammar
    pub fn generic() -> Self {
        Self::with_dialect(Box::new(GenericDialect {}), "generic")
    }

    /// Create an oracle for ANSI SQL
    pub fn ansi() -> Self {
        Self::with_dialect(Box::new(AnsiDialect {}), "ansi")
    }

    /// Create an oracle from a dialect config
    pub fn from_dialect(dialect: &DialectConfig) -> Self {
        match dialect {
            DialectConfig::MySql => Self::mysql(),
            DialectConfig::Postgres => Self::postgres(),
            DialectConfig::BigQuery => Self::bigquery(),
            DialectConfig::Snowflake => Self::snowflake(),
            DialectConfig::Generic => Self::generic(),
            DialectConfig::Ansi => Self::ansi(),
        }
    }

    fn parse(&self, query: &str) -> Result<Vec<Statement>, ParserError> {
        Parser::parse_sql(&*self.dialect, query)
    }

    /// Count bind placeholders in the token stream
    fn count_placeholders(&self, query: &str) -> usize {
        Tokenizer::new(&*self.dialect, query)
            .tokenize()
            .map(|tokens| {
                tokens
                    .iter()
                    .filter(|token| matches!(token, Token::Placeholder(_)))
                    .count()
            })
            .unwrap_or(0)
    }

    /// Inspect a query: validity, statement kind, placeholders, normalized text
    pub fn inspect(&self, query: &str) -> QueryInspection {
        let query_type = QueryType::detect(query);

        match self.parse(query) {
            Ok(statements) if !statements.is_empty() => QueryInspection {
                is_valid: true,
                query_type,
                error: None,
                parameter_count: self.count_placeholders(query),
                normalized_query: Some(
                    statements
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join("; "),
                ),
                statement_count: statements.len(),
            },
            Ok(_) => QueryInspection {
                is_valid: false,
                query_type,
                error: Some("Query was empty".to_string()),
                parameter_count: 0,
                normalized_query: None,
                statement_count: 0,
            },
            Err(e) => QueryInspection {
                is_valid: false,
                query_type,
                error: Some(e.to_string()),
                parameter_count: 0,
                normalized_query: None,
                statement_count: 0,
            },
        }
    }
}

impl Default for SqlParserOracle {
    fn default() -> Self {
        Self::mysql()
    }
}

impl ValidationOracle for SqlParserOracle {
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, query: &str) -> Result<bool, OracleError> {
        match self.parse(query) {
            Ok(statements) => Ok(!statements.is_empty()),
            // The parser gave up rather than judging the query
            Err(ParserError::RecursionLimitExceeded) => Err(OracleError::Internal(
                ParserError::RecursionLimitExceeded.to_string(),
            )),
            Err(e) => {
                tracing::trace!(oracle = %self.name, error = %e, "query rejected");
                Ok(false)
            }
        }
    }
}
