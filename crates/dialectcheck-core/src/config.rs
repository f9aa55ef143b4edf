//! Configuration schema (dialectcheck.toml)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default probe used by the oracle preflight check
pub const DEFAULT_PROBE_QUERY: &str = "SELECT VERSION()";

/// Default display width for feature names in the case table
pub const DEFAULT_FEATURE_WIDTH: usize = 28;

/// SQL dialect the oracle validates against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectConfig {
    /// MySQL / MariaDB
    MySql,

    /// PostgreSQL
    Postgres,

    /// BigQuery SQL dialect
    BigQuery,

    /// Snowflake SQL dialect
    Snowflake,

    /// Permissive generic grammar
    Generic,

    /// Generic ANSI SQL
    Ansi,
}

impl Default for DialectConfig {
    fn default() -> Self {
        Self::MySql
    }
}

impl DialectConfig {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::Postgres => "postgres",
            Self::BigQuery => "bigquery",
            Self::Snowflake => "snowflake",
            Self::Generic => "generic",
            Self::Ansi => "ansi",
        }
    }
}

impl std::fmt::Display for DialectConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DialectConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mysql" => Ok(Self::MySql),
            "postgres" => Ok(Self::Postgres),
            "bigquery" => Ok(Self::BigQuery),
            "snowflake" => Ok(Self::Snowflake),
            "generic" => Ok(Self::Generic),
            "ansi" => Ok(Self::Ansi),
            other => Err(ConfigError::ParseError(format!(
                "Unknown dialect: {}. Valid options: mysql, postgres, bigquery, snowflake, generic, ansi",
                other
            ))),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// SQL dialect
    #[serde(default)]
    pub dialect: DialectConfig,

    /// Concurrent oracle calls; 1 runs the catalog sequentially
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Width feature names are truncated to in the case table
    #[serde(default = "default_feature_width")]
    pub feature_width: usize,

    /// Catalog file replacing the built-in baseline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<PathBuf>,

    /// Query the preflight check must see accepted
    #[serde(default = "default_probe_query")]
    pub probe_query: String,

    /// Directory relative paths are resolved against
    #[serde(skip)]
    pub project_root: PathBuf,
}

fn default_workers() -> usize {
    1
}

fn default_feature_width() -> usize {
    DEFAULT_FEATURE_WIDTH
}

fn default_probe_query() -> String {
    DEFAULT_PROBE_QUERY.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dialect: DialectConfig::default(),
            workers: default_workers(),
            feature_width: default_feature_width(),
            catalog: None,
            probe_query: default_probe_query(),
            project_root: std::env::current_dir().unwrap_or_default(),
        }
    }
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let mut config = Self::from_toml(&contents)?;

        // Relative catalog paths are relative to the config file
        if let Some(parent) = path.parent() {
            config.project_root = parent.to_path_buf();
        }

        Ok(config)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let mut config: Config =
            toml::from_str(toml).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.project_root = std::env::current_dir().unwrap_or_default();
        config.validate()?;
        Ok(config)
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Catalog path resolved against the project root
    pub fn catalog_path(&self) -> Option<PathBuf> {
        self.catalog.as_ref().map(|path| {
            if path.is_absolute() {
                path.clone()
            } else {
                self.project_root.join(path)
            }
        })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::ParseError("workers must be at least 1".to_string()));
        }
        if self.feature_width == 0 {
            return Err(ConfigError::ParseError(
                "feature_width must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
