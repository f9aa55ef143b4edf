use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dialectcheck_compat::{CompatHarness, CompatReport};
use dialectcheck_core::{Catalog, Config, DialectConfig};
use dialectcheck_sql::{Preflight, SqlParserOracle, ValidationOracle};

/// dialectcheck - SQL dialect-version compatibility classification
#[derive(Parser)]
#[command(name = "dialectcheck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: dialectcheck.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// SQL dialect the oracle validates against
    #[arg(short, long, global = true)]
    dialect: Option<DialectConfig>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the probe catalog and print the compatibility report (default)
    Run {
        /// Catalog file (TOML or JSON) replacing the built-in probes
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Concurrent oracle calls
        #[arg(short, long)]
        workers: Option<usize>,

        /// Also write the report as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Inspect a single query: validity, type, placeholders, normalized form
    Inspect {
        /// SQL text to inspect
        query: String,
    },

    /// List the probe catalog without validating anything
    List {
        /// Catalog file (TOML or JSON) replacing the built-in probes
        #[arg(long)]
        catalog: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    // Load config if specified
    let mut config = if let Some(config_path) = &cli.config {
        Config::from_file(config_path)
            .with_context(|| format!("Failed to load config {}", config_path.display()))?
    } else if Path::new("dialectcheck.toml").exists() {
        Config::from_file(Path::new("dialectcheck.toml"))
            .context("Failed to load dialectcheck.toml")?
    } else {
        tracing::debug!("no config file found, using defaults");
        Config::default()
    };

    if let Some(dialect) = cli.dialect {
        config.dialect = dialect;
    }

    tracing::debug!(dialect = %config.dialect, "configuration loaded");

    match cli.command.unwrap_or(Commands::Run {
        catalog: None,
        workers: None,
        json: None,
    }) {
        Commands::Run {
            catalog,
            workers,
            json,
        } => {
            if let Some(workers) = workers {
                config.workers = workers.max(1);
            }
            run_command(&config, catalog.as_deref(), json.as_deref(), !cli.no_color).await
        }
        Commands::Inspect { query } => inspect_command(&config, &query),
        Commands::List { catalog } => list_command(&config, catalog.as_deref()),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Catalog from the command line, then config, then the built-in baseline
fn load_catalog(config: &Config, override_path: Option<&Path>) -> Result<Catalog> {
    let path = override_path.map(Path::to_path_buf).or_else(|| config.catalog_path());

    match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading catalog");
            Catalog::from_file(&path)
                .with_context(|| format!("Failed to load catalog {}", path.display()))
        }
        None => Ok(Catalog::mysql_baseline()),
    }
}

/// Run command - preflight the oracle, run the catalog, render the report
async fn run_command(
    config: &Config,
    catalog_path: Option<&Path>,
    json: Option<&Path>,
    color: bool,
) -> Result<()> {
    let catalog = load_catalog(config, catalog_path)?;
    let oracle: Arc<dyn ValidationOracle> = Arc::new(SqlParserOracle::from_dialect(&config.dialect));
    let harness = CompatHarness::from_config(oracle, config);

    println!("{}", "dialectcheck Compatibility Test".bold());
    println!("{}\n", "===============================");

    println!("Current Environment:");
    println!("====================");
    match harness.preflight(&config.probe_query) {
        Ok(Preflight::Ready) => {
            println!(
                "{} Oracle {} accepts probe query: {}",
                "✓".green(),
                harness.oracle_name(),
                config.probe_query
            );
        }
        Ok(Preflight::Degraded { reason }) => {
            println!("{} Could not confirm oracle health: {}", "!".yellow(), reason);
        }
        Err(e) => {
            eprintln!("{} {}", "✗".red(), e);
            std::process::exit(1);
        }
    }
    println!();

    let report = harness.run_concurrent(&catalog).await;
    let compat = CompatReport::new(harness.oracle_name(), report)
        .with_feature_width(config.feature_width);

    compat.print_terminal_report(color);

    if let Some(path) = json {
        compat
            .save_json(path)
            .with_context(|| format!("Failed to write JSON report to {}", path.display()))?;
        println!("\nDetailed JSON report saved to: {}", path.display());
    }

    Ok(())
}

/// Inspect command - print the parse structure for one query as JSON
fn inspect_command(config: &Config, query: &str) -> Result<()> {
    let oracle = SqlParserOracle::from_dialect(&config.dialect);
    let inspection = oracle.inspect(query);

    println!("{}", serde_json::to_string_pretty(&inspection)?);
    Ok(())
}

/// List command - show the catalog grouped by version tag
fn list_command(config: &Config, catalog_path: Option<&Path>) -> Result<()> {
    let catalog = load_catalog(config, catalog_path)?;

    for tag in catalog.version_tags() {
        println!("{}", tag.cyan().bold());
        for case in catalog.iter().filter(|case| case.version_tag == tag) {
            println!("  {:<30} {}", case.feature_name, case.query.dimmed());
        }
    }

    println!("\n{} cases", catalog.len());
    Ok(())
}
