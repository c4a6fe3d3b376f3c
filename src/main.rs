//! Briefpost CLI entry point.
//!
//! Provides `check`, `reconcile`, and `config` subcommands for validating
//! record files at the boundary, matching briefs against their processed
//! outcomes, and inspecting the resolved configuration.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::info;

use briefpost::config::BriefpostConfig;
use briefpost::reconcile::reconcile;
use briefpost::types::{Brief, Processed};

/// Briefpost — boundary tooling for the brief delivery contract.
#[derive(Parser)]
#[command(name = "briefpost", version, about)]
struct Cli {
    /// Also write JSON logs to the configured logs directory.
    #[arg(long, global = true)]
    log_to_file: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Command {
    /// Validate a record file against the contract.
    Check {
        /// What kind of records the file holds.
        #[command(subcommand)]
        kind: CheckKind,
    },
    /// Match succeeded briefs to processed outcome records by hash.
    Reconcile {
        /// JSON array of wire briefs.
        #[arg(long)]
        briefs: PathBuf,
        /// JSON array of processed records.
        #[arg(long)]
        processed: PathBuf,
    },
    /// Print the resolved configuration (api_key redacted).
    Config,
}

/// Record kinds accepted by `check`.
#[derive(Subcommand)]
enum CheckKind {
    /// A JSON array of wire briefs.
    Briefs {
        /// Path to the file.
        file: PathBuf,
    },
    /// A JSON array of processed outcome records.
    Processed {
        /// Path to the file.
        file: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Config before logging: the logs directory comes from config.
    let config = BriefpostConfig::load().context("failed to load configuration")?;
    let _logging_guard = if cli.log_to_file {
        Some(briefpost::logging::init_production(Path::new(
            &config.paths.logs_dir,
        ))?)
    } else {
        briefpost::logging::init_cli();
        None
    };

    match cli.command {
        Command::Check { kind } => match kind {
            CheckKind::Briefs { file } => handle_check::<Brief>(&file, "brief"),
            CheckKind::Processed { file } => handle_check::<Processed>(&file, "processed record"),
        },
        Command::Reconcile { briefs, processed } => handle_reconcile(&briefs, &processed),
        Command::Config => handle_config(&config),
    }
}

/// Anything with a boundary validation rule.
trait Checked {
    /// Run the record's validation rules.
    fn check(&self) -> Result<(), briefpost::validate::ValidationError>;
}

impl Checked for Brief {
    fn check(&self) -> Result<(), briefpost::validate::ValidationError> {
        self.validate()
    }
}

impl Checked for Processed {
    fn check(&self) -> Result<(), briefpost::validate::ValidationError> {
        self.validate()
    }
}

/// Parse a JSON array of records and validate each one.
///
/// Structural contract violations (conflicting outcomes, unknown statuses)
/// fail the parse outright; rule violations are reported per record.
fn handle_check<T>(file: &Path, label: &str) -> anyhow::Result<()>
where
    T: serde::de::DeserializeOwned + Checked,
{
    let records: Vec<T> = read_records(file)?;
    let mut failures = 0usize;
    for (index, record) in records.iter().enumerate() {
        if let Err(e) = record.check() {
            eprintln!("{}: {label} {index}: {e}", file.display());
            failures = failures.saturating_add(1);
        }
    }
    if failures > 0 {
        bail!(
            "{failures} of {} {label}(s) failed validation",
            records.len()
        );
    }
    println!("{}: {} {label}(s) OK", file.display(), records.len());
    Ok(())
}

/// Reconcile briefs against processed records and print the report.
fn handle_reconcile(briefs_path: &Path, processed_path: &Path) -> anyhow::Result<()> {
    let briefs: Vec<Brief> = read_records(briefs_path)?;
    let processed: Vec<Processed> = read_records(processed_path)?;
    info!(
        briefs = briefs.len(),
        processed = processed.len(),
        "reconciling"
    );

    let report = reconcile(&briefs, &processed);
    println!(
        "{}",
        serde_json::to_string_pretty(&report).context("failed to serialize report")?
    );
    if !report.is_settled() {
        bail!("reconciliation is not settled");
    }
    Ok(())
}

/// Print the resolved configuration. The `Debug` impl redacts the api_key.
fn handle_config(config: &BriefpostConfig) -> anyhow::Result<()> {
    if let Err(e) = config.endpoint.validate() {
        tracing::warn!(error = %e, "endpoint configuration is incomplete");
    }
    println!("{config:#?}");
    Ok(())
}

/// Read a JSON array of records from a file.
fn read_records<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<Vec<T>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse {}", path.display()))
}
