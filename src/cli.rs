//! Command-line interface module for arranger.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Loading the optional configuration file
//! - Dispatching to the [`Arranger`]
//! - Rendering results as colored text or JSON

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::arranger::Arranger;
use crate::config::ArrangerConfig;
use crate::error::OrganizeError;
use crate::file_category::{CategoryRegistry, CategoryRule};
use crate::output::{ConsoleReporter, OutputFormatter};
use crate::report::{
    ClassifyReport, DedupReport, GroupReport, NullReporter, Operation, ProgressReporter,
};

#[derive(Debug, Parser)]
#[command(name = "arranger")]
#[command(about = "Sort files into category folders, group them by keyword, remove duplicates")]
#[command(version)]
pub struct Cli {
    /// Show what would happen without creating, moving or deleting anything
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Print the final report as JSON instead of progress lines
    #[arg(long, global = true)]
    pub json: bool,

    /// Process files in path order instead of directory-listing order
    #[arg(long, global = true)]
    pub sort_by_path: bool,

    /// TOML configuration file with scan filters
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose diagnostics on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: ArrangeCommand,
}

/// Represents a CLI command to execute.
#[derive(Debug, Clone, Subcommand)]
pub enum ArrangeCommand {
    /// Move files into category folders by extension
    Classify {
        /// Directory to organize
        dir: Option<PathBuf>,
    },
    /// Move files whose names contain a keyword into a folder of that name
    Group {
        /// Directory to organize
        dir: Option<PathBuf>,

        /// Substring to look for in filenames
        #[arg(short, long)]
        keyword: Option<String>,
    },
    /// Delete files whose content duplicates another file
    Dedup {
        /// Directory to clean up
        dir: Option<PathBuf>,
    },
    /// List the category rules in the order they are tried
    Rules,
}

/// Errors surfaced by the CLI layer.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Organize(#[from] OrganizeError),

    #[error("Failed to render JSON: {0}")]
    Render(#[from] serde_json::Error),
}

/// How a run ended, for choosing the exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every file was handled.
    Complete,
    /// At least one file failed; the rest were handled.
    PartialFailure,
}

/// JSON envelope for a finished operation.
#[derive(Serialize)]
struct RunDocument<'a, R: Serialize> {
    operation: Operation,
    directory: &'a Path,
    started_at: DateTime<Utc>,
    report: &'a R,
}

/// Runs the parsed command line.
///
/// # Examples
///
/// ```no_run
/// use arranger::cli::{Cli, run_cli};
/// use clap::Parser;
///
/// let cli = Cli::parse_from(["arranger", "dedup", "/path/to/directory", "--dry-run"]);
/// match run_cli(&cli) {
///     Ok(status) => println!("Finished: {:?}", status),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(cli: &Cli) -> Result<RunStatus, CliError> {
    let mut console = ConsoleReporter::new();
    let mut silent = NullReporter;
    let reporter: &mut dyn ProgressReporter = if cli.json {
        &mut silent
    } else {
        &mut console
    };

    let started_at = Utc::now();
    match &cli.command {
        ArrangeCommand::Classify { dir } => {
            let dir = dir.clone().unwrap_or_default();
            let report = build_arranger(cli)?.classify(&dir, reporter)?;
            if cli.json {
                print_json(Operation::Classify, &dir, started_at, &report)?;
            } else {
                render_classify(&report);
            }
            Ok(status_of(report.failures().count()))
        }
        ArrangeCommand::Group { dir, keyword } => {
            let dir = dir.clone().unwrap_or_default();
            let keyword = keyword.as_deref().unwrap_or_default();
            let report = build_arranger(cli)?.group_by_keyword(&dir, keyword, reporter)?;
            if cli.json {
                print_json(Operation::Group, &dir, started_at, &report)?;
            } else {
                render_group(&report);
            }
            Ok(status_of(report.failures().count()))
        }
        ArrangeCommand::Dedup { dir } => {
            let dir = dir.clone().unwrap_or_default();
            let report = build_arranger(cli)?.deduplicate(&dir, reporter)?;
            if cli.json {
                print_json(Operation::Dedup, &dir, started_at, &report)?;
            } else {
                render_dedup(&report);
            }
            Ok(status_of(report.failures().count()))
        }
        ArrangeCommand::Rules => print_rules(&CategoryRegistry::default(), cli.json),
    }
}

fn build_arranger(cli: &Cli) -> Result<Arranger, CliError> {
    let config = ArrangerConfig::load(cli.config.as_deref()).map_err(OrganizeError::from)?;
    Ok(Arranger::from_config(&config, cli.dry_run, cli.sort_by_path)?)
}

fn status_of(failures: usize) -> RunStatus {
    if failures == 0 {
        RunStatus::Complete
    } else {
        RunStatus::PartialFailure
    }
}

fn print_json<R: Serialize>(
    operation: Operation,
    directory: &Path,
    started_at: DateTime<Utc>,
    report: &R,
) -> Result<(), CliError> {
    let document = RunDocument {
        operation,
        directory,
        started_at,
        report,
    };
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(())
}

fn print_rules(registry: &CategoryRegistry, json: bool) -> Result<RunStatus, CliError> {
    if json {
        let rules: &[CategoryRule] = registry.rules();
        println!("{}", serde_json::to_string_pretty(rules)?);
    } else {
        OutputFormatter::rules_table(registry);
    }
    Ok(RunStatus::Complete)
}

fn render_classify(report: &ClassifyReport) {
    let counts = report.category_counts();
    if !counts.is_empty() {
        OutputFormatter::summary_table(&counts, report.planned_count());
    }
    if report.dry_run {
        OutputFormatter::dry_run_notice("No files were modified.");
    }
    if report.failures().next().is_some() {
        OutputFormatter::warning("Some files could not be organized. Please review errors above.");
    }
}

fn render_group(report: &GroupReport) {
    if report.dry_run {
        OutputFormatter::dry_run_notice("No files were modified.");
    }
    if report.failures().next().is_some() {
        OutputFormatter::warning("Some files could not be moved. Please review errors above.");
    }
}

fn render_dedup(report: &DedupReport) {
    if report.groups_found > 0 {
        OutputFormatter::plain(&format!(
            "{} duplicate groups, {} files deleted",
            report.groups_found, report.deleted_count
        ));
    }
    if report.dry_run {
        OutputFormatter::dry_run_notice("No files were deleted.");
    }
    if report.failures().next().is_some() {
        OutputFormatter::warning("Some duplicates could not be removed. Please review errors above.");
    }
}
