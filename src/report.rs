//! Structured results and progress events.
//!
//! Each operation returns a report describing what happened to every file it
//! looked at, and streams [`ProgressEvent`]s to a [`ProgressReporter`] while it
//! runs. Presentation (console, JSON) lives outside the library.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::duplicates::DuplicateGroup;
use crate::error::FileError;

/// The three top-level operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Classify,
    Group,
    Dedup,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Classify => "classify",
            Operation::Group => "group",
            Operation::Dedup => "dedup",
        };
        f.write_str(name)
    }
}

/// What happened to a single file.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    /// Relocated into a subfolder.
    Moved { destination: PathBuf },
    /// Would be relocated (dry run).
    WouldMove { destination: PathBuf },
    /// No category rule matched; the file was not touched.
    Untouched,
    /// Removed as a duplicate of `survivor`.
    Deleted { survivor: PathBuf },
    /// Would be removed as a duplicate of `survivor` (dry run).
    WouldDelete { survivor: PathBuf },
    /// The file was listed but gone by the time it was processed.
    Vanished,
    /// Processing this file failed; the batch continued.
    Failed { error: FileError },
}

/// Per-file result inside a report.
#[derive(Debug, Serialize)]
pub struct FileOutcome {
    /// Path of the file as it was listed.
    pub path: PathBuf,
    /// Target folder name (category or keyword), when one applies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    #[serde(flatten)]
    pub status: FileStatus,
}

impl FileOutcome {
    pub fn new(path: impl Into<PathBuf>, folder: Option<&str>, status: FileStatus) -> Self {
        Self {
            path: path.into(),
            folder: folder.map(str::to_string),
            status,
        }
    }

    pub fn is_moved(&self) -> bool {
        matches!(self.status, FileStatus::Moved { .. })
    }

    pub fn is_planned(&self) -> bool {
        matches!(
            self.status,
            FileStatus::WouldMove { .. } | FileStatus::WouldDelete { .. }
        )
    }

    /// Returns the error, if this file failed.
    pub fn error(&self) -> Option<&FileError> {
        match &self.status {
            FileStatus::Failed { error } => Some(error),
            _ => None,
        }
    }

    fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

impl fmt::Display for FileOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.display_name();
        let folder = self.folder.as_deref().unwrap_or("?");
        match &self.status {
            FileStatus::Moved { .. } => write!(f, "Moved {} to {}", name, folder),
            FileStatus::WouldMove { .. } => write!(f, "Would move {} to {}", name, folder),
            FileStatus::Untouched => write!(f, "Left {} in place (no matching category)", name),
            FileStatus::Deleted { .. } => write!(f, "Deleted {}", self.path.display()),
            FileStatus::WouldDelete { .. } => {
                write!(f, "Would delete {}", self.path.display())
            }
            FileStatus::Vanished => write!(f, "Skipped {}: no longer present", name),
            FileStatus::Failed { error } => write!(f, "Error on {}: {}", name, error),
        }
    }
}

/// Result of classifying a directory.
#[derive(Debug, Serialize)]
pub struct ClassifyReport {
    pub dry_run: bool,
    pub moved_count: usize,
    pub outcomes: Vec<FileOutcome>,
}

impl ClassifyReport {
    /// Number of files moved, or that would be moved in a dry run.
    pub fn planned_count(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.is_moved() || o.is_planned())
            .count()
    }

    /// Files per category folder, counting moved and planned files.
    pub fn category_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for outcome in self
            .outcomes
            .iter()
            .filter(|o| o.is_moved() || o.is_planned())
        {
            if let Some(folder) = &outcome.folder {
                *counts.entry(folder.clone()).or_insert(0) += 1;
            }
        }
        counts
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| o.error().is_some())
    }

    pub fn summary_line(&self) -> String {
        if self.dry_run {
            format!("Would move {} files.", self.planned_count())
        } else if self.moved_count == 0 {
            "No files were moved.".to_string()
        } else {
            format!("Moved {} files.", self.moved_count)
        }
    }
}

/// Result of grouping files by keyword.
#[derive(Debug, Serialize)]
pub struct GroupReport {
    pub dry_run: bool,
    /// The trimmed keyword.
    pub keyword: String,
    /// The keyword folder.
    pub folder: PathBuf,
    pub moved_count: usize,
    /// Outcomes for the files whose names contain the keyword.
    pub matched: Vec<FileOutcome>,
}

impl GroupReport {
    pub fn has_matches(&self) -> bool {
        !self.matched.is_empty()
    }

    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.matched.iter().filter(|o| o.error().is_some())
    }

    pub fn summary_line(&self) -> String {
        if !self.has_matches() {
            format!("No files containing '{}' were found.", self.keyword)
        } else if self.dry_run {
            format!(
                "Would move {} files to '{}' folder.",
                self.matched.iter().filter(|o| o.is_planned()).count(),
                self.keyword
            )
        } else {
            format!(
                "Moved {} files to '{}' folder.",
                self.moved_count, self.keyword
            )
        }
    }
}

/// Result of removing duplicates.
#[derive(Debug, Serialize)]
pub struct DedupReport {
    pub dry_run: bool,
    /// Number of fingerprints shared by two or more files.
    pub groups_found: usize,
    pub deleted_count: usize,
    /// Paths actually deleted, in deletion order.
    pub deletions: Vec<PathBuf>,
    /// Every duplicate group, survivor first.
    pub groups: Vec<DuplicateGroup>,
    /// Deletions, planned deletions, and per-file failures.
    pub outcomes: Vec<FileOutcome>,
}

impl DedupReport {
    pub fn failures(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| o.error().is_some())
    }

    pub fn summary_line(&self) -> String {
        if self.groups_found == 0 {
            "No duplicate files found.".to_string()
        } else if self.dry_run {
            format!(
                "Would delete {} duplicate files.",
                self.outcomes.iter().filter(|o| o.is_planned()).count()
            )
        } else {
            format!("Deleted {} duplicate files.", self.deleted_count)
        }
    }
}

/// Progress notifications emitted while an operation runs.
#[derive(Debug)]
pub enum ProgressEvent<'a> {
    /// The directory was listed; `files` entries will be processed.
    Started {
        operation: Operation,
        dir: &'a Path,
        files: usize,
    },
    /// One file was handled.
    File(&'a FileOutcome),
    /// A fingerprint shared by several files was found.
    DuplicateGroupFound(&'a DuplicateGroup),
    /// The operation completed.
    Finished {
        operation: Operation,
        summary: &'a str,
    },
}

impl fmt::Display for ProgressEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProgressEvent::Started {
                operation,
                dir,
                files,
            } => write!(
                f,
                "Running {} on {} ({} files)",
                operation,
                dir.display(),
                files
            ),
            ProgressEvent::File(outcome) => write!(f, "{}", outcome),
            ProgressEvent::DuplicateGroupFound(group) => write!(
                f,
                "Found {} duplicates for hash {}:",
                group.members.len(),
                group.fingerprint
            ),
            ProgressEvent::Finished { summary, .. } => f.write_str(summary),
        }
    }
}

/// Receives progress events from a running operation.
pub trait ProgressReporter {
    fn report(&mut self, event: &ProgressEvent<'_>);
}

impl<F> ProgressReporter for F
where
    F: FnMut(&ProgressEvent<'_>),
{
    fn report(&mut self, event: &ProgressEvent<'_>) {
        self(event)
    }
}

/// Discards every event.
#[derive(Debug, Default)]
pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn report(&mut self, _event: &ProgressEvent<'_>) {}
}

/// Keeps the rendered line of every event.
#[derive(Debug, Default)]
pub struct LineCollector {
    pub lines: Vec<String>,
}

impl ProgressReporter for LineCollector {
    fn report(&mut self, event: &ProgressEvent<'_>) {
        self.lines.push(event.to_string());
    }
}
