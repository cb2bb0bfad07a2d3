//! The composition point for the three operations.
//!
//! [`Arranger`] owns the category registry, the compiled filters and the run
//! options, and hands a source directory (plus a keyword, for grouping) to the
//! right component. Front ends only ever talk to this type.

use std::path::Path;
use tracing::info;

use crate::config::{ArrangerConfig, CompiledFilters};
use crate::duplicates::DuplicateFinder;
use crate::error::OrganizeResult;
use crate::file_category::CategoryRegistry;
use crate::file_organizer::FileOrganizer;
use crate::report::{
    ClassifyReport, DedupReport, GroupReport, Operation, ProgressEvent, ProgressReporter,
};
use crate::scan::ScanOrder;

/// Switches shared by every operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Plan only: nothing is created, moved or deleted.
    pub dry_run: bool,
    /// Order in which listed files are processed.
    pub order: ScanOrder,
}

/// Runs classify, group and dedup against a chosen directory.
#[derive(Debug, Clone)]
pub struct Arranger {
    registry: CategoryRegistry,
    filters: CompiledFilters,
    options: RunOptions,
}

impl Arranger {
    pub fn new(registry: CategoryRegistry, filters: CompiledFilters, options: RunOptions) -> Self {
        Self {
            registry,
            filters,
            options,
        }
    }

    /// Builds an arranger from a loaded configuration with the default registry.
    ///
    /// `dry_run` comes from the caller; the configuration may ask for path
    /// ordering, which `sort_by_path` can also force on.
    pub fn from_config(
        config: &ArrangerConfig,
        dry_run: bool,
        sort_by_path: bool,
    ) -> OrganizeResult<Self> {
        let filters = config.filters.compile()?;
        let order = if sort_by_path || config.duplicates.sort_by_path {
            ScanOrder::ByPath
        } else {
            ScanOrder::Listing
        };
        Ok(Self::new(
            CategoryRegistry::default(),
            filters,
            RunOptions { dry_run, order },
        ))
    }

    pub fn registry(&self) -> &CategoryRegistry {
        &self.registry
    }

    pub fn options(&self) -> RunOptions {
        self.options
    }

    /// Sorts the files of `dir` into category folders.
    pub fn classify(
        &self,
        dir: &Path,
        reporter: &mut dyn ProgressReporter,
    ) -> OrganizeResult<ClassifyReport> {
        let organizer = FileOrganizer::new(&self.registry, &self.filters, self.options);
        let report = organizer.classify(dir, reporter)?;
        finish(Operation::Classify, &report.summary_line(), reporter);
        Ok(report)
    }

    /// Moves the files of `dir` whose names contain `keyword` into a folder of
    /// that name. `keyword` is the raw user input; it is trimmed first.
    pub fn group_by_keyword(
        &self,
        dir: &Path,
        keyword: &str,
        reporter: &mut dyn ProgressReporter,
    ) -> OrganizeResult<GroupReport> {
        let organizer = FileOrganizer::new(&self.registry, &self.filters, self.options);
        let report = organizer.group_by_keyword(dir, keyword, reporter)?;
        finish(Operation::Group, &report.summary_line(), reporter);
        Ok(report)
    }

    /// Deletes all but one copy of every set of identical files in `dir`.
    pub fn deduplicate(
        &self,
        dir: &Path,
        reporter: &mut dyn ProgressReporter,
    ) -> OrganizeResult<DedupReport> {
        let finder = DuplicateFinder::new(&self.filters, self.options);
        let report = finder.deduplicate(dir, reporter)?;
        finish(Operation::Dedup, &report.summary_line(), reporter);
        Ok(report)
    }
}

impl Default for Arranger {
    fn default() -> Self {
        Self::new(
            CategoryRegistry::default(),
            CompiledFilters::allow_all(),
            RunOptions::default(),
        )
    }
}

fn finish(operation: Operation, summary: &str, reporter: &mut dyn ProgressReporter) {
    info!(%operation, summary, "operation finished");
    reporter.report(&ProgressEvent::Finished { operation, summary });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OrganizeError;
    use crate::report::{LineCollector, NullReporter};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_empty_path_is_no_directory_selected() {
        let arranger = Arranger::default();

        assert!(matches!(
            arranger.classify(Path::new(""), &mut NullReporter),
            Err(OrganizeError::NoDirectorySelected)
        ));
        assert!(matches!(
            arranger.group_by_keyword(Path::new(""), "report", &mut NullReporter),
            Err(OrganizeError::NoDirectorySelected)
        ));
        assert!(matches!(
            arranger.deduplicate(Path::new(""), &mut NullReporter),
            Err(OrganizeError::NoDirectorySelected)
        ));
    }

    #[test]
    fn test_empty_path_wins_over_empty_keyword() {
        let arranger = Arranger::default();
        assert!(matches!(
            arranger.group_by_keyword(Path::new(""), "  ", &mut NullReporter),
            Err(OrganizeError::NoDirectorySelected)
        ));
    }

    #[test]
    fn test_finished_event_carries_summary() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::write(temp_dir.path().join("notes.txt"), "n").unwrap();

        let arranger = Arranger::default();
        let mut collector = LineCollector::default();
        arranger
            .group_by_keyword(temp_dir.path(), "invoice", &mut collector)
            .unwrap();

        assert_eq!(
            collector.lines.last().map(String::as_str),
            Some("No files containing 'invoice' were found.")
        );
    }

    #[test]
    fn test_from_config_sort_order() {
        let config = ArrangerConfig::default();
        let listing = Arranger::from_config(&config, false, false).unwrap();
        assert_eq!(listing.options().order, ScanOrder::Listing);

        let sorted = Arranger::from_config(&config, true, true).unwrap();
        assert_eq!(sorted.options().order, ScanOrder::ByPath);
        assert!(sorted.options().dry_run);
    }
}
