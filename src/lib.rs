//! arranger - sort, group and de-duplicate the files of a directory
//!
//! This library classifies files into category folders by filename suffix,
//! gathers files whose names contain a keyword into one folder, and removes
//! files whose content duplicates another file. Only the direct children of
//! the chosen directory are considered, and every operation reports a
//! per-file outcome instead of stopping at the first failure.

pub mod arranger;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod file_category;
pub mod file_organizer;
pub mod logging;
pub mod output;
pub mod report;
pub mod scan;

pub use arranger::{Arranger, RunOptions};
pub use config::{ArrangerConfig, CompiledFilters, ConfigError};
pub use duplicates::{ContentFingerprint, DuplicateFinder, DuplicateGroup};
pub use error::{FileError, OrganizeError, OrganizeResult};
pub use file_category::{CategoryRegistry, CategoryRule};
pub use file_organizer::FileOrganizer;
pub use report::{
    ClassifyReport, DedupReport, FileOutcome, FileStatus, GroupReport, ProgressEvent,
    ProgressReporter,
};
pub use scan::ScanOrder;
