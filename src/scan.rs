//! Directory snapshots.
//!
//! Every operation starts from a fresh listing of the direct children of the
//! source directory. Only regular files are kept; directories and symlinks
//! are never moved, hashed, or descended into. The snapshot may go stale
//! while a batch runs, so consumers must treat a missing entry as a skip.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::CompiledFilters;
use crate::error::{OrganizeError, OrganizeResult};

/// A regular file directly inside the source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    /// Full path to the file.
    pub path: PathBuf,
    /// The filename, lossily converted for matching.
    pub file_name: String,
}

/// Ordering applied to a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScanOrder {
    /// Whatever order the filesystem lists entries in.
    #[default]
    Listing,
    /// Sorted by path.
    ByPath,
}

/// Checks that `dir` names an existing directory.
pub fn validate_source_dir(dir: &Path) -> OrganizeResult<()> {
    if dir.as_os_str().is_empty() {
        return Err(OrganizeError::NoDirectorySelected);
    }

    let metadata = fs::metadata(dir).map_err(|source| OrganizeError::InvalidBasePath {
        path: dir.to_path_buf(),
        source,
    })?;

    if !metadata.is_dir() {
        return Err(OrganizeError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    Ok(())
}

/// Lists the eligible regular files directly inside `dir`.
///
/// Entries that cannot be read while listing are skipped, as are entries
/// rejected by `filters`.
pub fn list_source_files(
    dir: &Path,
    filters: &CompiledFilters,
    order: ScanOrder,
) -> OrganizeResult<Vec<SourceEntry>> {
    let entries = fs::read_dir(dir).map_err(|source| OrganizeError::ReadDirFailed {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries.flatten() {
        if let Ok(file_type) = entry.file_type()
            && file_type.is_file()
        {
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if filters.should_include(&file_name) {
                files.push(SourceEntry {
                    path: entry.path(),
                    file_name,
                });
            } else {
                debug!(file = %file_name, "excluded by filters");
            }
        }
    }

    if order == ScanOrder::ByPath {
        files.sort_by(|a, b| a.path.cmp(&b.path));
    }

    debug!(dir = %dir.display(), count = files.len(), "listed source files");
    Ok(files)
}

/// Returns true if something still exists at `path`, without following symlinks.
pub(crate) fn still_exists(path: &Path) -> io::Result<bool> {
    match fs::symlink_metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
