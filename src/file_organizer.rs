//! Moving files into category and keyword folders.
//!
//! Both [`FileOrganizer::classify`] and [`FileOrganizer::group_by_keyword`]
//! walk a fresh snapshot of the source directory and relocate matching files
//! into a subfolder, keeping their names. Files are handled one at a time and
//! a failure on one file never stops the batch.
//!
//! Collision policy: a file is never moved onto an existing entry. If the
//! destination name is taken, the file stays where it is and the outcome is a
//! `NameCollision` failure. Same-volume moves link the file under its new name
//! before unlinking the old one, so an entry that appears at the destination
//! after the collision check is still never replaced. Filesystems without hard
//! links fall back to `rename`, which leaves that narrow window open.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::arranger::RunOptions;
use crate::config::CompiledFilters;
use crate::duplicates::ContentFingerprint;
use crate::error::{FileError, OrganizeError, OrganizeResult};
use crate::file_category::CategoryRegistry;
use crate::report::{
    ClassifyReport, FileOutcome, FileStatus, GroupReport, Operation, ProgressEvent,
    ProgressReporter,
};
use crate::scan::{self, SourceEntry};

/// Result of a successful call to [`relocate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Relocation {
    /// The file now lives at this path.
    Moved(PathBuf),
    /// The source was already gone; nothing happened.
    Vanished,
}

/// Moves `file` into `dest_dir`, keeping its filename.
///
/// A same-volume move links the file at its destination and then removes the
/// old name. When source and destination are on different volumes, the file
/// is copied into a newly created destination, the copy is checked against
/// the source, and only then is the source removed.
///
/// `dest_dir` must already exist.
///
/// # Errors
///
/// * [`FileError::NameCollision`] if the destination name is taken
/// * [`FileError::MoveFailed`] if the rename or copy fails
/// * [`FileError::CopyVerificationFailed`] if a cross-volume copy differs from its source
pub fn relocate(file: &Path, dest_dir: &Path) -> Result<Relocation, FileError> {
    let file_name = file.file_name().ok_or_else(|| {
        move_failed(
            dest_dir,
            io::Error::new(io::ErrorKind::InvalidInput, "file has no name component"),
        )
    })?;
    let destination = dest_dir.join(file_name);

    if !scan::still_exists(file).map_err(|e| move_failed(&destination, e))? {
        return Ok(Relocation::Vanished);
    }

    if scan::still_exists(&destination).map_err(|e| move_failed(&destination, e))? {
        return Err(FileError::NameCollision { destination });
    }

    match fs::hard_link(file, &destination) {
        Ok(()) => {
            if let Err(e) = fs::remove_file(file) {
                discard_copy(&destination);
                return Err(move_failed(&destination, e));
            }
            Ok(Relocation::Moved(destination))
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            Err(FileError::NameCollision { destination })
        }
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!(file = %file.display(), "cross-volume move, copying");
            copy_then_remove(file, &destination)?;
            Ok(Relocation::Moved(destination))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound && !file.exists() => {
            Ok(Relocation::Vanished)
        }
        Err(e) => {
            debug!(file = %file.display(), error = %e, "hard link refused, renaming");
            rename_into(file, destination)
        }
    }
}

fn rename_into(file: &Path, destination: PathBuf) -> Result<Relocation, FileError> {
    if scan::still_exists(&destination).map_err(|e| move_failed(&destination, e))? {
        return Err(FileError::NameCollision { destination });
    }
    match fs::rename(file, &destination) {
        Ok(()) => Ok(Relocation::Moved(destination)),
        Err(e) if e.kind() == io::ErrorKind::NotFound && !file.exists() => {
            Ok(Relocation::Vanished)
        }
        Err(e) => Err(move_failed(&destination, e)),
    }
}

fn move_failed(destination: &Path, source: io::Error) -> FileError {
    FileError::MoveFailed {
        destination: destination.to_path_buf(),
        source,
    }
}

/// Copies `source` to the new path `destination`, verifies the copy, then
/// removes `source`.
///
/// On any failure the partial or unverified copy is removed and `source` is
/// left untouched.
pub(crate) fn copy_then_remove(source: &Path, destination: &Path) -> Result<(), FileError> {
    {
        let mut reader = File::open(source).map_err(|e| move_failed(destination, e))?;
        let mut writer = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(destination)
        {
            Ok(writer) => writer,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(FileError::NameCollision {
                    destination: destination.to_path_buf(),
                });
            }
            Err(e) => return Err(move_failed(destination, e)),
        };

        let copied = io::copy(&mut reader, &mut writer).and_then(|_| writer.sync_all());
        if let Err(e) = copied {
            discard_copy(destination);
            return Err(move_failed(destination, e));
        }
    }

    match fs::metadata(source) {
        Ok(metadata) => {
            if let Err(e) = fs::set_permissions(destination, metadata.permissions()) {
                warn!(path = %destination.display(), error = %e, "could not copy permissions");
            }
        }
        Err(e) => {
            warn!(path = %source.display(), error = %e, "could not read source permissions");
        }
    }

    match copies_match(source, destination) {
        Ok(true) => {}
        Ok(false) => {
            discard_copy(destination);
            return Err(FileError::CopyVerificationFailed {
                destination: destination.to_path_buf(),
            });
        }
        Err(e) => {
            discard_copy(destination);
            return Err(move_failed(destination, e));
        }
    }

    if let Err(e) = fs::remove_file(source) {
        discard_copy(destination);
        return Err(move_failed(destination, e));
    }

    Ok(())
}

fn copies_match(a: &Path, b: &Path) -> io::Result<bool> {
    if fs::metadata(a)?.len() != fs::metadata(b)?.len() {
        return Ok(false);
    }
    Ok(ContentFingerprint::of_file(a)? == ContentFingerprint::of_file(b)?)
}

fn discard_copy(destination: &Path) {
    if let Err(e) = fs::remove_file(destination) {
        warn!(path = %destination.display(), error = %e, "could not remove partial copy");
    }
}

/// Creates `dir` if needed. Succeeds silently if it already exists.
fn ensure_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

/// Checks a raw keyword and returns its trimmed form.
///
/// # Errors
///
/// * [`OrganizeError::EmptyKeyword`] if nothing is left after trimming
/// * [`OrganizeError::InvalidKeyword`] if the keyword cannot name a direct child
///   folder: `.`, `..`, or anything holding a path separator of this platform
///   (`/`, plus `\` on Windows)
pub fn normalize_keyword(raw: &str) -> OrganizeResult<&str> {
    let keyword = raw.trim();
    if keyword.is_empty() {
        return Err(OrganizeError::EmptyKeyword);
    }
    if keyword == "." || keyword == ".." || keyword.chars().any(std::path::is_separator) {
        return Err(OrganizeError::InvalidKeyword {
            keyword: keyword.to_string(),
        });
    }
    Ok(keyword)
}

/// Relocates files from a source directory into named subfolders.
pub struct FileOrganizer<'a> {
    registry: &'a CategoryRegistry,
    filters: &'a CompiledFilters,
    options: RunOptions,
}

impl<'a> FileOrganizer<'a> {
    pub fn new(
        registry: &'a CategoryRegistry,
        filters: &'a CompiledFilters,
        options: RunOptions,
    ) -> Self {
        Self {
            registry,
            filters,
            options,
        }
    }

    /// Moves every file whose name matches a category rule into that
    /// category's folder under `dir`.
    ///
    /// Category folders are created on demand. Files without a matching rule
    /// are reported as untouched. Folders are never moved or descended into,
    /// so a second run right after the first moves nothing.
    ///
    /// # Errors
    ///
    /// Fails only if `dir` is empty, missing, or cannot be listed.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use arranger::arranger::RunOptions;
    /// use arranger::config::CompiledFilters;
    /// use arranger::file_category::CategoryRegistry;
    /// use arranger::file_organizer::FileOrganizer;
    /// use arranger::report::NullReporter;
    /// use std::path::Path;
    ///
    /// let registry = CategoryRegistry::default();
    /// let filters = CompiledFilters::allow_all();
    /// let organizer = FileOrganizer::new(&registry, &filters, RunOptions::default());
    /// let report = organizer.classify(Path::new("/path/to/downloads"), &mut NullReporter)?;
    /// println!("Moved {} files", report.moved_count);
    /// # Ok::<(), arranger::error::OrganizeError>(())
    /// ```
    pub fn classify(
        &self,
        dir: &Path,
        reporter: &mut dyn ProgressReporter,
    ) -> OrganizeResult<ClassifyReport> {
        scan::validate_source_dir(dir)?;
        let entries = scan::list_source_files(dir, self.filters, self.options.order)?;
        reporter.report(&ProgressEvent::Started {
            operation: Operation::Classify,
            dir,
            files: entries.len(),
        });

        let mut outcomes = Vec::with_capacity(entries.len());
        let mut moved_count = 0;

        for entry in &entries {
            let outcome = match self.registry.resolve_category(&entry.file_name) {
                Some(category) => self.move_into(dir, entry, category),
                None => {
                    debug!(file = %entry.file_name, "no matching category");
                    FileOutcome::new(&entry.path, None, FileStatus::Untouched)
                }
            };
            if outcome.is_moved() {
                moved_count += 1;
            }
            reporter.report(&ProgressEvent::File(&outcome));
            outcomes.push(outcome);
        }

        info!(dir = %dir.display(), moved_count, "classification finished");
        Ok(ClassifyReport {
            dry_run: self.options.dry_run,
            moved_count,
            outcomes,
        })
    }

    /// Moves every file whose name contains `keyword` into a folder named
    /// after the trimmed keyword.
    ///
    /// Matching is a case-sensitive substring test. The keyword folder is
    /// created even when nothing matches.
    ///
    /// # Errors
    ///
    /// Fails before touching the filesystem with
    /// [`OrganizeError::NoDirectorySelected`], [`OrganizeError::EmptyKeyword`]
    /// or [`OrganizeError::InvalidKeyword`], and with
    /// [`OrganizeError::KeywordFolderFailed`] if the folder cannot be created.
    pub fn group_by_keyword(
        &self,
        dir: &Path,
        keyword: &str,
        reporter: &mut dyn ProgressReporter,
    ) -> OrganizeResult<GroupReport> {
        if dir.as_os_str().is_empty() {
            return Err(OrganizeError::NoDirectorySelected);
        }
        let keyword = normalize_keyword(keyword)?;
        scan::validate_source_dir(dir)?;

        let folder = dir.join(keyword);
        if !self.options.dry_run {
            ensure_dir(&folder).map_err(|source| OrganizeError::KeywordFolderFailed {
                path: folder.clone(),
                source,
            })?;
        }

        let entries = scan::list_source_files(dir, self.filters, self.options.order)?;
        reporter.report(&ProgressEvent::Started {
            operation: Operation::Group,
            dir,
            files: entries.len(),
        });

        let mut matched = Vec::new();
        let mut moved_count = 0;

        for entry in entries
            .iter()
            .filter(|entry| entry.file_name.contains(keyword))
        {
            let outcome = self.move_into(dir, entry, keyword);
            if outcome.is_moved() {
                moved_count += 1;
            }
            reporter.report(&ProgressEvent::File(&outcome));
            matched.push(outcome);
        }

        info!(dir = %dir.display(), keyword, moved_count, "keyword grouping finished");
        Ok(GroupReport {
            dry_run: self.options.dry_run,
            keyword: keyword.to_string(),
            folder,
            moved_count,
            matched,
        })
    }

    /// Relocates one entry into `base/folder_name`, turning every result into
    /// a per-file outcome.
    fn move_into(&self, base: &Path, entry: &SourceEntry, folder_name: &str) -> FileOutcome {
        let folder = base.join(folder_name);
        let outcome = |status| FileOutcome::new(&entry.path, Some(folder_name), status);

        if self.options.dry_run {
            let destination = folder.join(entry.path.file_name().unwrap_or_default());
            return match scan::still_exists(&destination) {
                Ok(false) => outcome(FileStatus::WouldMove { destination }),
                Ok(true) => outcome(FileStatus::Failed {
                    error: FileError::NameCollision { destination },
                }),
                Err(source) => outcome(FileStatus::Failed {
                    error: FileError::MoveFailed {
                        destination,
                        source,
                    },
                }),
            };
        }

        if let Err(source) = ensure_dir(&folder) {
            warn!(folder = %folder.display(), error = %source, "could not create folder");
            return outcome(FileStatus::Failed {
                error: FileError::DirectoryCreationFailed {
                    path: folder,
                    source,
                },
            });
        }

        match relocate(&entry.path, &folder) {
            Ok(Relocation::Moved(destination)) => {
                debug!(file = %entry.file_name, folder = folder_name, "moved");
                outcome(FileStatus::Moved { destination })
            }
            Ok(Relocation::Vanished) => {
                debug!(file = %entry.file_name, "vanished before it could be moved");
                outcome(FileStatus::Vanished)
            }
            Err(error) => {
                warn!(file = %entry.file_name, %error, "move failed");
                outcome(FileStatus::Failed { error })
            }
        }
    }
}
