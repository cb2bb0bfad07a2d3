//! Content-based duplicate detection and removal.
//!
//! Every eligible file in the source directory is fingerprinted by streaming
//! its bytes through BLAKE3 in fixed-size chunks. Files sharing a fingerprint
//! form a [`DuplicateGroup`]; the first member encountered survives and the
//! rest are deleted permanently.
//!
//! Equal fingerprints are taken as equal content without a byte-by-byte
//! comparison. A digest collision between different files would therefore
//! destroy one of them. BLAKE3 makes that practically impossible, but the
//! check is still one of equality, not of tamper-evidence.
//!
//! "First encountered" follows the directory listing order, which depends on
//! the filesystem. Use [`ScanOrder::ByPath`] for a predictable survivor.
//!
//! [`ScanOrder::ByPath`]: crate::scan::ScanOrder::ByPath

use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::arranger::RunOptions;
use crate::config::CompiledFilters;
use crate::error::{FileError, OrganizeResult};
use crate::report::{
    DedupReport, FileOutcome, FileStatus, Operation, ProgressEvent, ProgressReporter,
};
use crate::scan::{self, SourceEntry};

/// Size of each read while hashing.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Fixed-size digest of a file's full content.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentFingerprint([u8; 32]);

impl ContentFingerprint {
    /// Hashes everything `reader` yields, [`CHUNK_SIZE`] bytes at a time.
    pub fn from_reader<R: Read>(mut reader: R) -> io::Result<Self> {
        let mut hasher = blake3::Hasher::new();
        let mut buffer = vec![0u8; CHUNK_SIZE];
        loop {
            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => {
                    hasher.update(&buffer[..n]);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(Self(*hasher.finalize().as_bytes()))
    }

    /// Hashes the file at `path`. The handle is closed before returning.
    pub fn of_file(path: &Path) -> io::Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Fingerprint of an in-memory buffer.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        Self(*blake3::hash(bytes).as_bytes())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hexadecimal form.
    pub fn to_hex(&self) -> String {
        blake3::Hash::from(self.0).to_hex().to_string()
    }
}

impl fmt::Display for ContentFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ContentFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentFingerprint({})", &self.to_hex()[..16])
    }
}

impl Serialize for ContentFingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Files sharing one fingerprint, in the order they were encountered.
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateGroup {
    pub fingerprint: ContentFingerprint,
    pub members: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Two or more members make a duplicate set; a single file never does.
    pub fn is_duplicate_set(&self) -> bool {
        self.members.len() >= 2
    }

    /// The member that is kept.
    pub fn survivor(&self) -> &Path {
        &self.members[0]
    }

    /// The members that are deleted.
    pub fn redundant(&self) -> &[PathBuf] {
        &self.members[1..]
    }
}

/// Groups entries by content fingerprint.
///
/// Groups come back in order of their first member; members keep the order
/// of `entries`. Files that could not be hashed are returned as outcomes and
/// belong to no group.
pub fn group_by_fingerprint(
    entries: &[SourceEntry],
) -> (Vec<DuplicateGroup>, Vec<FileOutcome>) {
    let mut groups: Vec<DuplicateGroup> = Vec::new();
    let mut index: HashMap<ContentFingerprint, usize> = HashMap::new();
    let mut failures = Vec::new();

    for entry in entries {
        match ContentFingerprint::of_file(&entry.path) {
            Ok(fingerprint) => {
                debug!(file = %entry.path.display(), %fingerprint, "hashed");
                match index.get(&fingerprint) {
                    Some(&position) => groups[position].members.push(entry.path.clone()),
                    None => {
                        index.insert(fingerprint, groups.len());
                        groups.push(DuplicateGroup {
                            fingerprint,
                            members: vec![entry.path.clone()],
                        });
                    }
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(file = %entry.path.display(), "vanished before hashing");
                failures.push(FileOutcome::new(&entry.path, None, FileStatus::Vanished));
            }
            Err(e) => {
                warn!(file = %entry.path.display(), error = %e, "could not hash file");
                failures.push(FileOutcome::new(
                    &entry.path,
                    None,
                    FileStatus::Failed {
                        error: FileError::FingerprintFailed { source: e },
                    },
                ));
            }
        }
    }

    (groups, failures)
}

/// Finds and removes duplicate files in a directory.
pub struct DuplicateFinder<'a> {
    filters: &'a CompiledFilters,
    options: RunOptions,
}

impl<'a> DuplicateFinder<'a> {
    pub fn new(filters: &'a CompiledFilters, options: RunOptions) -> Self {
        Self { filters, options }
    }

    /// Keeps the first member of every duplicate group and deletes the rest.
    ///
    /// A failed deletion is recorded and the remaining groups are still
    /// processed. If a survivor disappeared after hashing, its group is left
    /// alone so that no content is lost.
    ///
    /// # Errors
    ///
    /// Fails only if `dir` is not a usable directory.
    pub fn deduplicate(
        &self,
        dir: &Path,
        reporter: &mut dyn ProgressReporter,
    ) -> OrganizeResult<DedupReport> {
        scan::validate_source_dir(dir)?;
        let entries = scan::list_source_files(dir, self.filters, self.options.order)?;
        reporter.report(&ProgressEvent::Started {
            operation: Operation::Dedup,
            dir,
            files: entries.len(),
        });

        let (groups, mut outcomes) = group_by_fingerprint(&entries);
        for outcome in &outcomes {
            reporter.report(&ProgressEvent::File(outcome));
        }

        let groups: Vec<DuplicateGroup> = groups
            .into_iter()
            .filter(DuplicateGroup::is_duplicate_set)
            .collect();

        let mut deletions = Vec::new();
        for group in &groups {
            reporter.report(&ProgressEvent::DuplicateGroupFound(group));
            info!(
                fingerprint = %group.fingerprint,
                members = group.members.len(),
                "duplicate group"
            );

            let survivor_present = scan::still_exists(group.survivor()).unwrap_or(false);
            for member in group.redundant() {
                let status = if !survivor_present {
                    warn!(survivor = %group.survivor().display(), "survivor missing, keeping group");
                    FileStatus::Failed {
                        error: FileError::SurvivorMissing {
                            survivor: group.survivor().to_path_buf(),
                        },
                    }
                } else if self.options.dry_run {
                    FileStatus::WouldDelete {
                        survivor: group.survivor().to_path_buf(),
                    }
                } else {
                    self.delete_one(member, group.survivor(), &mut deletions)
                };

                let outcome = FileOutcome::new(member, None, status);
                reporter.report(&ProgressEvent::File(&outcome));
                outcomes.push(outcome);
            }
        }

        Ok(DedupReport {
            dry_run: self.options.dry_run,
            groups_found: groups.len(),
            deleted_count: deletions.len(),
            deletions,
            groups,
            outcomes,
        })
    }

    fn delete_one(
        &self,
        member: &Path,
        survivor: &Path,
        deletions: &mut Vec<PathBuf>,
    ) -> FileStatus {
        match fs::remove_file(member) {
            Ok(()) => {
                info!(file = %member.display(), "deleted duplicate");
                deletions.push(member.to_path_buf());
                FileStatus::Deleted {
                    survivor: survivor.to_path_buf(),
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(file = %member.display(), "vanished before it could be deleted");
                FileStatus::Vanished
            }
            Err(e) => {
                warn!(file = %member.display(), error = %e, "could not delete duplicate");
                FileStatus::Failed {
                    error: FileError::DeleteFailed { source: e },
                }
            }
        }
    }
}
