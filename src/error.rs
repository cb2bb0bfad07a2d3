//! Error types for arranger operations.
//!
//! Two levels exist. [`OrganizeError`] stops an operation before it touches
//! the filesystem (bad directory, empty keyword, broken configuration).
//! [`FileError`] belongs to a single file inside a batch; it is recorded in
//! the report and the batch moves on to the next file.

use serde::ser::{Serialize, SerializeStruct, Serializer};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;

/// Failures that prevent an operation from starting.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The caller supplied an empty directory path.
    #[error("No directory selected")]
    NoDirectorySelected,

    /// The directory does not exist or cannot be inspected.
    #[error("Invalid base path {path}: {source}")]
    InvalidBasePath {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The path exists but is not a directory.
    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Listing the directory failed.
    #[error("Error reading directory {path}: {source}")]
    ReadDirFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The keyword was empty after trimming whitespace.
    #[error("No keyword entered")]
    EmptyKeyword,

    /// The keyword cannot be used as a direct child folder name.
    #[error("Keyword '{keyword}' cannot be used as a folder name")]
    InvalidKeyword { keyword: String },

    /// The keyword folder could not be created.
    #[error("Failed to create keyword folder {path}: {source}")]
    KeywordFolderFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration could not be loaded or compiled.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for whole operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Failures local to one file of a batch.
#[derive(Debug, Error)]
pub enum FileError {
    /// The destination already holds an entry with the same name.
    #[error("{destination} already exists")]
    NameCollision { destination: PathBuf },

    /// The destination folder could not be created.
    #[error("Failed to create directory {path}: {source}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The rename (or copy fallback) failed.
    #[error("Failed to move to {destination}: {source}")]
    MoveFailed {
        destination: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A cross-volume copy did not reproduce the source; the copy was discarded.
    #[error("Copy at {destination} does not match the source, source kept")]
    CopyVerificationFailed { destination: PathBuf },

    /// Removing a duplicate failed.
    #[error("Failed to delete: {source}")]
    DeleteFailed {
        #[source]
        source: io::Error,
    },

    /// The file content could not be read for hashing.
    #[error("Failed to read content: {source}")]
    FingerprintFailed {
        #[source]
        source: io::Error,
    },

    /// The copy chosen to survive is gone, so its duplicates were kept.
    #[error("Survivor {survivor} no longer exists, duplicate kept")]
    SurvivorMissing { survivor: PathBuf },
}

impl FileError {
    /// Stable name of the failure, usable as a machine-readable tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NameCollision { .. } => "NameCollision",
            Self::DirectoryCreationFailed { .. } => "DirectoryCreationFailed",
            Self::MoveFailed { .. } => "MoveFailed",
            Self::CopyVerificationFailed { .. } => "CopyVerificationFailed",
            Self::DeleteFailed { .. } => "DeleteFailed",
            Self::FingerprintFailed { .. } => "FingerprintFailed",
            Self::SurvivorMissing { .. } => "SurvivorMissing",
        }
    }
}

impl Serialize for FileError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FileError", 2)?;
        state.serialize_field("kind", self.kind())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}
