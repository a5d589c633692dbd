//! Storage traits and error types
//!
//! This module defines the trait interface for storage backends and
//! associated error types.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Path {0} already exists but is not a directory")]
    NamingConflict(PathBuf),

    #[error("No usable name could be derived from {0:?}")]
    EmptyName(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for storage backend implementations
///
/// Paths handed to these methods are relative to the backend's root.
pub trait Storage {
    /// Creates the folder if absent and returns its full path
    ///
    /// Calling this again for an existing directory is not an error. If the path exists
    /// and is not a directory, returns `StorageError::NamingConflict`.
    fn ensure_dir(&mut self, folder: &str) -> StorageResult<PathBuf>;

    /// Writes bytes to `dir/file_name`, replacing any existing file
    ///
    /// Returns true if an existing file was overwritten.
    fn write_file(&mut self, dir: &Path, file_name: &str, bytes: &[u8]) -> StorageResult<bool>;

    /// Removes the directory iff it has no entries; returns whether it was removed
    fn remove_if_empty(&mut self, dir: &Path) -> StorageResult<bool>;
}
