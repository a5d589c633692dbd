//! File system storage implementation
//!
//! This module provides the `std::fs` backed implementation of the Storage trait.

use crate::storage::traits::{Storage, StorageError, StorageResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Storage backend rooted at a directory on disk
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    /// Creates a new FsStorage rooted at `root`
    ///
    /// The root itself is created lazily by the first `ensure_dir` call.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl Storage for FsStorage {
    fn ensure_dir(&mut self, folder: &str) -> StorageResult<PathBuf> {
        if folder.is_empty() {
            return Err(StorageError::EmptyName(folder.to_string()));
        }

        let path = self.root.join(folder);

        match fs::metadata(&path) {
            Ok(meta) if meta.is_dir() => {
                tracing::debug!("Folder {} was already existing", path.display());
                Ok(path)
            }
            Ok(_) => Err(StorageError::NamingConflict(path)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                fs::create_dir_all(&path)?;
                tracing::info!("Created new folder: {}", path.display());
                Ok(path)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn write_file(&mut self, dir: &Path, file_name: &str, bytes: &[u8]) -> StorageResult<bool> {
        let path = dir.join(file_name);
        let existed = path.is_file();
        fs::write(&path, bytes)?;
        Ok(existed)
    }

    fn remove_if_empty(&mut self, dir: &Path) -> StorageResult<bool> {
        if fs::read_dir(dir)?.next().is_some() {
            return Ok(false);
        }
        fs::remove_dir(dir)?;
        Ok(true)
    }
}
