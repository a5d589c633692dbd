//! Storage module for persisting downloaded images
//!
//! This module handles everything that touches the file system during a crawl:
//! - Turning untrusted strings (page URLs, alt text) into safe folder and file names
//! - Creating per-page folders, with a conflict check for non-directory entries
//! - Writing image bytes
//! - Removing folders that ended up empty

mod fs;
mod naming;
mod traits;

pub use fs::FsStorage;
pub use naming::{folder_name, sanitize, truncate_bytes, ImageNamer, INVALID_NAME_CHARS};
pub use traits::{Storage, StorageError, StorageResult};
