//! Result recording
//!
//! One `ResultRecord` is appended per downloaded image, in download order. The list is
//! serialized once, after the crawl has completely finished.

use crate::ScrapeError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Provenance of one downloaded image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// The page the image was found on
    #[serde(rename = "sourceURL")]
    pub source_url: String,

    /// The resolved image URL
    #[serde(rename = "imageURL")]
    pub image_url: String,

    /// Remaining crawl depth when the page was processed
    pub depth: u32,

    /// Where the image was written; not part of the results file
    #[serde(skip)]
    pub stored_at: PathBuf,
}

impl ResultRecord {
    pub fn new(source_url: &str, image_url: &str, depth: u32, stored_at: PathBuf) -> Self {
        Self {
            source_url: source_url.to_string(),
            image_url: image_url.to_string(),
            depth,
            stored_at,
        }
    }
}

/// Ordered collection of the records of one crawl
#[derive(Debug, Default)]
pub struct ResultRecorder {
    records: Vec<ResultRecord>,
}

impl ResultRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: ResultRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Serializes the records as a JSON array
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.records)
    }

    /// Writes the records to `path` and hands them back
    ///
    /// Consumes the recorder, so results can only be flushed once. Missing parent
    /// directories are created.
    pub fn flush(self, path: &Path) -> Result<Vec<ResultRecord>, ScrapeError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(path, self.to_json()?)?;
        tracing::info!(
            "Saved {} results (website url, image url and depth) to {}",
            self.records.len(),
            path.display()
        );

        Ok(self.records)
    }
}
