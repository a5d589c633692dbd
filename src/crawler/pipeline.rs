//! Image pipeline
//!
//! Downloads every image of one page into that page's folder. Each tag is handled on
//! its own: a tag that cannot be resolved, fetched or written is logged and skipped,
//! and the remaining tags are still processed.

use crate::crawler::fetcher::{ExpectedKind, FetchGate};
use crate::crawler::parser::ImageTag;
use crate::output::{CrawlStatistics, ResultRecord, ResultRecorder};
use crate::state::CrawlState;
use crate::storage::{ImageNamer, Storage};
use crate::url::resolve_image_url;
use std::path::Path;

/// Everything an image download needs, borrowed from the running crawl
pub struct ImagePipeline<'a> {
    pub gate: &'a FetchGate,
    pub storage: &'a mut (dyn Storage + Send),
    pub state: &'a mut CrawlState,
    pub recorder: &'a mut ResultRecorder,
    pub stats: &'a mut CrawlStatistics,
    pub max_file_name_length: usize,
}

impl ImagePipeline<'_> {
    /// Downloads the images of one page into `folder`
    ///
    /// # Per-tag Flow
    ///
    /// 1. Take `src`, or `data-src` when `src` is absent; skip the tag if neither has a value
    /// 2. Resolve against the page URL
    /// 3. Skip URLs already known not to be images
    /// 4. Fetch as an image
    /// 5. Name the file from the alt text (or a generated fallback) with a `.jpeg` extension
    /// 6. Write the file, overwriting any file of the same name
    /// 7. Append a result record
    ///
    /// Returns the number of images written.
    pub async fn download_images(
        &mut self,
        images: &[ImageTag],
        page_url: &str,
        depth: u32,
        folder: &Path,
    ) -> usize {
        let mut namer = ImageNamer::new(self.max_file_name_length);
        let mut downloaded = 0;

        for image in images {
            let Some(raw_source) = image.source() else {
                tracing::debug!("Image tag on {} has no source, skipping", page_url);
                self.stats.images_unresolved += 1;
                continue;
            };

            let Some(image_url) = resolve_image_url(raw_source, page_url) else {
                tracing::warn!("Invalid image url {:?} on {}", raw_source, page_url);
                self.stats.images_unresolved += 1;
                continue;
            };

            if self.state.negative.invalid_images.contains(&image_url) {
                tracing::debug!(
                    "Site {} already been checked and is not an image site",
                    image_url
                );
                self.stats.images_skipped_cached += 1;
                continue;
            }

            let fetched = match self
                .gate
                .fetch(&image_url, ExpectedKind::Image, &mut self.state.negative)
                .await
                .into_image()
            {
                Ok(fetched) => fetched,
                Err(reason) => {
                    tracing::warn!("Couldn't get image {}: {}", image_url, reason);
                    self.stats.record_image_rejected(&reason);
                    continue;
                }
            };

            let file_name = namer.name_for(image.alt());

            match self.storage.write_file(folder, &file_name, &fetched.bytes) {
                Ok(true) => {
                    tracing::warn!(
                        "Overwrote existing file {} in {}",
                        file_name,
                        folder.display()
                    );
                }
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(
                        "Failed to save {} into {}: {}",
                        file_name,
                        folder.display(),
                        e
                    );
                    continue;
                }
            }

            self.recorder.append(ResultRecord::new(
                page_url,
                &image_url,
                depth,
                folder.join(&file_name),
            ));
            self.stats.images_downloaded += 1;
            downloaded += 1;

            tracing::info!(
                "Downloaded: {} --- from: {} ({})",
                file_name,
                image_url,
                fetched.content_type
            );
        }

        downloaded
    }
}
