use crate::config::CacheConfig;
use crate::crawler::NegativeCache;
use std::collections::HashSet;

/// Mutable state of one crawl session
///
/// Created at the start of a crawl and dropped at its end; nothing here outlives a
/// single `execute` call.
#[derive(Debug, Default)]
pub struct CrawlState {
    visited_pages: HashSet<String>,

    /// URLs already known not to be HTML pages or not to be images
    pub negative: NegativeCache,
}

impl CrawlState {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            visited_pages: HashSet::new(),
            negative: NegativeCache::new(
                config.invalid_html_capacity,
                config.invalid_image_capacity,
            ),
        }
    }

    /// Marks a page as visited
    ///
    /// Returns false if it was already visited; the caller must then skip it. The test
    /// and the insert are one step, so a page can never be claimed twice.
    pub fn mark_visited(&mut self, url: &str) -> bool {
        self.visited_pages.insert(url.to_string())
    }

    pub fn visited_count(&self) -> usize {
        self.visited_pages.len()
    }
}
