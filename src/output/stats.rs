//! Crawl statistics
//!
//! This module collects counters while a crawl runs and prints them when it ends.

use crate::crawler::RejectReason;
use crate::state::PageOutcome;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Count of pages by outcome label
    pub pages_by_outcome: BTreeMap<String, u64>,

    /// Links skipped because they were not absolute URLs
    pub links_skipped_invalid: u64,

    /// Links skipped because they were already known not to be HTML
    pub links_skipped_cached: u64,

    /// Page folders deleted because nothing was saved into them
    pub folders_removed: u64,

    pub images_downloaded: u64,

    /// Image tags without any usable source, or whose source could not be resolved
    pub images_unresolved: u64,

    /// Images skipped because they were already known not to be images
    pub images_skipped_cached: u64,

    /// Rejected image fetches by reason label
    pub images_rejected: BTreeMap<String, u64>,
}

impl Default for CrawlStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl CrawlStatistics {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            pages_by_outcome: BTreeMap::new(),
            links_skipped_invalid: 0,
            links_skipped_cached: 0,
            folders_removed: 0,
            images_downloaded: 0,
            images_unresolved: 0,
            images_skipped_cached: 0,
            images_rejected: BTreeMap::new(),
        }
    }

    pub fn record_page(&mut self, outcome: &PageOutcome) {
        *self
            .pages_by_outcome
            .entry(outcome.label().to_string())
            .or_insert(0) += 1;
    }

    pub fn record_image_rejected(&mut self, reason: &RejectReason) {
        *self
            .images_rejected
            .entry(reason.label().to_string())
            .or_insert(0) += 1;
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Pages that were fetched, whatever happened after
    pub fn pages_processed(&self) -> u64 {
        self.pages_by_outcome
            .iter()
            .filter(|(label, _)| label.as_str() != "already_visited")
            .map(|(_, count)| count)
            .sum()
    }

    pub fn count_for(&self, label: &str) -> u64 {
        self.pages_by_outcome.get(label).copied().unwrap_or(0)
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Started: {}", stats.started_at.to_rfc3339());
    if let Some(finished) = stats.finished_at {
        println!("  Finished: {}", finished.to_rfc3339());
    }
    if let Some(duration) = stats.duration_seconds() {
        println!("  Duration: {} seconds", duration);
    }
    println!("  Pages processed: {}", stats.pages_processed());
    println!("  Images downloaded: {}", stats.images_downloaded);
    println!();

    println!("Pages by Outcome:");
    let mut outcome_counts: Vec<_> = stats.pages_by_outcome.iter().collect();
    outcome_counts.sort_by(|a, b| b.1.cmp(a.1));
    for (label, count) in outcome_counts {
        println!("  {}: {}", label, count);
    }
    println!();

    println!("Skipped:");
    println!("  Invalid links: {}", stats.links_skipped_invalid);
    println!("  Known non-HTML links: {}", stats.links_skipped_cached);
    println!("  Empty folders removed: {}", stats.folders_removed);
    println!("  Unresolvable images: {}", stats.images_unresolved);
    println!("  Known non-image URLs: {}", stats.images_skipped_cached);
    println!();

    if !stats.images_rejected.is_empty() {
        println!("Image Errors:");
        let mut error_counts: Vec<_> = stats.images_rejected.iter().collect();
        error_counts.sort_by(|a, b| b.1.cmp(a.1));
        for (label, count) in error_counts {
            println!("  {}: {}", label, count);
        }
        println!();
    }
}
