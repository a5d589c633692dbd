//! Output module for crawl results
//!
//! This module handles:
//! - Recording one result per downloaded image and writing them to JSON once
//! - Collecting and printing crawl statistics

mod recorder;
pub mod stats;

pub use recorder::{ResultRecord, ResultRecorder};
pub use stats::{print_statistics, CrawlStatistics};
