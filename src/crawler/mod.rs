//! Crawler module for page and image fetching
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with redirect, status and content-type checks
//! - HTML parsing into links and image tags
//! - Bounded negative caches for known non-HTML and non-image URLs
//! - The per-page image pipeline
//! - Overall crawl coordination

mod cache;
mod coordinator;
mod fetcher;
mod parser;
mod pipeline;

pub use cache::{BoundedSet, NegativeCache};
pub use coordinator::{run_scrape, CrawlReport, Crawler};
pub use fetcher::{
    build_http_client, ExpectedKind, FetchGate, FetchOutcome, FetchedImage, RejectReason,
};
pub use parser::{parse_page, ImageTag, ParsedPage};
pub use pipeline::ImagePipeline;
