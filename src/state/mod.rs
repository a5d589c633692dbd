//! State module for tracking crawl progress
//!
//! This module provides the state owned by one crawl session.
//!
//! # Components
//!
//! - `CrawlState`: visited pages plus the negative caches, created per `execute` call
//! - `PageOutcome`: how the processing of a single page ended

mod crawl_state;
mod page_state;

// Re-export main types
pub use crawl_state::CrawlState;
pub use page_state::PageOutcome;
