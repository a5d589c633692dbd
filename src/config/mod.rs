//! Configuration module for Sumi-Scrape
//!
//! This module handles loading, parsing, and validating the optional TOML configuration
//! file. Every key has a default, so a crawl can run without any file at all.
//!
//! # Example
//!
//! ```no_run
//! use sumi_scrape::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scrape.toml")).unwrap();
//! println!("Results go to: {}", config.output.results_path);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CacheConfig, Config, HttpConfig, NamingConfig, OutputConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
