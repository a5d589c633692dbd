//! URL handling module for Sumi-Scrape
//!
//! This module decides whether a string is a usable absolute URL, resolves image
//! references found on a page against that page's URL, and strips schemes for naming.

mod resolve;
mod validate;

// Re-export main functions
pub use resolve::resolve_image_url;
pub use validate::{check_url, is_well_formed_url, strip_scheme};
