//! Integration tests for Sumi-Scrape
//!
//! These tests use wiremock to create mock HTTP servers and run whole crawls
//! end-to-end against a temporary directory.

mod crawl_tests;
