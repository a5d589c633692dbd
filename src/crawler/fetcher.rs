//! HTTP fetch gate
//!
//! This module wraps every HTTP request the crawler makes and classifies the response:
//! - Malformed URLs are rejected before any request is sent
//! - Redirects are never followed; a redirect response is a rejection
//! - Any status other than 200 is a rejection
//! - Content-Type must mention `html` for pages and `image` for images; a mismatch
//!   records the URL in the matching negative cache
//!
//! There are no retries. A rejection is final for that URL within one crawl.

use crate::config::HttpConfig;
use crate::crawler::cache::NegativeCache;
use crate::crawler::parser::{parse_page, ParsedPage};
use crate::url::check_url;
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::{redirect::Policy, Client, Response, StatusCode};
use std::fmt;
use std::time::Duration;

/// What the caller expects a URL to point at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedKind {
    Page,
    Image,
}

/// Why a fetch was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The URL is not a well-formed absolute http(s) URL
    InvalidUrl,

    /// The server answered with a redirect
    Redirected,

    /// The server answered with a status other than 200
    HttpError(u16),

    /// The Content-Type does not match the expected kind
    WrongContentType,

    /// No usable response (connection refused, timeout, body read failure)
    Unreachable(String),
}

impl RejectReason {
    /// Short stable label, used for statistics
    pub fn label(&self) -> &'static str {
        match self {
            Self::InvalidUrl => "invalid_url",
            Self::Redirected => "redirected",
            Self::HttpError(_) => "http_error",
            Self::WrongContentType => "wrong_content_type",
            Self::Unreachable(_) => "unreachable",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl => write!(f, "invalid URL"),
            Self::Redirected => write!(f, "redirected"),
            Self::HttpError(code) => write!(f, "HTTP {}", code),
            Self::WrongContentType => write!(f, "wrong content type"),
            Self::Unreachable(error) => write!(f, "unreachable ({})", error),
        }
    }
}

/// A successfully fetched image
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchOutcome {
    /// An HTML page, already parsed
    Page(ParsedPage),

    /// Image bytes and their declared Content-Type
    Image(FetchedImage),

    /// The URL was rejected
    Rejected(RejectReason),
}

impl FetchOutcome {
    /// Returns the parsed page, treating any other content as the wrong type
    pub fn into_page(self) -> Result<ParsedPage, RejectReason> {
        match self {
            Self::Page(page) => Ok(page),
            Self::Image(_) => Err(RejectReason::WrongContentType),
            Self::Rejected(reason) => Err(reason),
        }
    }

    /// Returns the image, treating any other content as the wrong type
    pub fn into_image(self) -> Result<FetchedImage, RejectReason> {
        match self {
            Self::Image(image) => Ok(image),
            Self::Page(_) => Err(RejectReason::WrongContentType),
            Self::Rejected(reason) => Err(reason),
        }
    }
}

/// Builds the HTTP client used for a crawl
///
/// Redirects are disabled so that a redirect surfaces as a 3xx response instead of
/// being followed to a host nobody asked for.
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true);

    if let Some(user_agent) = &config.user_agent {
        builder = builder.user_agent(user_agent.clone());
    }

    builder.build()
}

/// Validating wrapper around the HTTP client
#[derive(Debug, Clone)]
pub struct FetchGate {
    client: Client,
}

impl FetchGate {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a gate with a client configured from `config`
    pub fn from_config(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }

    /// Fetches a URL and classifies it as the expected kind
    ///
    /// # Request Flow
    ///
    /// | Condition | Outcome |
    /// |-----------|---------|
    /// | URL fails validation | `Rejected(InvalidUrl)`, no request sent |
    /// | Transport error | `Rejected(Unreachable)` |
    /// | 301/302/303/307/308 with `Location` | `Rejected(Redirected)` |
    /// | status != 200 | `Rejected(HttpError(code))` |
    /// | Page without `html` Content-Type | cached, `Rejected(WrongContentType)` |
    /// | Image without `image` Content-Type | cached, `Rejected(WrongContentType)` |
    /// | otherwise | `Page(..)` or `Image(..)` |
    pub async fn fetch(
        &self,
        url: &str,
        kind: ExpectedKind,
        cache: &mut NegativeCache,
    ) -> FetchOutcome {
        match kind {
            ExpectedKind::Page => match self.fetch_page(url, cache).await {
                Ok(page) => FetchOutcome::Page(page),
                Err(reason) => FetchOutcome::Rejected(reason),
            },
            ExpectedKind::Image => match self.fetch_image(url, cache).await {
                Ok(image) => FetchOutcome::Image(image),
                Err(reason) => FetchOutcome::Rejected(reason),
            },
        }
    }

    /// Fetches and parses an HTML page
    async fn fetch_page(
        &self,
        url: &str,
        cache: &mut NegativeCache,
    ) -> Result<ParsedPage, RejectReason> {
        let (response, content_type) = self.checked_get(url).await?;

        if !content_type.contains("html") {
            cache.invalid_html.insert(url);
            tracing::warn!(
                "URL: \"{}\" is not an html page ({:?}), aborting this URL run",
                url,
                content_type
            );
            return Err(RejectReason::WrongContentType);
        }

        let body = response.text().await.map_err(|e| {
            tracing::warn!("URL: \"{}\" body could not be read: {}", url, e);
            RejectReason::Unreachable(e.to_string())
        })?;

        Ok(parse_page(&body))
    }

    /// Fetches image bytes
    async fn fetch_image(
        &self,
        url: &str,
        cache: &mut NegativeCache,
    ) -> Result<FetchedImage, RejectReason> {
        let (response, content_type) = self.checked_get(url).await?;

        if !content_type.contains("image") {
            cache.invalid_images.insert(url);
            tracing::warn!("URL: {} is not an image ({:?})", url, content_type);
            return Err(RejectReason::WrongContentType);
        }

        let bytes = response.bytes().await.map_err(|e| {
            tracing::warn!("Image {} body could not be read: {}", url, e);
            RejectReason::Unreachable(e.to_string())
        })?;

        Ok(FetchedImage {
            bytes: bytes.to_vec(),
            content_type,
        })
    }

    /// Validates the URL, sends one GET and checks redirect and status
    ///
    /// Returns the response with its lowercased Content-Type (empty if missing).
    async fn checked_get(&self, url: &str) -> Result<(Response, String), RejectReason> {
        if let Err(e) = check_url(url) {
            tracing::warn!(
                "URL: \"{}\" is empty or not a real website URL ({}), aborting this URL run",
                url,
                e
            );
            return Err(RejectReason::InvalidUrl);
        }

        let response = self.client.get(url).send().await.map_err(|e| {
            let error = if e.is_timeout() {
                "request timeout".to_string()
            } else if e.is_connect() {
                "connection refused".to_string()
            } else {
                e.to_string()
            };
            tracing::warn!("URL: \"{}\" could not be reached: {}", url, error);
            RejectReason::Unreachable(error)
        })?;

        let status = response.status();

        if is_redirect(&response) {
            tracing::warn!(
                "URL: \"{}\" is redirecting to a different location, not following it",
                url
            );
            return Err(RejectReason::Redirected);
        }

        if status != StatusCode::OK {
            tracing::warn!("URL: \"{}\" has returned response: {}", url, status.as_u16());
            return Err(RejectReason::HttpError(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        Ok((response, content_type))
    }
}

/// Returns true for a redirect status that carries a `Location` to follow
///
/// Other 3xx answers (300 without a location, 304) are plain HTTP errors.
fn is_redirect(response: &Response) -> bool {
    matches!(
        response.status(),
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    ) && response.headers().contains_key(LOCATION)
}
