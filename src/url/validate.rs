use crate::UrlError;
use url::Url;

/// Schemes the crawler is willing to fetch
const ALLOWED_SCHEMES: &[&str] = &["http", "https"];

/// Checks that a string is a well-formed absolute URL
///
/// # Rules
///
/// 1. Reject empty input
/// 2. Reject any whitespace (the URL parser would silently trim or encode it)
/// 3. Parse with the `url` crate
/// 4. Require an `http` or `https` scheme
/// 5. Require a non-empty host
///
/// # Returns
///
/// * `Ok(Url)` - The parsed URL
/// * `Err(UrlError)` - Why the string was rejected
pub fn check_url(url_str: &str) -> Result<Url, UrlError> {
    if url_str.is_empty() {
        return Err(UrlError::Empty);
    }

    if url_str.chars().any(char::is_whitespace) {
        return Err(UrlError::Malformed(format!(
            "URL contains whitespace: {:?}",
            url_str
        )));
    }

    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if !ALLOWED_SCHEMES.contains(&url.scheme()) {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(UrlError::MissingHost),
    }
}

/// Returns true if the string is a well-formed absolute URL
///
/// # Examples
///
/// ```
/// use sumi_scrape::url::is_well_formed_url;
///
/// assert!(is_well_formed_url("http://example.com/page"));
/// assert!(!is_well_formed_url("/img/a.png"));
/// assert!(!is_well_formed_url(""));
/// ```
pub fn is_well_formed_url(url_str: &str) -> bool {
    check_url(url_str).is_ok()
}

/// Removes a leading `http://` or `https://`
///
/// Only used to derive folder names; crawling always uses the full URL.
pub fn strip_scheme(url_str: &str) -> &str {
    url_str
        .strip_prefix("http://")
        .or_else(|| url_str.strip_prefix("https://"))
        .unwrap_or(url_str)
}
