use crate::url::validate::is_well_formed_url;

/// Resolves an image reference against the URL of the page it was found on
///
/// An already absolute reference is returned unchanged. Anything else is appended to
/// `base_url` textually with exactly one `/` at the join, and the result is validated
/// again. No path normalization happens, so `..` segments are kept as written.
///
/// # Examples
///
/// ```
/// use sumi_scrape::url::resolve_image_url;
///
/// assert_eq!(
///     resolve_image_url("/img/a.png", "http://example.com/page").as_deref(),
///     Some("http://example.com/page/img/a.png")
/// );
/// assert_eq!(
///     resolve_image_url("/x.png", "http://a.test/").as_deref(),
///     Some("http://a.test/x.png")
/// );
/// ```
pub fn resolve_image_url(raw: &str, base_url: &str) -> Option<String> {
    if raw.is_empty() {
        return None;
    }

    if is_well_formed_url(raw) {
        return Some(raw.to_string());
    }

    let joined = match (base_url.ends_with('/'), raw.starts_with('/')) {
        (true, true) => format!("{}{}", base_url, &raw[1..]),
        (false, false) => format!("{}/{}", base_url, raw),
        _ => format!("{}{}", base_url, raw),
    };

    if is_well_formed_url(&joined) {
        Some(joined)
    } else {
        tracing::debug!("Invalid image url after joining {:?} to {}", raw, base_url);
        None
    }
}
