//! Safe names for folders and image files
//!
//! Page URLs and alt text are untrusted. Characters that are reserved on common file
//! systems (or that are awkward in shells) are dropped rather than escaped.

use crate::url::strip_scheme;

/// Characters that never appear in a generated folder or file name
pub const INVALID_NAME_CHARS: &[char] = &[
    '\\', '/', ':', '*', '?', '"', '<', '>', '|', '\0', '&', '%',
];

/// Extension given to every stored image, whatever its real format
const IMAGE_EXTENSION: &str = ".jpeg";

/// Base of the generated name for images without usable alt text
const FALLBACK_IMAGE_NAME: &str = "randomImageScrapedFromWebsite";

/// Removes every character in `invalid_chars` from `name`
///
/// # Examples
///
/// ```
/// use sumi_scrape::storage::{sanitize, INVALID_NAME_CHARS};
///
/// assert_eq!(sanitize("a/b:c?d", INVALID_NAME_CHARS), "abcd");
/// ```
pub fn sanitize(name: &str, invalid_chars: &[char]) -> String {
    name.chars().filter(|c| !invalid_chars.contains(c)).collect()
}

/// Keeps the longest prefix of `name` that fits in `max_bytes` bytes
///
/// File systems limit path components in bytes, so multibyte text is cut on the last
/// char boundary that fits.
///
/// # Examples
///
/// ```
/// use sumi_scrape::storage::truncate_bytes;
///
/// assert_eq!(truncate_bytes("abcdef", 4), "abcd");
/// assert_eq!(truncate_bytes("猫猫", 4), "猫");
/// ```
pub fn truncate_bytes(name: &str, max_bytes: usize) -> &str {
    if name.len() <= max_bytes {
        return name;
    }

    let mut end = max_bytes;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    &name[..end]
}

/// Derives the folder name for a page
///
/// The scheme is stripped, invalid characters are removed, surrounding whitespace is
/// trimmed and the result is cut to `max_len` bytes. Returns None when nothing
/// usable is left (including names made only of dots).
pub fn folder_name(page_url: &str, max_len: usize) -> Option<String> {
    let name = sanitize(strip_scheme(page_url), INVALID_NAME_CHARS);
    let name = truncate_bytes(name.trim(), max_len).to_string();

    if name.is_empty() || name.chars().all(|c| c == '.') {
        None
    } else {
        Some(name)
    }
}

/// Produces image file names for one page
///
/// Each page gets its own namer, so fallback names restart at 1 for every page.
#[derive(Debug)]
pub struct ImageNamer {
    counter: u32,
    max_len: usize,
}

impl ImageNamer {
    /// Creates a namer whose names (extension included) fit in `max_len` bytes
    pub fn new(max_len: usize) -> Self {
        Self {
            counter: 1,
            max_len,
        }
    }

    /// Returns the file name for an image with the given alt text
    pub fn name_for(&mut self, alt: Option<&str>) -> String {
        let sanitized = alt
            .map(|a| sanitize(a, INVALID_NAME_CHARS))
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty());

        let stem = match sanitized {
            Some(stem) => stem,
            None => {
                let generated = format!("{}{}", FALLBACK_IMAGE_NAME, self.counter);
                self.counter += 1;
                tracing::debug!("Couldn't get image name, generated name was given: {}", generated);
                generated
            }
        };

        let max_stem = self.max_len.saturating_sub(IMAGE_EXTENSION.len()).max(1);
        format!("{}{}", truncate_bytes(&stem, max_stem), IMAGE_EXTENSION)
    }
}
