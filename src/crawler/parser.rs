//! HTML parser for extracting links and images
//!
//! This module parses a page once and copies out everything the crawler needs:
//! - The raw `href` of every `<a>` tag
//! - Every `<img>` tag with its `src`, `data-src` and `alt` attributes
//!
//! Nothing is resolved here. Links are kept exactly as written; image references are
//! resolved later against the page URL.

use scraper::{ElementRef, Html, Selector};

/// Attributes tried, in order, to find an image's location
const IMAGE_SOURCE_ATTRIBUTES: &[&str] = &["src", "data-src"];

/// An `<img>` tag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageTag {
    pub src: Option<String>,
    pub data_src: Option<String>,
    pub alt: Option<String>,
}

impl ImageTag {
    /// Returns the value of one of the tag's known attributes
    pub fn attr(&self, name: &str) -> Option<&str> {
        match name {
            "src" => self.src.as_deref(),
            "data-src" => self.data_src.as_deref(),
            "alt" => self.alt.as_deref(),
            _ => None,
        }
    }

    /// Returns where the image lives, as written in the page
    ///
    /// The first attribute of `[src, data-src]` that is present wins, even when its
    /// value is empty; an empty value means the tag has no usable source.
    pub fn source(&self) -> Option<&str> {
        IMAGE_SOURCE_ATTRIBUTES
            .iter()
            .find_map(|name| self.attr(name))
            .filter(|value| !value.is_empty())
    }

    /// Returns the alt text, if any
    pub fn alt(&self) -> Option<&str> {
        self.alt.as_deref()
    }

    fn from_element(element: ElementRef<'_>) -> Self {
        let value = element.value();
        Self {
            src: value.attr("src").map(str::to_string),
            data_src: value.attr("data-src").map(str::to_string),
            alt: value.attr("alt").map(str::to_string),
        }
    }
}

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// Raw `href` values of all `<a>` tags, in document order
    pub links: Vec<String>,

    /// All `<img>` tags, in document order
    pub images: Vec<ImageTag>,
}

/// Parses HTML content into a `ParsedPage`
///
/// # Example
///
/// ```
/// use sumi_scrape::crawler::parse_page;
///
/// let html = r#"<html><head><title>Test</title></head><body>
///     <a href="http://b.test/">B</a><img src="/x.png" alt="cat"></body></html>"#;
/// let page = parse_page(html);
/// assert_eq!(page.links, vec!["http://b.test/".to_string()]);
/// assert_eq!(page.images[0].source(), Some("/x.png"));
/// ```
pub fn parse_page(html: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        links: extract_links(&document),
        images: extract_images(&document),
    }
}

fn extract_links(document: &Html) -> Vec<String> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                links.push(href.to_string());
            }
        }
    }

    links
}

fn extract_images(document: &Html) -> Vec<ImageTag> {
    match Selector::parse("img") {
        Ok(img_selector) => document
            .select(&img_selector)
            .map(ImageTag::from_element)
            .collect(),
        Err(_) => Vec::new(),
    }
}
