//! HTML parser for extracting links and element ids
//!
//! This module handles parsing HTML content to extract:
//! - Links, from the `href` and `src` attributes of selected elements
//! - Raw link text that is not a valid URL
//! - Element ids, used to verify URL fragments

use crate::url::Link;
use crate::ConfigError;
use scraper::{Html, Selector};
use std::collections::HashSet;

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// Parsed links in document order, deduplicated by raw text
    pub links: Vec<Link>,

    /// Raw link text that could not be parsed as a URL
    pub unparsable_links: Vec<String>,

    /// Every `id` attribute value in the document
    pub ids: HashSet<String>,
}

/// Compiles the CSS selector used to find link bearing elements
pub fn link_selector(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| {
        ConfigError::Validation(format!("Invalid link selector '{}': {:?}", selector, e))
    })
}

/// Parses HTML content and extracts links and element ids
///
/// # Link Extraction Rules
///
/// - Every element matched by `selector` contributes its `href`, then its `src`
/// - Values are trimmed; empty values are skipped
/// - Duplicate values are dropped, keeping the first occurrence
/// - Values that are not URLs go to `unparsable_links` instead of `links`
///
/// # Example
///
/// ```
/// use linkrot::crawler::{link_selector, parse_html};
///
/// let selector = link_selector("[href], [src]").unwrap();
/// let html = r#"<html><body><h1 id="top">Hi</h1><a href="/page">Link</a></body></html>"#;
/// let parsed = parse_html(html, &selector);
/// assert_eq!(parsed.links[0].as_str(), "/page");
/// assert!(parsed.ids.contains("top"));
/// ```
pub fn parse_html(html: &str, selector: &Selector) -> ParsedPage {
    let document = Html::parse_document(html);

    let (links, unparsable_links) = extract_links(&document, selector);
    let ids = extract_ids(&document);

    ParsedPage {
        links,
        unparsable_links,
        ids,
    }
}

/// Extracts all link values from the HTML document
fn extract_links(document: &Html, selector: &Selector) -> (Vec<Link>, Vec<String>) {
    let mut seen = HashSet::new();
    let mut links = Vec::new();
    let mut unparsable = Vec::new();

    for element in document.select(selector) {
        for attr in ["href", "src"] {
            let Some(value) = element.value().attr(attr) else {
                continue;
            };

            let value = value.trim();
            if value.is_empty() || !seen.insert(value.to_string()) {
                continue;
            }

            match Link::parse(value) {
                Ok(link) => links.push(link),
                Err(e) => {
                    tracing::trace!("Unparsable link {:?}: {}", value, e);
                    unparsable.push(value.to_string());
                }
            }
        }
    }

    (links, unparsable)
}

/// Extracts every element id from the HTML document
fn extract_ids(document: &Html) -> HashSet<String> {
    let mut ids = HashSet::new();

    if let Ok(id_selector) = Selector::parse("[id]") {
        for element in document.select(&id_selector) {
            if let Some(id) = element.value().id() {
                ids.insert(id.to_string());
            }
        }
    }

    ids
}
