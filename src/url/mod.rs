//! URL handling module for Linkrot
//!
//! This module provides the `Link` value (a link as written in markup), page URL
//! normalization for site enumeration, and glob based path filters.

mod link;
mod matcher;
mod normalize;

pub use link::{is_http_scheme, Link};
pub use matcher::{matches_glob, PathFilters};
pub use normalize::{is_same_site, normalize_page_url};

use crate::{UrlError, UrlResult};
use url::Url;

/// Parses the URL a crawl starts from
///
/// Only absolute http(s) URLs can be crawled.
///
/// # Examples
///
/// ```
/// use linkrot::url::parse_crawl_url;
///
/// assert!(parse_crawl_url("http://example.com").is_ok());
/// assert!(parse_crawl_url("mailto:me@example.com").is_err());
/// assert!(parse_crawl_url("/relative").is_err());
/// ```
pub fn parse_crawl_url(raw: &str) -> UrlResult<Url> {
    let url = Url::parse(raw.trim()).map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?;

    if !is_http_scheme(url.scheme()) {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    Ok(url)
}
