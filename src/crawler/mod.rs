//! Crawler module for web page fetching and processing
//!
//! This module contains the fetching side of link checking, including:
//! - The `Crawler` trait the finder is written against
//! - HTTP fetching with reqwest
//! - HTML parsing and link extraction
//! - Same-site page enumeration

mod document;
mod fetcher;
mod parser;
mod site;

pub use document::Document;
pub use fetcher::{build_http_client, has_document, HttpCrawler};
pub use parser::{link_selector, parse_html, ParsedPage};
pub use site::enumerate_site;

use crate::url::PathFilters;
use async_trait::async_trait;
use url::Url;

/// Result of fetching a single URL
///
/// `status` is `None` when no HTTP response was received at all.
/// `document` is `None` when the response could not be turned into a page.
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    pub status: Option<u16>,
    pub document: Option<Document>,
}

impl FetchOutcome {
    /// An outcome for a request that produced no response
    pub fn failed() -> Self {
        Self::default()
    }

    /// A successful outcome carrying a document
    pub fn ok(document: Document) -> Self {
        Self {
            status: Some(200),
            document: Some(document),
        }
    }

    /// Returns true for 404 Not Found and 410 Gone
    pub fn is_not_found(&self) -> bool {
        matches!(self.status, Some(404) | Some(410))
    }
}

/// Fetches pages for the finder
///
/// Implementations must be safe to share between concurrent classification
/// tasks.
#[async_trait]
pub trait Crawler: Send + Sync {
    /// Fetches one URL
    ///
    /// Never fails: transport and HTTP errors are expressed through the
    /// returned `FetchOutcome`.
    async fn fetch_page(&self, url: &Url) -> FetchOutcome;

    /// Visits every page of the root's site, calling `on_page` for each one
    ///
    /// Returns false when the root is unreachable.
    async fn fetch_site(
        &self,
        root: &Url,
        filters: &PathFilters,
        on_page: &mut (dyn FnMut(Document) + Send),
    ) -> bool {
        enumerate_site(self, root, filters, on_page).await
    }
}
