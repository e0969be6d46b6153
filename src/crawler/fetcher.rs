//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent and timeouts
//! - GET requests to fetch page content
//! - Redirect handling, bounded by the configured hop limit
//! - Deciding which responses carry a document

use crate::config::CrawlerConfig;
use crate::crawler::parser::link_selector;
use crate::crawler::{Crawler, Document, FetchOutcome};
use crate::Result;
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client, StatusCode};
use scraper::Selector;
use std::time::Duration;
use url::Url;

/// Upper bound on the connect phase of a request
const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```
/// use linkrot::config::CrawlerConfig;
/// use linkrot::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlerConfig) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(config.timeout())
        .connect_timeout(config.timeout().min(MAX_CONNECT_TIMEOUT))
        .redirect(Policy::limited(config.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Returns true if a response with this status is parsed into a document
///
/// Success and redirect statuses carry a document, and so do 404 and 410 so
/// that site enumeration still sees custom "not found" pages. Every other error
/// status is treated like a failed request.
pub fn has_document(status: StatusCode) -> bool {
    status.as_u16() < 400 || status == StatusCode::NOT_FOUND || status == StatusCode::GONE
}

/// Fetches pages over HTTP with reqwest and parses them with scraper
#[derive(Debug, Clone)]
pub struct HttpCrawler {
    client: Client,
    selector: Selector,
}

impl HttpCrawler {
    /// Builds a crawler from configuration
    pub fn new(config: &CrawlerConfig) -> Result<Self> {
        let client = build_http_client(config)?;
        let selector = link_selector(&config.link_selector)?;

        Ok(Self { client, selector })
    }

    /// Builds a crawler around an existing client
    pub fn with_client(client: Client, selector: Selector) -> Self {
        Self { client, selector }
    }
}

#[async_trait]
impl Crawler for HttpCrawler {
    async fn fetch_page(&self, url: &Url) -> FetchOutcome {
        let mut request_url = url.clone();
        request_url.set_fragment(None);

        let response = match self.client.get(request_url.clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Request failed for {}: {}", url, describe_error(&e));
                return FetchOutcome::failed();
            }
        };

        let status = response.status();
        let mut final_url = response.url().clone();
        if final_url == request_url {
            final_url.set_fragment(url.fragment());
        } else {
            tracing::trace!("{} redirected to {}", url, final_url);
        }

        if !has_document(status) {
            tracing::debug!("HTTP {} for {}", status.as_u16(), url);
            return FetchOutcome {
                status: Some(status.as_u16()),
                document: None,
            };
        }

        let is_html = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|content_type| content_type.contains("html"))
            .unwrap_or(true);

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::debug!("Failed to read body of {}: {}", url, describe_error(&e));
                return FetchOutcome {
                    status: Some(status.as_u16()),
                    document: None,
                };
            }
        };

        let document = if is_html {
            Document::from_html(final_url, &body, &self.selector)
        } else {
            Document::new(final_url)
        };

        FetchOutcome {
            status: Some(status.as_u16()),
            document: Some(document),
        }
    }
}

/// Short description of a request failure for logs
fn describe_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("timeout ({})", error)
    } else if error.is_redirect() {
        format!("redirect error ({})", error)
    } else if error.is_connect() {
        format!("connection failed ({})", error)
    } else {
        error.to_string()
    }
}
