//! In-memory crawler for finder tests

use crate::crawler::{has_document, Crawler, Document, FetchOutcome};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use url::Url;

#[derive(Debug, Clone)]
pub(crate) struct MockPage {
    status: Option<u16>,
    links: Vec<String>,
    ids: Vec<String>,
    failures: usize,
}

impl MockPage {
    pub fn ok() -> Self {
        Self::status(200)
    }

    pub fn status(code: u16) -> Self {
        Self {
            status: Some(code),
            links: Vec::new(),
            ids: Vec::new(),
            failures: 0,
        }
    }

    /// No response at all
    pub fn unreachable() -> Self {
        Self {
            status: None,
            ..Self::ok()
        }
    }

    pub fn links<I, S>(mut self, links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.links = links.into_iter().map(|s| s.as_ref().to_string()).collect();
        self
    }

    pub fn ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.ids = ids.into_iter().map(|s| s.as_ref().to_string()).collect();
        self
    }

    /// Fails outright for the first `n` fetches
    pub fn failing_first(mut self, n: usize) -> Self {
        self.failures = n;
        self
    }
}

/// Serves canned pages and counts fetches per URL (fragment ignored)
///
/// Unknown URLs answer 404 with an empty document.
#[derive(Debug, Default)]
pub(crate) struct MockCrawler {
    pages: HashMap<String, MockPage>,
    panic_on: HashSet<String>,
    fetches: Mutex<HashMap<String, usize>>,
}

impl MockCrawler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, page: MockPage) -> Self {
        self.pages.insert(key(&Url::parse(url).unwrap()), page);
        self
    }

    pub fn panic_on(mut self, url: &str) -> Self {
        self.panic_on.insert(key(&Url::parse(url).unwrap()));
        self
    }

    pub fn fetch_count(&self, url: &str) -> usize {
        let url = key(&Url::parse(url).unwrap());
        self.fetches.lock().unwrap().get(&url).copied().unwrap_or(0)
    }

    pub fn total_fetches(&self) -> usize {
        self.fetches.lock().unwrap().values().sum()
    }
}

fn key(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    url.to_string()
}

#[async_trait]
impl Crawler for MockCrawler {
    async fn fetch_page(&self, url: &Url) -> FetchOutcome {
        let key = key(url);
        let attempt = {
            let mut fetches = self.fetches.lock().unwrap();
            let count = fetches.entry(key.clone()).or_insert(0);
            *count += 1;
            *count
        };

        // Let other page tasks interleave
        tokio::task::yield_now().await;

        if self.panic_on.contains(&key) {
            panic!("mock crawler asked to fetch {}", key);
        }

        let Some(page) = self.pages.get(&key) else {
            return FetchOutcome {
                status: Some(404),
                document: Some(Document::new(url.clone())),
            };
        };

        if attempt <= page.failures {
            return FetchOutcome::failed();
        }

        let Some(code) = page.status else {
            return FetchOutcome::failed();
        };

        let status = StatusCode::from_u16(code).unwrap();
        if !has_document(status) {
            return FetchOutcome {
                status: Some(code),
                document: None,
            };
        }

        let document = Document::new(url.clone())
            .with_links(page.links.iter())
            .with_ids(page.ids.iter().cloned());

        FetchOutcome {
            status: Some(code),
            document: Some(document),
        }
    }
}
