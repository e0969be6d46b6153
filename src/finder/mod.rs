//! Finder module: concurrent link classification
//!
//! This module contains the core of link checking, including:
//! - The shared `LinkRegistry` with its dedup sets and report maps
//! - Per-page classification of links
//! - The sequential retry pass over broken links
//! - The `Finder` dispatcher running one page task per crawled page

mod classifier;
mod registry;
mod retry;
mod sort_mode;
mod stats;

#[cfg(test)]
pub(crate) mod mock;

pub use classifier::{classify_page, is_broken};
pub use registry::{
    BrokenLinkMap, BrokenTarget, LinkRegistry, ReportMap, Resolution, Verdict,
};
pub use retry::retry_broken_links;
pub use sort_mode::SortMode;
pub use stats::CrawlStats;

use crate::config::{Config, FinderConfig};
use crate::crawler::{Crawler, Document, HttpCrawler};
use crate::report::LinkReport;
use crate::state::CrawlPhase;
use crate::url::{parse_crawl_url, PathFilters};
use crate::{LinkrotError, Result};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// Crawls pages and classifies their links
///
/// State is reset at the start of every crawl and frozen once the crawl
/// returns, until the next crawl.
pub struct Finder {
    crawler: Arc<dyn Crawler>,
    registry: Arc<LinkRegistry>,
    config: FinderConfig,
    filters: PathFilters,
    phase: CrawlPhase,
}

impl Finder {
    pub fn new(crawler: Arc<dyn Crawler>, config: FinderConfig, filters: PathFilters) -> Self {
        Self {
            crawler,
            registry: Arc::new(LinkRegistry::new(config.sort)),
            config,
            filters,
            phase: CrawlPhase::default(),
        }
    }

    /// Builds a finder backed by an `HttpCrawler`
    pub fn from_config(config: &Config) -> Result<Self> {
        let crawler = HttpCrawler::new(&config.crawler)?;

        Ok(Self::new(
            Arc::new(crawler),
            config.finder.clone(),
            config.crawler.path_filters(),
        ))
    }

    /// Checks the links of a single page
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - At least one broken link remains after the retry pass
    /// * `Ok(false)` - No broken links
    /// * `Err(LinkrotError::UnreachableUrl)` - The page could not be fetched
    pub async fn crawl_page(&mut self, url: &str) -> Result<bool> {
        let start = Instant::now();
        let started_at = Utc::now();

        let url = self.begin(url)?;
        tracing::info!("Crawling page {}", url);

        let outcome = self.crawler.fetch_page(&url).await;
        let not_found = outcome.is_not_found();
        let document = match outcome.document {
            Some(document) if !not_found => document,
            _ => {
                return self.fail(LinkrotError::UnreachableUrl {
                    url: url.to_string(),
                })
            }
        };

        let pages = vec![document.url().to_string()];
        classify_page(&self.registry, self.crawler.as_ref(), &document).await;

        self.transition(CrawlPhase::Draining)?;
        self.finish(&url, pages, start, started_at).await
    }

    /// Checks the links of every page of a site
    ///
    /// Each page the crawler yields becomes one task, with at most
    /// `max_workers` tasks classifying at a time. Every task is awaited before
    /// any error is returned.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - At least one broken link remains after the retry pass
    /// * `Ok(false)` - No broken links
    /// * `Err(LinkrotError::UnreachableUrl)` - The root could not be fetched
    /// * `Err(LinkrotError::WorkerFailed)` - A page task panicked
    pub async fn crawl_site(&mut self, url: &str) -> Result<bool> {
        let start = Instant::now();
        let started_at = Utc::now();

        let url = self.begin(url)?;
        tracing::info!(
            "Crawling site {} with up to {} worker(s)",
            url,
            self.config.max_workers
        );

        let semaphore = Arc::new(Semaphore::new(self.config.max_workers));
        let mut tasks: JoinSet<()> = JoinSet::new();
        let mut pages = Vec::new();

        let root_reachable = {
            let registry = &self.registry;
            let crawler = &self.crawler;

            let mut on_page = |document: Document| {
                pages.push(document.url().to_string());

                let registry = Arc::clone(registry);
                let crawler = Arc::clone(crawler);
                let semaphore = Arc::clone(&semaphore);

                tasks.spawn(async move {
                    let _permit = semaphore.acquire_owned().await.ok();
                    classify_page(&registry, crawler.as_ref(), &document).await;
                });
            };

            self.crawler
                .fetch_site(&url, &self.filters, &mut on_page)
                .await
        };
        tracing::info!("Enumerated {} page(s), waiting for classification", pages.len());

        self.transition(CrawlPhase::Draining)?;
        let failures = drain(&mut tasks).await;

        if !root_reachable {
            return self.fail(LinkrotError::UnreachableUrl {
                url: url.to_string(),
            });
        }

        if let Some(message) = failures.first() {
            return self.fail(LinkrotError::WorkerFailed {
                failed: failures.len(),
                message: message.clone(),
            });
        }

        self.finish(&url, pages, start, started_at).await
    }

    /// Parses the URL and resets all state for a new crawl
    fn begin(&mut self, url: &str) -> Result<Url> {
        self.transition(CrawlPhase::Resetting)?;
        self.registry.reset();

        let url = match parse_crawl_url(url) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Rejected crawl URL {}: {}", url, e);
                return self.fail(LinkrotError::InvalidUrl {
                    url: url.to_string(),
                });
            }
        };

        self.transition(CrawlPhase::Classifying)?;
        Ok(url)
    }

    /// Retry pass, then sort and tally
    async fn finish(
        &mut self,
        url: &Url,
        pages: Vec<String>,
        start: Instant,
        started_at: DateTime<Utc>,
    ) -> Result<bool> {
        self.transition(CrawlPhase::Retrying)?;
        let recovered =
            retry_broken_links(&self.registry, self.crawler.as_ref(), self.config.retry_cooldown())
                .await;
        if recovered > 0 {
            tracing::info!("{} link(s) recovered on retry", recovered);
        }

        self.transition(CrawlPhase::Sorting)?;
        self.registry.sort();
        let stats = self.registry.tally(url, pages, start, started_at);

        self.transition(CrawlPhase::Done)?;
        tracing::info!(
            "Crawled {} page(s): {} broken, {} intact, {} ignored link(s) in {:.2}s",
            stats.num_pages,
            stats.num_broken,
            stats.num_intact,
            stats.num_ignored,
            stats.duration_secs()
        );

        Ok(self.registry.has_broken_links())
    }

    fn transition(&mut self, to: CrawlPhase) -> Result<()> {
        if !self.phase.can_transition_to(to) {
            return Err(LinkrotError::InvalidTransition {
                from: self.phase,
                to,
            });
        }

        tracing::trace!("Crawl phase {} -> {}", self.phase, to);
        self.phase = to;
        Ok(())
    }

    fn fail<T>(&mut self, error: LinkrotError) -> Result<T> {
        tracing::warn!("Crawl failed during {}: {}", self.phase, error);
        self.transition(CrawlPhase::Failed)?;
        Err(error)
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn sort_mode(&self) -> SortMode {
        self.registry.sort_mode()
    }

    pub fn broken_links(&self) -> ReportMap {
        self.registry.broken_links()
    }

    pub fn ignored_links(&self) -> ReportMap {
        self.registry.ignored_links()
    }

    pub fn broken_link_map(&self) -> BrokenLinkMap {
        self.registry.broken_link_map()
    }

    pub fn crawl_stats(&self) -> CrawlStats {
        self.registry.crawl_stats()
    }

    pub fn all_broken_links(&self) -> BTreeSet<String> {
        self.registry.all_broken_links()
    }

    pub fn all_intact_links(&self) -> BTreeSet<String> {
        self.registry.all_intact_links()
    }

    pub fn all_ignored_links(&self) -> BTreeSet<String> {
        self.registry.all_ignored_links()
    }

    /// Snapshot of the last crawl for the reporters
    pub fn report(&self) -> LinkReport {
        LinkReport {
            sort: self.sort_mode(),
            broken_links: self.broken_links(),
            ignored_links: self.ignored_links(),
            broken_link_map: self.broken_link_map(),
            stats: self.crawl_stats(),
        }
    }
}

/// Awaits every task, collecting panic messages
async fn drain(tasks: &mut JoinSet<()>) -> Vec<String> {
    let mut failures = Vec::new();

    while let Some(joined) = tasks.join_next().await {
        if let Err(e) = joined {
            tracing::error!("Page task failed: {}", e);
            failures.push(e.to_string());
        }
    }

    failures
}
