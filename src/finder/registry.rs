//! Shared crawl state
//!
//! `LinkRegistry` owns every map and set written by concurrent page tasks.
//! Each public method takes the lock once for its whole body, so callers never
//! observe a half-applied update.

use crate::finder::{CrawlStats, SortMode};
use crate::url::Link;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;
use tokio::sync::OnceCell;
use url::Url;

/// Report map: key to a list of values, oriented by `SortMode`
pub type ReportMap = BTreeMap<String, Vec<String>>;

/// Broken link to the form it is re-checked with
pub type BrokenLinkMap = BTreeMap<String, BrokenTarget>;

/// Where a broken link points
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BrokenTarget {
    /// The absolute URL, or the raw text for links without one
    pub absolute: String,

    /// False for links that no fetch could ever fix
    pub retryable: bool,
}

/// Result of a link fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Intact,
    Broken,
}

/// What the registry already knows about a link
#[derive(Debug, Clone)]
pub enum Resolution {
    /// Fetched and fine; nothing to do
    Intact,

    /// Known broken; record another occurrence
    Broken,

    /// Not resolved yet. Every task racing on the link shares this cell and
    /// only the task that initializes it fetches.
    Unresolved(Arc<OnceCell<Verdict>>),
}

#[derive(Debug, Default)]
struct RegistryState {
    broken: ReportMap,
    ignored: ReportMap,
    all_broken: HashSet<String>,
    all_intact: HashSet<String>,
    all_ignored: HashSet<String>,
    broken_link_map: BrokenLinkMap,
    pending: HashMap<String, Arc<OnceCell<Verdict>>>,
    stats: CrawlStats,
}

/// Thread-safe owner of all crawl-scoped state
#[derive(Debug)]
pub struct LinkRegistry {
    sort: SortMode,
    state: Mutex<RegistryState>,
}

impl LinkRegistry {
    pub fn new(sort: SortMode) -> Self {
        Self {
            sort,
            state: Mutex::new(RegistryState::default()),
        }
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort
    }

    fn lock(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Clears every map, set and statistic
    pub fn reset(&self) {
        *self.lock() = RegistryState::default();
    }

    /// Looks up a link, registering it as pending if it is new
    pub fn resolve(&self, link: &Link) -> Resolution {
        let mut state = self.lock();

        if state.all_intact.contains(link.as_str()) {
            return Resolution::Intact;
        }
        if state.all_broken.contains(link.as_str()) {
            return Resolution::Broken;
        }

        let cell = state
            .pending
            .entry(link.as_str().to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()));
        Resolution::Unresolved(Arc::clone(cell))
    }

    /// Records a broken link found on `page`
    ///
    /// With `record_absolute`, the link's absolute form is stored for the retry
    /// pass unless an earlier occurrence already stored it.
    pub fn append_broken(&self, page: &Url, link: &Link, record_absolute: bool) {
        let mut state = self.lock();

        let (key, value) = self.sort.key_value(page.as_str(), link.as_str());
        state
            .broken
            .entry(key.to_string())
            .or_default()
            .push(value.to_string());
        state.all_broken.insert(link.as_str().to_string());
        state.pending.remove(link.as_str());

        if record_absolute && !state.broken_link_map.contains_key(link.as_str()) {
            let target = broken_target(page, link);
            state
                .broken_link_map
                .insert(link.as_str().to_string(), target);
        }
    }

    /// Moves a link from broken to intact
    ///
    /// By page, every bucket is scanned and emptied buckets are dropped. By
    /// link, the link's bucket is removed directly. The broken link map is left
    /// alone; see `replace_broken_link_map`.
    pub fn remove_broken(&self, link: &str) {
        let mut state = self.lock();

        state.all_broken.remove(link);
        state.all_intact.insert(link.to_string());

        match self.sort {
            SortMode::Page => state.broken.retain(|_, links| {
                links.retain(|l| l != link);
                !links.is_empty()
            }),
            SortMode::Link => {
                state.broken.remove(link);
            }
        }
    }

    /// Records a link with an unsupported scheme found on `page`
    pub fn append_ignored(&self, page: &Url, link: &Link) {
        let mut state = self.lock();

        let (key, value) = self.sort.key_value(page.as_str(), link.as_str());
        state
            .ignored
            .entry(key.to_string())
            .or_default()
            .push(value.to_string());
        state.all_ignored.insert(link.as_str().to_string());
    }

    /// Records an intact link. Intact links are never reported.
    pub fn append_intact(&self, link: &Link) {
        let mut state = self.lock();
        state.all_intact.insert(link.as_str().to_string());
        state.pending.remove(link.as_str());
    }

    /// Broken links worth fetching again, with their absolute URLs
    pub fn retry_candidates(&self) -> Vec<(String, Url)> {
        let state = self.lock();

        state
            .broken_link_map
            .iter()
            .filter(|(_, target)| target.retryable)
            .filter_map(|(link, target)| match Url::parse(&target.absolute) {
                Ok(url) => Some((link.clone(), url)),
                Err(e) => {
                    tracing::warn!("Cannot retry {}: {}", link, e);
                    None
                }
            })
            .collect()
    }

    /// Swaps in a rebuilt broken link map
    pub fn replace_broken_link_map(&self, map: BrokenLinkMap) {
        self.lock().broken_link_map = map;
    }

    /// Deduplicates and orders every report bucket
    ///
    /// Must only run once no page task can write anymore.
    pub fn sort(&self) {
        let mut state = self.lock();
        let RegistryState {
            broken, ignored, ..
        } = &mut *state;

        for values in broken.values_mut().chain(ignored.values_mut()) {
            values.sort();
            values.dedup();
        }
    }

    /// Computes and stores crawl statistics
    pub fn tally(
        &self,
        url: &Url,
        pages_crawled: Vec<String>,
        start: Instant,
        started_at: DateTime<Utc>,
    ) -> CrawlStats {
        let mut state = self.lock();

        let mut pages_crawled = pages_crawled;
        pages_crawled.sort();
        pages_crawled.dedup();

        let num_broken = state.all_broken.len();
        let num_intact = state.all_intact.len();
        let num_ignored = state.all_ignored.len();

        let stats = CrawlStats {
            url: url.to_string(),
            num_pages: pages_crawled.len(),
            pages_crawled,
            num_links: num_broken + num_intact + num_ignored,
            num_broken,
            num_intact,
            num_ignored,
            duration: start.elapsed(),
            started_at: Some(started_at),
        };

        state.stats = stats.clone();
        stats
    }

    pub fn broken_links(&self) -> ReportMap {
        self.lock().broken.clone()
    }

    pub fn ignored_links(&self) -> ReportMap {
        self.lock().ignored.clone()
    }

    pub fn broken_link_map(&self) -> BrokenLinkMap {
        self.lock().broken_link_map.clone()
    }

    pub fn crawl_stats(&self) -> CrawlStats {
        self.lock().stats.clone()
    }

    pub fn all_broken_links(&self) -> BTreeSet<String> {
        self.lock().all_broken.iter().cloned().collect()
    }

    pub fn all_intact_links(&self) -> BTreeSet<String> {
        self.lock().all_intact.iter().cloned().collect()
    }

    pub fn all_ignored_links(&self) -> BTreeSet<String> {
        self.lock().all_ignored.iter().cloned().collect()
    }

    pub fn has_broken_links(&self) -> bool {
        !self.lock().all_broken.is_empty()
    }
}

impl Default for LinkRegistry {
    fn default() -> Self {
        Self::new(SortMode::default())
    }
}

fn broken_target(page: &Url, link: &Link) -> BrokenTarget {
    if link.is_unparsable() {
        return BrokenTarget {
            absolute: link.as_str().to_string(),
            retryable: false,
        };
    }

    match link.make_absolute(page) {
        Ok(absolute) => BrokenTarget {
            absolute: absolute.to_string(),
            retryable: true,
        },
        Err(_) => BrokenTarget {
            absolute: link.as_str().to_string(),
            retryable: false,
        },
    }
}
