//! Crawl statistics

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::time::Duration;

/// Crawl statistics summary
///
/// Computed once per crawl, after the retry pass and the final sort.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CrawlStats {
    /// The URL the crawl started from
    pub url: String,

    /// Every page whose links were classified, sorted
    pub pages_crawled: Vec<String>,

    /// Number of pages crawled
    pub num_pages: usize,

    /// Total number of unique links (broken + intact + ignored)
    pub num_links: usize,

    pub num_broken: usize,
    pub num_intact: usize,
    pub num_ignored: usize,

    /// Wall clock time of the whole crawl, in seconds when serialized
    #[serde(serialize_with = "serialize_secs")]
    pub duration: Duration,

    /// When the crawl started
    pub started_at: Option<DateTime<Utc>>,
}

impl CrawlStats {
    /// Duration in seconds, truncated to two decimal places
    pub fn duration_secs(&self) -> f64 {
        (self.duration.as_secs_f64() * 100.0).trunc() / 100.0
    }
}

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}
