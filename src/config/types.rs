use crate::finder::SortMode;
use crate::report::ReportFormat;
use crate::url::PathFilters;
use serde::Deserialize;
use std::time::Duration;

/// Default number of concurrent page classification tasks
pub const DEFAULT_MAX_WORKERS: usize = 100;

/// Default pause between classification and the retry pass (milliseconds)
pub const DEFAULT_RETRY_COOLDOWN_MS: u64 = 500;

/// Default CSS selector for link bearing elements
pub const DEFAULT_LINK_SELECTOR: &str = "[href], [src]";

/// Main configuration structure for Linkrot
///
/// Every section is optional; a missing section takes its defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub finder: FinderConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

/// Classification engine configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct FinderConfig {
    /// Whether report maps are keyed by page or by link
    pub sort: SortMode,

    /// Maximum number of pages classified concurrently during a site crawl
    pub max_workers: usize,

    /// Pause before re-checking broken links (milliseconds)
    pub retry_cooldown_ms: u64,
}

impl FinderConfig {
    pub fn retry_cooldown(&self) -> Duration {
        Duration::from_millis(self.retry_cooldown_ms)
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            sort: SortMode::Page,
            max_workers: DEFAULT_MAX_WORKERS,
            retry_cooldown_ms: DEFAULT_RETRY_COOLDOWN_MS,
        }
    }
}

/// HTTP crawler configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct CrawlerConfig {
    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Whole-request timeout (seconds)
    pub timeout_secs: u64,

    /// Maximum redirect hops followed per request
    pub max_redirects: usize,

    /// CSS selector for elements whose href/src attributes are links
    pub link_selector: String,

    /// Glob patterns a page path must match to be crawled (site crawls only)
    pub allow_paths: Vec<String>,

    /// Glob patterns excluding page paths from a site crawl
    pub disallow_paths: Vec<String>,
}

impl CrawlerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn path_filters(&self) -> PathFilters {
        PathFilters::new(self.allow_paths.clone(), self.disallow_paths.clone())
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("linkrot/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: 10,
            max_redirects: 5,
            link_selector: DEFAULT_LINK_SELECTOR.to_string(),
            allow_paths: Vec::new(),
            disallow_paths: Vec::new(),
        }
    }
}

/// Report output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ReportConfig {
    pub format: ReportFormat,

    /// List every value of a broken link group
    pub broken_verbose: bool,

    /// List every value of an ignored link group
    pub ignored_verbose: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::Text,
            broken_verbose: true,
            ignored_verbose: false,
        }
    }
}
