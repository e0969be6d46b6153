//! Linkrot: a concurrent broken link finder
//!
//! This crate crawls a single page or an entire site, re-fetches every link it
//! discovers and classifies each one as broken, intact or ignored, producing
//! deduplicated, sorted reports plus crawl statistics.

pub mod config;
pub mod crawler;
pub mod finder;
pub mod report;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Linkrot operations
#[derive(Debug, Error)]
pub enum LinkrotError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid URL: {url}")]
    InvalidUrl { url: String },

    #[error("Invalid or broken URL: {url}")]
    UnreachableUrl { url: String },

    #[error("{failed} page classification task(s) failed: {message}")]
    WorkerFailed { failed: usize, message: String },

    #[error("Invalid crawl phase transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Report serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid path pattern: {0}")]
    InvalidPattern(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Link has no absolute form: {0}")]
    NotCrawlable(String),
}

/// Result type alias for Linkrot operations
pub type Result<T> = std::result::Result<T, LinkrotError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Crawler, Document, FetchOutcome, HttpCrawler};
pub use finder::{CrawlStats, Finder, LinkRegistry, SortMode};
pub use state::CrawlPhase;
pub use url::{Link, PathFilters};
