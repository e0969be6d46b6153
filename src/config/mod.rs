//! Configuration module for Linkrot
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use linkrot::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("linkrot.toml")).unwrap();
//! println!("Sorting reports by: {:?}", config.finder.sort);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, FinderConfig, ReportConfig, DEFAULT_LINK_SELECTOR,
    DEFAULT_MAX_WORKERS, DEFAULT_RETRY_COOLDOWN_MS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
