use crate::config::types::{Config, CrawlerConfig, FinderConfig};
use crate::ConfigError;
use scraper::Selector;

/// Upper bound on the worker pool size
const MAX_WORKERS_LIMIT: usize = 1000;

/// Upper bound on the retry cool-down (milliseconds)
const MAX_RETRY_COOLDOWN_MS: u64 = 60_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_finder_config(&config.finder)?;
    validate_crawler_config(&config.crawler)?;
    Ok(())
}

/// Validates classification engine configuration
fn validate_finder_config(config: &FinderConfig) -> Result<(), ConfigError> {
    if config.max_workers < 1 || config.max_workers > MAX_WORKERS_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_workers must be between 1 and {}, got {}",
            MAX_WORKERS_LIMIT, config.max_workers
        )));
    }

    if config.retry_cooldown_ms > MAX_RETRY_COOLDOWN_MS {
        return Err(ConfigError::Validation(format!(
            "retry_cooldown_ms must be <= {}ms, got {}ms",
            MAX_RETRY_COOLDOWN_MS, config.retry_cooldown_ms
        )));
    }

    Ok(())
}

/// Validates HTTP crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    Selector::parse(&config.link_selector).map_err(|e| {
        ConfigError::Validation(format!(
            "Invalid link_selector '{}': {:?}",
            config.link_selector, e
        ))
    })?;

    for pattern in config.allow_paths.iter().chain(&config.disallow_paths) {
        validate_path_pattern(pattern)?;
    }

    Ok(())
}

/// Validates a path glob pattern
fn validate_path_pattern(pattern: &str) -> Result<(), ConfigError> {
    if pattern.trim().is_empty() {
        return Err(ConfigError::InvalidPattern(
            "Path pattern cannot be empty".to_string(),
        ));
    }

    if pattern.contains("://") || pattern.contains('?') || pattern.contains('#') {
        return Err(ConfigError::InvalidPattern(format!(
            "Path pattern '{}' must be a URL path, not a full URL",
            pattern
        )));
    }

    if pattern.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidPattern(format!(
            "Path pattern '{}' cannot contain whitespace",
            pattern
        )));
    }

    Ok(())
}
