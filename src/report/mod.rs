//! Report module for presenting crawl results
//!
//! This module handles:
//! - Rendering plain text reports for the terminal
//! - Rendering HTML report fragments
//! - Exporting the full result set as JSON
//!
//! Reporters are pure functions over a `LinkReport` snapshot.

mod html;
mod json;
mod text;

pub use html::format_html_report;
pub use json::format_json_report;
pub use text::format_text_report;

use crate::config::ReportConfig;
use crate::finder::{BrokenLinkMap, CrawlStats, ReportMap, SortMode};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Number of values listed per group in concise mode
pub const NUM_VALUES: usize = 3;

/// Output format of a report
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Html,
    Json,
}

/// Verbosity of the broken and ignored sections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    /// List every value of a broken link group
    pub broken_verbose: bool,

    /// List every value of an ignored link group
    pub ignored_verbose: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            broken_verbose: true,
            ignored_verbose: false,
        }
    }
}

impl From<&ReportConfig> for ReportOptions {
    fn from(config: &ReportConfig) -> Self {
        Self {
            broken_verbose: config.broken_verbose,
            ignored_verbose: config.ignored_verbose,
        }
    }
}

/// Frozen results of one crawl
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LinkReport {
    pub sort: SortMode,
    pub broken_links: ReportMap,
    pub ignored_links: ReportMap,
    pub broken_link_map: BrokenLinkMap,
    pub stats: CrawlStats,
}

impl LinkReport {
    /// Returns (pages, links) counted over a report map
    ///
    /// By page the keys are pages and the unique values are links; by link it
    /// is the other way around.
    pub fn hash_stats(&self, map: &ReportMap) -> (usize, usize) {
        let num_keys = map.len();
        let num_values = map
            .values()
            .flatten()
            .map(String::as_str)
            .collect::<HashSet<_>>()
            .len();

        match self.sort {
            SortMode::Page => (num_keys, num_values),
            SortMode::Link => (num_values, num_keys),
        }
    }

    /// The href for a link or page shown in a report
    ///
    /// Absolute values are used as they are. Relative broken links resolve
    /// through the broken link map, falling back to the raw text.
    pub fn build_url<'a>(&'a self, value: &'a str) -> &'a str {
        if url::Url::parse(value).is_ok() {
            return value;
        }

        self.broken_link_map
            .get(value)
            .map(|target| target.absolute.as_str())
            .unwrap_or(value)
    }
}

/// Renders a report in the requested format
pub fn format_report(
    report: &LinkReport,
    format: ReportFormat,
    options: &ReportOptions,
) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(format_text_report(report, options)),
        ReportFormat::Html => Ok(format_html_report(report, options)),
        ReportFormat::Json => format_json_report(report),
    }
}

/// Renders a report and writes it to `output_path`, or stdout when `None`
pub fn write_report(
    report: &LinkReport,
    format: ReportFormat,
    options: &ReportOptions,
    output_path: Option<&Path>,
) -> Result<()> {
    let rendered = format_report(report, format, options)?;

    match output_path {
        Some(path) => {
            let mut file = File::create(path)?;
            file.write_all(rendered.as_bytes())?;
            tracing::info!("Report written to {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(rendered.as_bytes())?;
            handle.flush()?;
        }
    }

    Ok(())
}
