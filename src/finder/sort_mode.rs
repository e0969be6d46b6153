use serde::{Deserialize, Serialize};
use std::fmt;

/// Orientation of the broken and ignored report maps
///
/// Both orientations are projections of the same (page, link) pairs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Keys are pages, values are the links found on them
    #[default]
    Page,

    /// Keys are links, values are the pages they were found on
    Link,
}

impl SortMode {
    /// Projects a (page, link) pair onto a (key, value) pair
    ///
    /// # Examples
    ///
    /// ```
    /// use linkrot::SortMode;
    ///
    /// assert_eq!(SortMode::Page.key_value("/p", "/l"), ("/p", "/l"));
    /// assert_eq!(SortMode::Link.key_value("/p", "/l"), ("/l", "/p"));
    /// ```
    pub fn key_value<'a>(&self, page: &'a str, link: &'a str) -> (&'a str, &'a str) {
        match self {
            Self::Page => (page, link),
            Self::Link => (link, page),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Link => "link",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
