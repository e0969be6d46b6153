use crate::{UrlError, UrlResult};
use std::fmt;
use std::hash::{Hash, Hasher};
use url::{ParseError, Url};

/// Base used only to check that a relative link is well formed
const PLACEHOLDER_BASE: &str = "http://placeholder.invalid/";

/// How a link's raw text parsed
#[derive(Debug, Clone)]
enum LinkKind {
    /// Carries its own scheme, e.g. `https://example.com` or `mailto:me@example.com`
    Absolute(Url),
    /// Needs the page URL to become crawlable, e.g. `/about` or `#top`
    Relative,
    /// Not a URL at all
    Unparsable,
}

/// A link exactly as it was written in a page's markup
///
/// Equality and hashing use the raw text only, so `/about` and
/// `https://example.com/about` are distinct links even when they point at the
/// same resource. Reports show links the way authors wrote them.
#[derive(Debug, Clone)]
pub struct Link {
    raw: String,
    kind: LinkKind,
}

impl Link {
    /// Parses raw link text
    ///
    /// # Returns
    ///
    /// * `Ok(Link)` - An absolute or relative link
    /// * `Err(UrlError::Parse)` - The text cannot be a URL
    ///
    /// # Examples
    ///
    /// ```
    /// use linkrot::url::Link;
    ///
    /// assert!(Link::parse("https://example.com").unwrap().is_absolute());
    /// assert!(!Link::parse("/about").unwrap().is_absolute());
    /// assert!(Link::parse("http://").is_err());
    /// ```
    pub fn parse(raw: &str) -> UrlResult<Self> {
        let raw = raw.trim();

        match Url::parse(raw) {
            Ok(url) => Ok(Self {
                raw: raw.to_string(),
                kind: LinkKind::Absolute(url),
            }),
            Err(ParseError::RelativeUrlWithoutBase) => {
                let base = Url::parse(PLACEHOLDER_BASE)
                    .map_err(|e| UrlError::Parse(e.to_string()))?;
                base.join(raw)
                    .map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?;

                Ok(Self {
                    raw: raw.to_string(),
                    kind: LinkKind::Relative,
                })
            }
            Err(e) => Err(UrlError::Parse(format!("{}: {}", raw, e))),
        }
    }

    /// Wraps raw text that failed to parse so it can be reported as broken
    pub fn unparsable(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            kind: LinkKind::Unparsable,
        }
    }

    /// The link text as written
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_absolute(&self) -> bool {
        matches!(self.kind, LinkKind::Absolute(_))
    }

    pub fn is_unparsable(&self) -> bool {
        matches!(self.kind, LinkKind::Unparsable)
    }

    /// The scheme of an absolute link
    pub fn scheme(&self) -> Option<&str> {
        match &self.kind {
            LinkKind::Absolute(url) => Some(url.scheme()),
            _ => None,
        }
    }

    /// Returns true for absolute links whose scheme is not http(s)
    ///
    /// This is a purely syntactic check; ignored links are never fetched.
    pub fn is_ignored(&self) -> bool {
        match self.scheme() {
            Some(scheme) => !is_http_scheme(scheme),
            None => false,
        }
    }

    /// Resolves the link against the URL of the page it was found on
    ///
    /// # Returns
    ///
    /// * `Ok(Url)` - The crawlable form of the link
    /// * `Err(UrlError::NotCrawlable)` - The link is unparsable
    pub fn make_absolute(&self, base: &Url) -> UrlResult<Url> {
        match &self.kind {
            LinkKind::Absolute(url) => Ok(url.clone()),
            LinkKind::Relative => base
                .join(&self.raw)
                .map_err(|e| UrlError::Parse(format!("{}: {}", self.raw, e))),
            LinkKind::Unparsable => Err(UrlError::NotCrawlable(self.raw.clone())),
        }
    }
}

/// Returns true for the schemes the finder can fetch
pub fn is_http_scheme(scheme: &str) -> bool {
    scheme == "http" || scheme == "https"
}

impl PartialEq for Link {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for Link {}

impl Hash for Link {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
