use url::Url;

/// Checks if a URL path matches a glob pattern
///
/// `*` matches any run of characters, including `/`. Leading slashes are
/// ignored on both sides, so `blog/*` and `/blog/*` are the same pattern.
///
/// # Examples
///
/// ```
/// use linkrot::url::matches_glob;
///
/// assert!(matches_glob("blog/*", "/blog/2020/post"));
/// assert!(matches_glob("*.html", "/docs/index.html"));
/// assert!(!matches_glob("blog/*", "/about"));
/// ```
pub fn matches_glob(pattern: &str, path: &str) -> bool {
    let pattern = pattern.trim_start_matches('/').as_bytes();
    let path = path.trim_start_matches('/').as_bytes();

    let (mut p, mut s) = (0, 0);
    // Position of the last `*` seen and the path index it was tried at
    let mut backtrack: Option<(usize, usize)> = None;

    while s < path.len() {
        if p < pattern.len() && pattern[p] == b'*' {
            backtrack = Some((p, s));
            p += 1;
        } else if p < pattern.len() && pattern[p] == path[s] {
            p += 1;
            s += 1;
        } else if let Some((star, matched)) = backtrack {
            p = star + 1;
            s = matched + 1;
            backtrack = Some((star, matched + 1));
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&c| c == b'*')
}

/// Allow/deny path filters applied while enumerating a site
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathFilters {
    /// If non-empty, a page path must match one of these
    pub allow: Vec<String>,

    /// A page path must match none of these
    pub disallow: Vec<String>,
}

impl PathFilters {
    pub fn new(allow: Vec<String>, disallow: Vec<String>) -> Self {
        Self { allow, disallow }
    }

    /// Returns true if the filters let the URL through
    pub fn permits(&self, url: &Url) -> bool {
        let path = url.path();

        if !self.allow.is_empty() && !self.allow.iter().any(|p| matches_glob(p, path)) {
            return false;
        }

        !self.disallow.iter().any(|p| matches_glob(p, path))
    }

    pub fn is_empty(&self) -> bool {
        self.allow.is_empty() && self.disallow.is_empty()
    }
}
