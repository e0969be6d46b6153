use url::Url;

/// Normalizes a page URL for deduplication during site enumeration
///
/// # Normalization Steps
///
/// 1. Remove fragment (everything after #)
/// 2. Empty path becomes /
/// 3. Remove empty query string (trailing ?)
///
/// Query strings are kept: `/about?q=world` and `/about` are distinct pages.
///
/// # Examples
///
/// ```
/// use linkrot::url::normalize_page_url;
/// use url::Url;
///
/// let url = Url::parse("http://example.com/contact?#help").unwrap();
/// assert_eq!(normalize_page_url(&url).as_str(), "http://example.com/contact");
/// ```
pub fn normalize_page_url(url: &Url) -> Url {
    let mut url = url.clone();

    url.set_fragment(None);

    if url.path().is_empty() {
        url.set_path("/");
    }

    if url.query() == Some("") {
        url.set_query(None);
    }

    url
}

/// Returns true if `candidate` belongs to the same site as `root`
///
/// Same scheme, host and port.
pub fn is_same_site(root: &Url, candidate: &Url) -> bool {
    root.scheme() == candidate.scheme()
        && root.host_str().map(str::to_lowercase) == candidate.host_str().map(str::to_lowercase)
        && root.port_or_known_default() == candidate.port_or_known_default()
}
