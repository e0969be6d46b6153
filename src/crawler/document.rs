use crate::crawler::parser::{parse_html, ParsedPage};
use crate::url::Link;
use percent_encoding::percent_decode_str;
use scraper::Selector;
use std::collections::HashSet;
use url::Url;

/// A fetched page as seen by link classification
///
/// The URL is the final URL after redirects. When no redirect happened it keeps
/// the fragment of the requested URL, so `/contact#help` can be checked against
/// the element ids of `/contact`.
#[derive(Debug, Clone)]
pub struct Document {
    url: Url,
    links: Vec<Link>,
    unparsable_links: Vec<String>,
    ids: HashSet<String>,
}

impl Document {
    /// A document with no links or ids, used for non-HTML responses
    pub fn new(url: Url) -> Self {
        Self {
            url,
            links: Vec::new(),
            unparsable_links: Vec::new(),
            ids: HashSet::new(),
        }
    }

    /// Builds a document by parsing an HTML body
    pub fn from_html(url: Url, html: &str, selector: &Selector) -> Self {
        let ParsedPage {
            links,
            unparsable_links,
            ids,
        } = parse_html(html, selector);

        Self {
            url,
            links,
            unparsable_links,
            ids,
        }
    }

    /// Replaces the extracted links
    pub fn with_links<I, S>(mut self, links: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.links.clear();
        self.unparsable_links.clear();

        for raw in links {
            match Link::parse(raw.as_ref()) {
                Ok(link) => self.links.push(link),
                Err(_) => self.unparsable_links.push(raw.as_ref().trim().to_string()),
            }
        }

        self
    }

    /// Replaces the element ids
    pub fn with_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn unparsable_links(&self) -> &[String] {
        &self.unparsable_links
    }

    pub fn has_element_id(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Returns true if the URL's fragment names no element in the document
    ///
    /// The fragment is percent-decoded before the lookup since ids are stored
    /// as written. A URL without a fragment (or with an empty one) never misses.
    pub fn is_missing_fragment(&self) -> bool {
        match self.url.fragment() {
            Some(fragment) if !fragment.is_empty() => {
                let id = percent_decode_str(fragment).decode_utf8_lossy();
                !self.has_element_id(&id)
            }
            _ => false,
        }
    }
}
