//! Same-site page enumeration
//!
//! Pages are visited breadth first starting from the root. A page is followed
//! when it shares the root's scheme, host and port and its path passes the
//! configured filters. The root itself is always visited.

use crate::crawler::{Crawler, Document};
use crate::url::{is_http_scheme, is_same_site, normalize_page_url, PathFilters};
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Walks every reachable page of the root's site
///
/// `on_page` receives each fetched document, including "not found" pages.
/// Returns false only when the root itself cannot be fetched or is not found;
/// unreachable pages further down are skipped.
pub async fn enumerate_site<C>(
    crawler: &C,
    root: &Url,
    filters: &PathFilters,
    on_page: &mut (dyn FnMut(Document) + Send),
) -> bool
where
    C: Crawler + ?Sized,
{
    let mut site = normalize_page_url(root);

    let mut visited: HashSet<String> = HashSet::new();
    visited.insert(site.to_string());

    let mut queue = VecDeque::from([site.clone()]);
    let mut is_root = true;

    while let Some(page_url) = queue.pop_front() {
        let outcome = crawler.fetch_page(&page_url).await;
        let not_found = outcome.is_not_found();

        let Some(document) = outcome.document else {
            if is_root {
                tracing::warn!("Site root {} could not be fetched", page_url);
                return false;
            }
            tracing::debug!("Skipping unreachable page {}", page_url);
            continue;
        };

        if is_root && not_found {
            tracing::warn!("Site root {} was not found", page_url);
            return false;
        }

        let final_url = normalize_page_url(document.url());
        if is_root {
            // A redirected root defines the site
            site = final_url.clone();
        } else if !is_same_site(&site, &final_url) || !filters.permits(&final_url) {
            tracing::debug!("{} redirected outside the crawl to {}", page_url, final_url);
            continue;
        } else if final_url != page_url && visited.contains(final_url.as_str()) {
            tracing::trace!("{} redirected to already visited {}", page_url, final_url);
            continue;
        }
        visited.insert(final_url.to_string());
        is_root = false;

        for link in document.links() {
            if link.is_ignored() {
                continue;
            }

            let Ok(absolute) = link.make_absolute(document.url()) else {
                continue;
            };
            if !is_http_scheme(absolute.scheme()) {
                continue;
            }

            let absolute = normalize_page_url(&absolute);
            if !is_same_site(&site, &absolute) || !filters.permits(&absolute) {
                continue;
            }

            if visited.insert(absolute.to_string()) {
                tracing::trace!("Queued {}", absolute);
                queue.push_back(absolute);
            }
        }

        on_page(document);
    }

    true
}
