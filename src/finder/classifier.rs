//! Per-page link classification

use crate::crawler::{Crawler, Document, FetchOutcome};
use crate::finder::registry::{LinkRegistry, Resolution, Verdict};
use crate::url::Link;
use url::Url;

/// Returns true if a fetch result means the link is broken
///
/// A link is broken when nothing came back, when the server answered "not
/// found", or when the URL's fragment names no element in the document.
pub fn is_broken(outcome: &FetchOutcome) -> bool {
    match &outcome.document {
        None => true,
        Some(document) => outcome.is_not_found() || document.is_missing_fragment(),
    }
}

/// Classifies every link of one page and records the outcomes
///
/// Unparsable links are recorded broken without any fetch. Links with an
/// unsupported scheme are ignored. Every other link is fetched at most once
/// per crawl, whichever page task gets to it first.
pub async fn classify_page<C>(registry: &LinkRegistry, crawler: &C, page: &Document)
where
    C: Crawler + ?Sized,
{
    let page_url = page.url();
    tracing::debug!("Classifying {} link(s) on {}", page.links().len(), page_url);

    for raw in page.unparsable_links() {
        registry.append_broken(page_url, &Link::unparsable(raw.clone()), true);
    }

    for link in page.links() {
        if link.is_ignored() {
            registry.append_ignored(page_url, link);
            continue;
        }

        match registry.resolve(link) {
            Resolution::Intact => {}
            Resolution::Broken => registry.append_broken(page_url, link, false),
            Resolution::Unresolved(cell) => {
                let mut fetched_here = false;
                let fetched = &mut fetched_here;

                let verdict = *cell
                    .get_or_init(|| async move {
                        *fetched = true;
                        check_link(registry, crawler, page_url, link).await
                    })
                    .await;

                // The fetching task has already recorded its own occurrence
                if !fetched_here && verdict == Verdict::Broken {
                    registry.append_broken(page_url, link, false);
                }
            }
        }
    }
}

/// Fetches a link and records the verdict before other tasks can see it
async fn check_link<C>(registry: &LinkRegistry, crawler: &C, page_url: &Url, link: &Link) -> Verdict
where
    C: Crawler + ?Sized,
{
    let absolute = match link.make_absolute(page_url) {
        Ok(absolute) => absolute,
        Err(e) => {
            tracing::debug!("Cannot resolve {} on {}: {}", link, page_url, e);
            registry.append_broken(page_url, link, true);
            return Verdict::Broken;
        }
    };

    let outcome = crawler.fetch_page(&absolute).await;

    if is_broken(&outcome) {
        tracing::debug!(
            "Broken link {} on {} (status {:?})",
            link,
            page_url,
            outcome.status
        );
        registry.append_broken(page_url, link, true);
        Verdict::Broken
    } else {
        registry.append_intact(link);
        Verdict::Intact
    }
}
