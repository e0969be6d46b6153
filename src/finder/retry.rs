use crate::crawler::Crawler;
use crate::finder::classifier::is_broken;
use crate::finder::registry::{BrokenLinkMap, LinkRegistry};
use std::collections::HashSet;
use std::time::Duration;

/// Re-checks every retryable broken link once, after a cool-down
///
/// Links are fetched one at a time. A link that now passes is moved to the
/// intact set, and the broken link map is rebuilt without it. Returns the
/// number of links that recovered.
pub async fn retry_broken_links<C>(registry: &LinkRegistry, crawler: &C, cooldown: Duration) -> usize
where
    C: Crawler + ?Sized,
{
    let candidates = registry.retry_candidates();
    if candidates.is_empty() {
        return 0;
    }

    tracing::info!(
        "Re-checking {} broken link(s) after {:?}",
        candidates.len(),
        cooldown
    );
    tokio::time::sleep(cooldown).await;

    let mut recovered = HashSet::new();
    for (link, absolute) in candidates {
        let outcome = crawler.fetch_page(&absolute).await;

        if is_broken(&outcome) {
            tracing::debug!("Still broken: {}", link);
        } else {
            tracing::debug!("Recovered on retry: {}", link);
            registry.remove_broken(&link);
            recovered.insert(link);
        }
    }

    if !recovered.is_empty() {
        let still_broken: BrokenLinkMap = registry
            .broken_link_map()
            .into_iter()
            .filter(|(link, _)| !recovered.contains(link))
            .collect();
        registry.replace_broken_link_map(still_broken);
    }

    recovered.len()
}
