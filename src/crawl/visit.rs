// src/crawl/visit.rs
// =============================================================================
// One crawl task, up to the point where it would recurse.
//
// Both traversal modes run exactly this code for every candidate href. They
// only differ in how they schedule the children and where they keep state.
//
//   resolve -> claim -> scope -> fetch -> (claim target -> fetch)* -> Page / Dead
// =============================================================================

use tokio::sync::Semaphore;
use tracing::debug;

use super::resolve::{in_scope, resolve};
use super::tracker::ClaimUrl;
use crate::checker::{DeadReason, FetchOutcome, PageFetcher};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visit {
    /// Someone already claimed this URL (or its redirect target)
    Duplicate,
    /// Outside the base domain: not fetched, not dead
    OutOfScope,
    /// The fetch failed; the caller's parent owns the registry write
    Dead { url: String, reason: DeadReason },
    /// A live page whose links should be crawled next
    Page { url: String, links: Vec<String> },
}

/// Redirect hops followed before a URL is given up on, as with reqwest's
/// default policy
pub const MAX_REDIRECTS: usize = 10;

/// Runs resolve/claim/scope/fetch for a single candidate href.
///
/// `limiter`, when present, caps the number of fetches in flight. The permit
/// is released as soon as each fetch returns.
pub async fn visit<C: ClaimUrl>(
    visited: &mut C,
    fetcher: &dyn PageFetcher,
    limiter: Option<&Semaphore>,
    base: &str,
    candidate: &str,
) -> Visit {
    let url = resolve(base, candidate);
    debug!("Scraping {}", url);

    if !visited.claim(&url) {
        debug!("Already visited {}", url);
        return Visit::Duplicate;
    }

    // Scope only depends on the resolved URL, so out-of-site links are
    // dropped before any network traffic
    if !in_scope(base, &url) {
        debug!("{} is outside {}, not exploring", url, base);
        return Visit::OutOfScope;
    }

    // Every hop is claimed before it is requested, so a page reachable both
    // directly and through an alias is fetched once
    let mut current = url.clone();
    for _ in 0..=MAX_REDIRECTS {
        match fetch(fetcher, limiter, &current).await {
            FetchOutcome::Ok { links } => return Visit::Page { url, links },
            FetchOutcome::Dead(reason) => return Visit::Dead { url, reason },
            FetchOutcome::Redirect(target) => {
                debug!("{} redirected to {}", current, target);
                if !visited.claim(&target) {
                    debug!("Redirect target {} already visited", target);
                    return Visit::Duplicate;
                }
                current = target;
            }
        }
    }

    Visit::Dead {
        url,
        reason: DeadReason::Transport("too many redirects".to_string()),
    }
}

async fn fetch(fetcher: &dyn PageFetcher, limiter: Option<&Semaphore>, url: &str) -> FetchOutcome {
    let _permit = match limiter {
        Some(semaphore) => semaphore.acquire().await.ok(),
        None => None,
    };
    fetcher.fetch(url).await
}
