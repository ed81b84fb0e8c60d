// src/crawl/parallel.rs
// =============================================================================
// Fan-out crawl: one tokio task per discovered link.
//
// Every page spawns a task for each of its links into a JoinSet and waits
// for all of them before it finishes itself. The crawl is over when the
// root task returns, at which point no task is left running.
//
// The visited set and the registry are shared through an Arc and lock
// internally. An optional semaphore bounds concurrent fetches; it is only
// held around the fetch, never while a task waits on its children.
// =============================================================================

use futures::future::BoxFuture;
use futures::FutureExt;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, warn};

use super::tracker::{DeadLinkRegistry, DeadLinks, VisitedTracker};
use super::visit::{visit, Visit};
use crate::checker::{DeadReason, PageFetcher};

struct Shared {
    fetcher: Arc<dyn PageFetcher>,
    base: String,
    visited: VisitedTracker,
    dead: DeadLinkRegistry,
    limiter: Option<Semaphore>,
}

pub struct ParallelCrawl {
    shared: Arc<Shared>,
}

impl ParallelCrawl {
    pub fn new(fetcher: Arc<dyn PageFetcher>, base: &str, max_concurrency: Option<NonZeroUsize>) -> Self {
        let shared = Shared {
            fetcher,
            base: base.to_string(),
            visited: VisitedTracker::new(),
            dead: DeadLinkRegistry::new(),
            limiter: max_concurrency.map(|n| Semaphore::new(n.get())),
        };
        Self {
            shared: Arc::new(shared),
        }
    }

    /// Crawls everything reachable from `start`. Returns the dead links and
    /// the number of URLs that were claimed.
    pub async fn run(self, start: &str) -> (DeadLinks, usize) {
        let root = tokio::spawn(crawl_task(Arc::clone(&self.shared), start.to_string()));

        match root.await {
            Ok(Some((url, reason))) => warn!("Start page {} is dead: {}", url, reason),
            Ok(None) => {}
            Err(e) => error!("Crawl of {} aborted: {}", start, e),
        }

        (self.shared.dead.snapshot(), self.shared.visited.len())
    }
}

// One crawl task. Returns the failed URL if this candidate is dead, so the
// parent can record it against its own URL.
fn crawl_task(shared: Arc<Shared>, candidate: String) -> BoxFuture<'static, Option<(String, DeadReason)>> {
    async move {
        let mut visited = &shared.visited;
        let result = visit(
            &mut visited,
            shared.fetcher.as_ref(),
            shared.limiter.as_ref(),
            &shared.base,
            &candidate,
        )
        .await;

        match result {
            Visit::Page { url, links } => {
                let mut children = JoinSet::new();
                for link in links {
                    children.spawn(crawl_task(Arc::clone(&shared), link));
                }

                while let Some(joined) = children.join_next().await {
                    match joined {
                        Ok(Some((dead_url, reason))) => {
                            warn!("Dead link {} on {} ({})", dead_url, url, reason);
                            shared.dead.record(dead_url, url.clone(), reason);
                        }
                        Ok(None) => {}
                        // A panicking child only loses its own subtree
                        Err(e) => error!("Crawl task under {} failed: {}", url, e),
                    }
                }
                None
            }
            Visit::Dead { url, reason } => Some((url, reason)),
            Visit::Duplicate | Visit::OutOfScope => None,
        }
    }
    .boxed()
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why does crawl_task return a BoxFuture instead of being an async fn?
//    - An async fn that calls itself would have a future type that contains
//      itself, which has infinite size
//    - Boxing the future gives it a fixed size (a pointer)
//    - tokio::spawn also needs the future to be Send + 'static, which
//      BoxFuture<'static, _> spells out
//
// 2. What is a JoinSet?
//    - A collection of spawned tasks that can be awaited as they finish
//    - join_next() returns None once every task in the set is done
//    - Here it is the "wait for all my children" step: a page's task only
//      returns after its whole subtree has returned
//
// 3. Why is the semaphore not held while joining?
//    - A parent waiting on its children while holding a permit could use up
//      every permit with parents, and no child could ever fetch
//    - visit() drops the permit right after the fetch
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::testing::StubSite;

    const BASE: &str = "https://example.test";

    fn crawl(site: &Arc<StubSite>, limit: Option<usize>) -> ParallelCrawl {
        let fetcher: Arc<dyn PageFetcher> = site.clone();
        ParallelCrawl::new(fetcher, BASE, limit.and_then(NonZeroUsize::new))
    }

    #[tokio::test]
    async fn test_many_referrers_one_fetch() {
        let mut site = StubSite::new().page("https://example.test/shared", &["/", "/shared"]);
        let mut root_links = Vec::new();
        for i in 0..10 {
            root_links.push(format!("/p{}", i));
        }
        let root_refs: Vec<&str> = root_links.iter().map(String::as_str).collect();
        site = site.page("https://example.test/", &root_refs);
        for i in 0..10 {
            let next = format!("/p{}", (i + 1) % 10);
            site = site.page(&format!("https://example.test/p{}", i), &["/shared", "/", next.as_str()]);
        }
        let site = Arc::new(site);

        let (dead, visited) = crawl(&site, None).run("https://example.test/").await;

        assert!(dead.is_empty());
        assert_eq!(visited, 12);
        assert_eq!(site.served("https://example.test/"), 1);
        assert_eq!(site.served("https://example.test/shared"), 1);
        for i in 0..10 {
            assert_eq!(site.served(&format!("https://example.test/p{}", i)), 1);
        }
    }

    #[tokio::test]
    async fn test_fan_out_is_concurrent() {
        let mut site = StubSite::new().page("https://example.test/", &["/1", "/2", "/3", "/4"]);
        for i in 1..=4 {
            let url = format!("https://example.test/{}", i);
            site = site.page(&url, &[]).delay(&url, 20);
        }
        let site = Arc::new(site);

        crawl(&site, None).run("https://example.test/").await;

        assert!(site.max_in_flight() > 1);
    }

    #[tokio::test]
    async fn test_max_concurrency_bounds_fetches() {
        let mut site = StubSite::new();
        let mut links = Vec::new();
        for i in 0..8 {
            links.push(format!("/{}", i));
        }
        let refs: Vec<&str> = links.iter().map(String::as_str).collect();
        site = site.page("https://example.test/", &refs);
        for i in 0..8 {
            // Each child also has children, so parents are waiting on joins
            // while their subtree still needs permits
            let url = format!("https://example.test/{}", i);
            let child = format!("/{}/leaf", i);
            site = site.page(&url, &[child.as_str()]).delay(&url, 10);
            site = site.page(&format!("https://example.test/{}/leaf", i), &[]);
        }
        let site = Arc::new(site);

        let (dead, visited) = crawl(&site, Some(2)).run("https://example.test/").await;

        assert!(dead.is_empty());
        assert_eq!(visited, 17);
        assert!(site.max_in_flight() <= 2);
    }

    #[tokio::test]
    async fn test_first_claim_decides_the_referrer() {
        // /fast reaches /dead long before /slow has even been fetched, so
        // /fast's task claims it and /slow's copy is a duplicate
        let site = Arc::new(
            StubSite::new()
                .page("https://example.test/", &["/slow", "/fast"])
                .page("https://example.test/slow", &["/dead"])
                .delay("https://example.test/slow", 100)
                .page("https://example.test/fast", &["/dead"])
                .status("https://example.test/dead", 410),
        );

        let (dead, _) = crawl(&site, None).run("https://example.test/").await;

        assert_eq!(dead.len(), 1);
        assert_eq!(dead["https://example.test/dead"].page, "https://example.test/fast");
        assert_eq!(site.served("https://example.test/dead"), 1);
    }
}
