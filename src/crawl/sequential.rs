// src/crawl/sequential.rs
// =============================================================================
// Depth-first crawl on a single call stack.
//
// Links are followed one at a time, in the order they appear on the page.
// Nothing is shared with other tasks, so the visited set and the dead link
// map are a plain HashSet / HashMap owned by the walker.
// =============================================================================

use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::HashSet;
use tracing::warn;

use super::tracker::{DeadLink, DeadLinks};
use super::visit::{visit, Visit};
use crate::checker::{DeadReason, PageFetcher};

pub struct SequentialCrawl<'a> {
    fetcher: &'a dyn PageFetcher,
    base: &'a str,
    visited: HashSet<String>,
    dead: DeadLinks,
}

impl<'a> SequentialCrawl<'a> {
    pub fn new(fetcher: &'a dyn PageFetcher, base: &'a str) -> Self {
        Self {
            fetcher,
            base,
            visited: HashSet::new(),
            dead: DeadLinks::new(),
        }
    }

    /// Crawls everything reachable from `start`. Returns the dead links and
    /// the number of URLs that were claimed.
    pub async fn run(mut self, start: &str) -> (DeadLinks, usize) {
        if let Some((url, reason)) = self.walk(start.to_string()).await {
            warn!("Start page {} is dead: {}", url, reason);
        }
        (self.dead, self.visited.len())
    }

    // Returns the failed URL if this candidate turned out dead. The caller
    // (the referring page) is the one that records it.
    //
    // Recursive async fns need a boxed future, otherwise the future type
    // would contain itself
    fn walk(&mut self, candidate: String) -> BoxFuture<'_, Option<(String, DeadReason)>> {
        async move {
            match visit(&mut self.visited, self.fetcher, None, self.base, &candidate).await {
                Visit::Page { url, links } => {
                    for link in links {
                        if let Some((dead_url, reason)) = self.walk(link).await {
                            warn!("Dead link {} on {} ({})", dead_url, url, reason);
                            self.dead.insert(
                                dead_url,
                                DeadLink {
                                    page: url.clone(),
                                    reason,
                                },
                            );
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
}
