// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Follows every anchor reachable from the start page
// - Each URL is fetched at most once, however many pages link to it
// - Stops at the edge of the base domain (string prefix match)
// - Two schedulers with the same result: depth-first on one call stack, or
//   one task per link with a structured join
//
// Submodules:
// - tracker: visited set + dead link registry (concurrency safe)
// - resolve: href -> URL, and the scope test
// - visit: the per-URL steps both schedulers share
// - sequential / parallel: the two schedulers
// =============================================================================

mod parallel;
mod resolve;
mod sequential;
mod tracker;
mod visit;

#[cfg(test)]
mod testing;

pub use tracker::DeadLinks;
#[cfg(test)]
pub use tracker::DeadLink;

use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::checker::PageFetcher;
use crate::error::Result;
use parallel::ParallelCrawl;
use sequential::SequentialCrawl;

// How crawl tasks are scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Depth-first, one fetch at a time
    Sequential,
    /// One task per link. `max_concurrency` caps in-flight fetches; None
    /// means unbounded.
    Parallel { max_concurrency: Option<NonZeroUsize> },
}

#[derive(Debug, Clone)]
pub struct CrawlOptions {
    /// Root URL; also the scope boundary
    pub base_domain: String,
    /// Path relative to the base domain to start from ("" = the root)
    pub start: String,
    pub mode: Mode,
}

#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub dead: DeadLinks,
    /// Number of distinct URLs claimed during the crawl
    pub visited: usize,
}

// Crawls the site described by `options` to exhaustion
//
// Returns Err only for setup problems (bad base domain, bad start path).
// Dead links, including a dead start page, are part of a successful report.
pub async fn crawl(fetcher: Arc<dyn PageFetcher>, options: &CrawlOptions) -> Result<CrawlReport> {
    let canonical = resolve::canonical_base(&options.base_domain)?;
    let base = canonical.as_str();
    let start = resolve::join_path(base, &options.start)?;

    info!("Base domain: {}", base);
    if !options.start.is_empty() {
        info!("Starting search from: {}", options.start);
    }
    if !resolve::in_scope(base, &start) {
        warn!("Start URL {} does not begin with {}; nothing will be explored", start, base);
    }

    let (dead, visited) = match options.mode {
        Mode::Sequential => SequentialCrawl::new(fetcher.as_ref(), base).run(&start).await,
        Mode::Parallel { max_concurrency } => ParallelCrawl::new(fetcher, base, max_concurrency).run(&start).await,
    };

    Ok(CrawlReport { dead, visited })
}
