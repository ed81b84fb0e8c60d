// src/crawl/tracker.rs
// =============================================================================
// The two pieces of state shared by every crawl task:
//
// - VisitedTracker: which URLs have already been claimed for fetching
// - DeadLinkRegistry: dead link -> the page that referenced it
//
// Both lock internally. Callers only ever see the atomic operations
// (claim / record), never a lock guard.
// =============================================================================

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::checker::DeadReason;

// One registry entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeadLink {
    /// The page the dead link was found on
    pub page: String,
    /// Why fetching the link failed
    pub reason: DeadReason,
}

/// Final crawl findings, keyed by the dead URL.
pub type DeadLinks = HashMap<String, DeadLink>;

/// Test-and-set over URLs.
///
/// Implemented by the concurrent `VisitedTracker` and by a plain `HashSet`
/// for the single-threaded walk.
pub trait ClaimUrl {
    /// Marks `url` as visited. Returns `true` for exactly one caller per URL;
    /// every later call returns `false`.
    fn claim(&mut self, url: &str) -> bool;
}

impl ClaimUrl for HashSet<String> {
    fn claim(&mut self, url: &str) -> bool {
        if self.contains(url) {
            return false;
        }
        self.insert(url.to_string())
    }
}

// Concurrency-safe visited set. URLs are never removed.
#[derive(Debug, Default)]
pub struct VisitedTracker {
    urls: Mutex<HashSet<String>>,
}

impl VisitedTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&self, url: &str) -> bool {
        // check + insert under one lock, so racing callers get one winner
        let mut urls = lock(&self.urls);
        if urls.contains(url) {
            return false;
        }
        urls.insert(url.to_string())
    }

    pub fn len(&self) -> usize {
        lock(&self.urls).len()
    }
}

impl ClaimUrl for &VisitedTracker {
    fn claim(&mut self, url: &str) -> bool {
        VisitedTracker::claim(self, url)
    }
}

// Concurrency-safe dead link map. Writes to the same key: last one wins.
#[derive(Debug, Default)]
pub struct DeadLinkRegistry {
    links: Mutex<DeadLinks>,
}

impl DeadLinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upserts `link -> (page, reason)`.
    pub fn record(&self, link: String, page: String, reason: DeadReason) {
        lock(&self.links).insert(link, DeadLink { page, reason });
    }

    /// Copy of the current contents. Once the crawl has finished this is
    /// the final result.
    pub fn snapshot(&self) -> DeadLinks {
        lock(&self.links).clone()
    }
}

// A task that panicked while holding the lock cannot leave a half-written
// HashSet/HashMap entry behind, so a poisoned lock is still usable
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
