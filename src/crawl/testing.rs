// src/crawl/testing.rs
// =============================================================================
// An in-memory website for crawl tests.
//
// StubSite implements PageFetcher without any network. It counts how often
// each URL is served and how many fetches are in flight at once, so tests
// can check exactly-once fetching and concurrency limits.
// =============================================================================

use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::checker::{DeadReason, FetchOutcome, PageFetcher};

#[derive(Debug, Clone)]
enum StubPage {
    Html(Vec<String>),
    Redirect(String),
    Status(u16),
}

#[derive(Debug, Default)]
pub struct StubSite {
    pages: HashMap<String, StubPage>,
    delays: HashMap<String, Duration>,
    served: Mutex<HashMap<String, usize>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl StubSite {
    pub fn new() -> Self {
        Self::default()
    }

    /// A 200 page carrying the given hrefs.
    pub fn page(mut self, url: &str, links: &[&str]) -> Self {
        let links = links.iter().map(|l| l.to_string()).collect();
        self.pages.insert(url.to_string(), StubPage::Html(links));
        self
    }

    /// A redirect from `url` to `target`. Like the real fetcher, the stub
    /// does not follow it.
    pub fn redirect(mut self, url: &str, target: &str) -> Self {
        self.pages.insert(url.to_string(), StubPage::Redirect(target.to_string()));
        self
    }

    /// A URL answering with a non-success status.
    pub fn status(mut self, url: &str, code: u16) -> Self {
        self.pages.insert(url.to_string(), StubPage::Status(code));
        self
    }

    /// Makes every fetch of `url` take `millis` before answering.
    pub fn delay(mut self, url: &str, millis: u64) -> Self {
        self.delays.insert(url.to_string(), Duration::from_millis(millis));
        self
    }

    /// How many times `url` was requested.
    pub fn served(&self, url: &str) -> usize {
        self.served.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    pub fn total_served(&self) -> usize {
        self.served.lock().unwrap().values().sum()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn mark_served(&self, url: &str) {
        *self.served.lock().unwrap().entry(url.to_string()).or_insert(0) += 1;
    }

    fn answer(&self, url: &str) -> FetchOutcome {
        self.mark_served(url);
        match self.pages.get(url) {
            Some(StubPage::Html(links)) => FetchOutcome::Ok { links: links.clone() },
            Some(StubPage::Redirect(target)) => FetchOutcome::Redirect(target.clone()),
            Some(StubPage::Status(code)) => FetchOutcome::Dead(DeadReason::Status(*code)),
            None => FetchOutcome::Dead(DeadReason::Transport("connection refused".into())),
        }
    }
}

impl PageFetcher for StubSite {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, FetchOutcome> {
        async move {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            if let Some(delay) = self.delays.get(url) {
                tokio::time::sleep(*delay).await;
            } else {
                // Give other tasks a chance to interleave
                tokio::task::yield_now().await;
            }

            let outcome = self.answer(url);
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            outcome
        }
        .boxed()
    }
}
