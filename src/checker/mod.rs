// src/checker/mod.rs
// =============================================================================
// This module contains the per-URL work: one HTTP GET and the extraction of
// anchor hrefs from the body.
//
// Submodules:
// - http: the PageFetcher trait, its reqwest implementation, outcome types
// - html: pulls href values out of an HTML body
//
// Nothing in here knows about visited URLs or the crawl scope.
// =============================================================================

mod html;
mod http;

pub use http::{DeadReason, FetchOutcome, HttpFetcher, PageFetcher, DEFAULT_USER_AGENT};
