// src/checker/html.rs
// =============================================================================
// This module pulls anchor hrefs out of an HTML page.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM using html5ever (the same parser Servo uses)
// - Never fails: broken markup is repaired the way a browser would repair it
// - Supports CSS selectors for finding elements
//
// Unlike a link checker that only cares about http(s) targets, the crawler
// needs the href values exactly as written. Resolution against the base
// domain happens later, in crawl::resolve.
// =============================================================================

use scraper::{Html, Selector};
use std::sync::OnceLock;

// The selector is a constant, so we parse it once and share it between
// every crawl task
fn anchor_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    // "a[href]" is a constant, known-valid selector
    SELECTOR.get_or_init(|| Selector::parse("a[href]").expect("valid anchor selector"))
}

// Extracts the href value of every <a> element, in document order
//
// Parameters:
//   html: the response body (borrowed as &str)
//
// Returns: Vec<String> with the raw href values, duplicates included
//
// Example:
//   html   = "<a href='/docs'>Docs</a><a href='https://x.test'>X</a>"
//   result = ["/docs", "https://x.test"]
pub fn extract_anchor_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    document
        .select(anchor_selector())
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why not resolve the links here?
//    - The crawler only treats hrefs beginning with '/' as relative, and joins
//      them against the *base domain*, not against the current page
//    - Keeping extraction dumb means the fetcher has no idea what the crawl
//      scope is
//
// 2. What happens with malformed HTML?
//    - html5ever recovers from unclosed tags, stray end tags, bad attributes
//    - An anchor it cannot make sense of simply does not show up
//    - Nothing here returns an error; a page with garbage yields fewer links
//
// 3. What is OnceLock?
//    - A cell that is written once and then read many times
//    - Safe to share between threads, so parallel tasks reuse one Selector
// -----------------------------------------------------------------------------
