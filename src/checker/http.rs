// src/checker/http.rs
// =============================================================================
// This module fetches one page over HTTP and classifies what came back.
//
// Key functionality:
// - Makes a single GET request per URL (we need the body, so no HEAD)
// - Classifies the outcome: alive (with links), dead (with a reason), or
//   redirected (with the absolute target)
// - Never follows redirects itself. The crawler claims the target in its
//   visited set first, so a page reachable through an alias is requested
//   only once
//
// The crawler never talks to reqwest directly. It talks to the PageFetcher
// trait, which lets the tests swap in an in-memory website.
// =============================================================================

use futures::future::BoxFuture;
use futures::FutureExt; // gives us .boxed() on futures
use reqwest::header::LOCATION;
use reqwest::{redirect, Client};
use serde::Serialize;
use std::fmt;
use tracing::debug;

use super::html::extract_anchor_hrefs;
use crate::error::Result;

/// Default User-Agent header sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!("dead-links-scraper/", env!("CARGO_PKG_VERSION"));

// Why a URL is considered dead
//
// Only two reasons exist: the request never produced a response, or the
// response was not a success. 3xx/4xx/5xx all collapse into Status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum DeadReason {
    /// No response at all (DNS, refused connection, TLS, timeout, ...)
    Transport(String),
    /// A response arrived, but with a non-success status code
    Status(u16),
}

impl fmt::Display for DeadReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeadReason::Transport(message) => write!(f, "transport failure: {}", message),
            DeadReason::Status(code) => write!(f, "HTTP {}", code),
        }
    }
}

// The result of fetching one URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page is alive
    Ok {
        /// Raw href values of every anchor on the page
        links: Vec<String>,
    },
    /// A 3xx with a Location header; holds the absolute target URL
    Redirect(String),
    /// The page is dead
    Dead(DeadReason),
}

/// Something that can GET a page.
///
/// Implementations must be pure with respect to crawl state: they never look
/// at which URLs were visited or what the crawl scope is.
pub trait PageFetcher: Send + Sync {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, FetchOutcome>;
}

// The real fetcher, backed by a reqwest client
//
// Cloning is cheap: reqwest::Client is a reference-counted handle, so all
// clones share one connection pool
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    // Builds a fetcher with the given User-Agent
    //
    // No timeout is configured: a request waits as long as the server and
    // reqwest's defaults allow. Redirects are handed back to the caller.
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .redirect(redirect::Policy::none())
            .build()?;
        Ok(Self { client })
    }

    async fn get(&self, url: &str) -> FetchOutcome {
        debug!("Fetching {}", url);

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return FetchOutcome::Dead(categorize_error(&e)),
        };

        let status = response.status();
        if status.is_redirection() {
            if let Some(target) = redirect_target(&response) {
                debug!("{} redirects to {}", url, target);
                return FetchOutcome::Redirect(target);
            }
        }
        if !status.is_success() {
            debug!("{} answered with HTTP {}", url, status.as_u16());
            return FetchOutcome::Dead(DeadReason::Status(status.as_u16()));
        }

        // A body that breaks off half way still counts as a live page;
        // we just have no links to follow
        let links = match response.text().await {
            Ok(body) => extract_anchor_hrefs(&body),
            Err(e) => {
                debug!("Could not read body of {}: {}", url, e);
                Vec::new()
            }
        };

        FetchOutcome::Ok { links }
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> BoxFuture<'a, FetchOutcome> {
        self.get(url).boxed()
    }
}

// Reads the Location header of a 3xx, resolved against the URL that sent it
//
// Returns None when the header is missing or unusable; the 3xx then counts
// as an ordinary non-success status.
fn redirect_target(response: &reqwest::Response) -> Option<String> {
    let location = response.headers().get(LOCATION)?.to_str().ok()?;
    response.url().join(location).ok().map(String::from)
}

// Turns a reqwest error into a short human readable reason
//
// reqwest errors can happen for many reasons:
// - Timeout (only if the caller configured one)
// - DNS resolution failure
// - Connection refused / reset
// - TLS problems
fn categorize_error(error: &reqwest::Error) -> DeadReason {
    let error_string = error.to_string();

    let message = if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        let detail = format!("{:?}", error).to_lowercase();
        if detail.contains("dns") {
            "could not resolve hostname".to_string()
        } else {
            "connection failed".to_string()
        }
    } else if error_string.contains("certificate") || error_string.contains("ssl") {
        "TLS certificate error".to_string()
    } else {
        error_string
    };

    DeadReason::Transport(message)
}
