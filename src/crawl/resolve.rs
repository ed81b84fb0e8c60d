// src/crawl/resolve.rs
// =============================================================================
// Turning hrefs into crawl URLs, and deciding what belongs to the site.
//
// The rules are deliberately literal:
// - only hrefs starting with '/' are treated as relative
// - relative hrefs are path-joined onto the base domain (not onto the page)
// - a URL is in scope iff it starts with the base domain string
//
// The base itself is written the way the url crate serializes it, so joined
// URLs and the prefix test agree on its spelling. Beyond that there is no
// case folding, no trailing slash games, no query sorting. Two URLs are the
// same page iff their strings are equal.
// =============================================================================

use tracing::debug;
use url::Url;

use crate::error::{Result, SetupError};

// Spells the base domain the way join_path spells the URLs it builds
//
// The url crate lowercases the host, drops a default port and punycodes IDN
// hosts. Whether the base ends in '/' is left as the caller wrote it.
//
// Examples:
//   "https://Example.test"      -> "https://example.test"
//   "https://example.test:443/" -> "https://example.test/"
//   "https://example.test/Docs" -> "https://example.test/Docs"
pub fn canonical_base(base: &str) -> Result<String> {
    let parsed = Url::parse(base).map_err(|source| SetupError::InvalidBaseDomain {
        domain: base.to_string(),
        source,
    })?;

    let mut canonical = String::from(parsed);
    if !base.ends_with('/') && canonical.ends_with('/') {
        canonical.pop();
    }
    Ok(canonical)
}

// Appends `path` to the path of `base`
//
// Examples:
//   ("https://example.test", "/a")       -> "https://example.test/a"
//   ("https://example.test/docs/", "a")  -> "https://example.test/docs/a"
//   ("https://example.test", "")         -> "https://example.test/"
//   ("https://example.test", "/a/../b")  -> "https://example.test/b"
pub fn join_path(base: &str, path: &str) -> Result<String> {
    let joined = if path.is_empty() {
        base.to_string()
    } else {
        format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
    };

    Url::parse(&joined).map(String::from).map_err(|source| SetupError::PathJoin {
        base: base.to_string(),
        path: path.to_string(),
        source,
    })
}

/// Resolves a candidate href into the URL string used as the crawl identity.
pub fn resolve(base: &str, candidate: &str) -> String {
    if !candidate.starts_with('/') {
        return candidate.to_string();
    }

    match join_path(base, candidate) {
        Ok(url) => url,
        Err(e) => {
            // The fetch of the raw candidate will fail and mark it dead
            debug!("{}", e);
            candidate.to_string()
        }
    }
}

pub fn in_scope(base: &str, url: &str) -> bool {
    url.starts_with(base)
}
