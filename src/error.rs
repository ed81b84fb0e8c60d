// src/error.rs
// =============================================================================
// Fatal setup errors.
//
// Anything in here aborts the run before (or instead of) crawling. Dead links
// are NOT errors: they are ordinary crawl results and live in the registry.
// =============================================================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SetupError {
    /// The base domain could not be parsed as an absolute URL
    #[error("invalid base domain '{domain}': {source}")]
    InvalidBaseDomain {
        domain: String,
        #[source]
        source: url::ParseError,
    },

    /// Joining a relative path onto the base domain failed
    #[error("cannot join '{path}' onto '{base}': {source}")]
    PathJoin {
        base: String,
        path: String,
        #[source]
        source: url::ParseError,
    },

    /// The HTTP client could not be built (TLS backend, bad user agent, ...)
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, SetupError>;
