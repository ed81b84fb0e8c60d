// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// There are no subcommands: the tool does one thing. The only required
// argument is the base domain; everything else is a flag.
//
//   dead-links-scraper [--parallel|-p] [--start|-s <path>] <base-domain>
// =============================================================================

use clap::{ArgAction, Parser};
use std::num::NonZeroUsize;

use crate::checker::DEFAULT_USER_AGENT;

#[derive(Parser, Debug)]
#[command(
    name = "dead-links-scraper",
    version,
    about = "Scrape dead links on a website",
    long_about = "dead-links-scraper crawls every page reachable inside a base domain and \
                  reports links that are unreachable or answer with a non-success status, \
                  together with the page that links to them."
)]
pub struct Cli {
    /// Base domain to crawl (e.g., https://example.com)
    ///
    /// Only URLs starting with this string are explored
    pub domain: String,

    /// Run the scraper concurrently (one task per discovered link)
    #[arg(short, long)]
    pub parallel: bool,

    /// Relative path from the base domain to start searching from. Ex: /believe
    #[arg(short, long, default_value = "")]
    pub start: String,

    /// Maximum number of HTTP requests in flight (parallel mode only)
    ///
    /// Without this flag there is no limit
    #[arg(long, requires = "parallel")]
    pub max_concurrency: Option<NonZeroUsize>,

    /// User-Agent header sent with every request
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Output results in JSON format instead of a table
    #[arg(long)]
    pub json: bool,

    /// More log output on stderr (-v debug, -vv trace)
    ///
    /// RUST_LOG overrides this when set
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["dead-links-scraper", "https://example.test"]).unwrap();
        assert_eq!(cli.domain, "https://example.test");
        assert!(!cli.parallel);
        assert_eq!(cli.start, "");
        assert_eq!(cli.max_concurrency, None);
        assert_eq!(cli.user_agent, DEFAULT_USER_AGENT);
        assert!(!cli.json);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from(["dead-links-scraper", "-p", "-s", "/believe", "-vv", "https://example.test"])
            .unwrap();
        assert!(cli.parallel);
        assert_eq!(cli.start, "/believe");
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_missing_domain_is_an_error() {
        let err = Cli::try_parse_from(["dead-links-scraper", "--parallel"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_max_concurrency_needs_parallel() {
        let err = Cli::try_parse_from(["dead-links-scraper", "--max-concurrency", "4", "https://example.test"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let cli = Cli::try_parse_from([
            "dead-links-scraper",
            "--parallel",
            "--max-concurrency",
            "4",
            "https://example.test",
        ])
        .unwrap();
        assert_eq!(cli.max_concurrency, NonZeroUsize::new(4));
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        let result = Cli::try_parse_from([
            "dead-links-scraper",
            "-p",
            "--max-concurrency",
            "0",
            "https://example.test",
        ]);
        assert!(result.is_err());
    }
}
