// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing, on stderr)
// 3. Crawl the site in the requested mode
// 4. Print the dead link report on stdout
// 5. Exit with proper code (0 = crawl completed, 2 = setup error)
//
// Dead links do not change the exit code: finding them is the normal
// outcome of a completed crawl.
// =============================================================================

mod checker;
mod cli;
mod crawl;
mod error;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use checker::HttpFetcher;
use cli::Cli;
use crawl::{CrawlOptions, Mode};

#[tokio::main]
async fn main() {
    // Usage errors (e.g. missing domain) make clap print help and exit with 2
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> Result<()> {
    let fetcher = HttpFetcher::new(&cli.user_agent)?;

    let mode = if cli.parallel {
        Mode::Parallel {
            max_concurrency: cli.max_concurrency,
        }
    } else {
        Mode::Sequential
    };

    let options = CrawlOptions {
        base_domain: cli.domain,
        start: cli.start,
        mode,
    };

    let crawl_report = crawl::crawl(Arc::new(fetcher), &options).await?;
    info!(
        "Crawl finished: {} URL(s) visited, {} dead link(s) found",
        crawl_report.visited,
        crawl_report.dead.len()
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if cli.json {
        report::write_json(&mut out, &crawl_report.dead).context("failed to write JSON report")?;
    } else {
        report::write_table(&mut out, &crawl_report.dead).context("failed to write report")?;
    }
    out.flush()?;

    Ok(())
}

// Logs go to stderr so the report on stdout can be piped. Our own crate logs
// at info by default; dependencies only at warn.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,dead_links_scraper={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
