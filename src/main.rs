// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing) on stderr
// 3. Pick a fetcher for the subcommand (HTTP or a fixed dataset)
// 4. Wrap it in the cache, crawl, and print each report as it arrives
// 5. Exit with proper code (0 = all pages fetched, 1 = some fetches failed,
//    2 = error)
//
// Output:
// - stdout: one "found: <url> "<content>"" line per fetched page, then a summary
// - stderr: one line per failed fetch, plus any log messages
// - --json: a single JSON document on stdout instead
//
// Rust concepts used:
// - async/await: Because we need to make many network requests concurrently
// - Generics: run_crawl works with any Fetcher
// - Result<T, E>: For error handling (T = success type, E = error type)
// =============================================================================

// The cache, crawler and fetchers come from our library (src/lib.rs);
// only command-line parsing lives in the binary
mod cli; // src/cli.rs - command-line parsing

use anyhow::{anyhow, Context, Result};
use clap::Parser; // Parser trait enables the parse() method
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use url::Url;

use cli::{Cli, CrawlArgs, Commands};
use link_crawler::{
    CacheStats, CrawlReport, CrawlSummary, Crawler, DatasetFetcher, FetchCache, Fetcher,
    HttpFetcher,
};

// Where `link-crawler demo` starts
const DEMO_ROOT: &str = "https://golang.org/";

// Page content is cut to this many characters in text output
const CONTENT_PREVIEW_CHARS: usize = 60;

// The #[tokio::main] attribute transforms our async main into a real main function
// It creates a multi-threaded tokio runtime and runs our async code inside it
#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain: "Could not load dataset x: ..."
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so they never mix with reports on stdout.
// RUST_LOG wins over --verbose when it's set.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "link_crawler=debug"
    } else {
        "link_crawler=warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// This is the main application logic
// Returns:
//   Ok(0) = every visited page was fetched
//   Ok(1) = at least one fetch failed
//   Err = bad arguments, unreadable dataset, etc. (exit code 2)
async fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Site {
            website_url,
            crawl,
            timeout_secs,
            follow_external,
        } => handle_site_crawl(&website_url, &crawl, timeout_secs, follow_external).await,
        Commands::Replay {
            dataset,
            root,
            crawl,
        } => {
            let fetcher = DatasetFetcher::from_json_file(&dataset)?;
            run_crawl(fetcher, &root, &crawl).await
        }
        Commands::Demo { crawl } => {
            run_crawl(DatasetFetcher::golang_tour(), DEMO_ROOT, &crawl).await
        }
    }
}

// Handles the 'site' subcommand
// Parameters:
//   website_url: Website URL to crawl (e.g., "https://example.com")
//   timeout_secs: per-request timeout
//   follow_external: whether links may leave the starting domain
async fn handle_site_crawl(
    website_url: &str,
    args: &CrawlArgs,
    timeout_secs: u64,
    follow_external: bool,
) -> Result<i32> {
    // Parse and validate the starting URL
    let root = Url::parse(website_url).with_context(|| format!("Invalid URL '{}'", website_url))?;

    let mut fetcher = HttpFetcher::new(&cli::http_config(timeout_secs))?;
    if !follow_external {
        let host = root
            .host_str()
            .ok_or_else(|| anyhow!("URL has no host: {}", website_url))?;
        fetcher = fetcher.restrict_to_domain(host);
    }

    run_crawl(fetcher, root.as_str(), args).await
}

// Crawls from `root` with any fetcher and prints the results
async fn run_crawl<F: Fetcher>(fetcher: F, root: &str, args: &CrawlArgs) -> Result<i32> {
    let cache = Arc::new(FetchCache::new(fetcher));
    let crawler = Crawler::new(Arc::clone(&cache), args.to_config());

    let reports = if args.json {
        crawler.crawl(root).await
    } else {
        println!("🔍 Crawling {} (max depth {})", root, args.max_depth);

        // Print each report the moment it arrives. Only this loop writes
        // reports, so lines from different tasks can't interleave.
        let mut receiver = crawler.crawl_stream(root);
        let mut reports = Vec::new();
        while let Some(report) = receiver.recv().await {
            print_report(&report);
            reports.push(report);
        }

        info!(reports = reports.len(), cached = cache.len(), "crawl finished");
        reports
    };

    let summary = CrawlSummary::from_reports(&reports);
    if args.json {
        print_json(&reports, summary, cache.stats())?;
    } else {
        print_summary(summary, cache.stats());
    }

    Ok(exit_code(&summary))
}

// 0 = clean crawl, 1 = at least one page couldn't be fetched
fn exit_code(summary: &CrawlSummary) -> i32 {
    if summary.failed > 0 {
        1
    } else {
        0
    }
}

// Found pages go to stdout, failures to stderr
fn print_report(report: &CrawlReport) {
    if report.is_found() {
        println!("{:.*}", CONTENT_PREVIEW_CHARS, report);
    } else {
        eprintln!("{}", report);
    }
}

fn print_summary(summary: CrawlSummary, stats: CacheStats) {
    println!();
    println!("📊 Summary:");
    println!("   ✅ Found: {}", summary.found);
    println!("   ❌ Failed: {}", summary.failed);
    println!("   🔗 Distinct URLs: {}", summary.distinct_urls);
    println!("   🌐 Fetches: {} (cache hits: {})", stats.misses, stats.hits);
}

// Everything --json prints, as one document
#[derive(Serialize)]
struct JsonOutput<'a> {
    summary: CrawlSummary,
    cache: CacheStats,
    reports: &'a [CrawlReport],
}

fn print_json(reports: &[CrawlReport], summary: CrawlSummary, cache: CacheStats) -> Result<()> {
    let output = JsonOutput {
        summary,
        cache,
        reports,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
