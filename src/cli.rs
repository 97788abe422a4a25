// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Subcommands:
// - site:   crawl a real website over HTTP
// - replay: crawl a fixed dataset loaded from a JSON file
// - demo:   crawl the built-in golang.org dataset
//
// Options shared by all three live in CrawlArgs and are pulled in with
// #[command(flatten)].
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use link_crawler::{CrawlConfig, HttpConfig};

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "link-crawler",
    version,
    about = "Crawl pages concurrently to a fixed depth, fetching each page only once",
    long_about = "link-crawler follows links from a starting page, visiting each discovered link \
                  in parallel until the maximum depth is reached. Every page is fetched at most \
                  once, even when many branches of the crawl reach it at the same time."
)]
pub struct Cli {
    /// Show debug logs on stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a website over HTTP
    ///
    /// Example: link-crawler site https://example.com --max-depth 2
    Site {
        /// Website URL to start from (e.g., https://example.com)
        website_url: String,

        #[command(flatten)]
        crawl: CrawlArgs,

        /// Per-request timeout in seconds
        #[arg(long, default_value_t = 10)]
        timeout_secs: u64,

        /// Also follow links that leave the starting site's domain
        #[arg(long)]
        follow_external: bool,
    },

    /// Crawl a fixed dataset of pages loaded from a JSON file
    ///
    /// The file maps each URL to {"content": "...", "links": ["..."]}.
    ///
    /// Example: link-crawler replay pages.json https://golang.org/
    Replay {
        /// Path to the dataset JSON file
        dataset: PathBuf,

        /// URL to start from (must be a key in the dataset to be found)
        root: String,

        #[command(flatten)]
        crawl: CrawlArgs,
    },

    /// Crawl the built-in golang.org dataset from https://golang.org/
    Demo {
        #[command(flatten)]
        crawl: CrawlArgs,
    },
}

// Options every crawl accepts
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct CrawlArgs {
    /// Maximum crawl depth (default: 4)
    ///
    /// Depth 1 = just the starting page
    /// Depth 2 = starting page + all pages it links to
    /// 0 or less = crawl nothing
    #[arg(long, default_value_t = 4, allow_negative_numbers = true)]
    pub max_depth: i32,

    /// Maximum number of pages fetched at the same time (default: unlimited)
    #[arg(long)]
    pub max_concurrency: Option<usize>,

    /// Output results in JSON format instead of lines of text
    #[arg(long)]
    pub json: bool,
}

impl CrawlArgs {
    pub fn to_config(&self) -> CrawlConfig {
        CrawlConfig::default()
            .with_max_depth(self.max_depth)
            .with_max_concurrency(self.max_concurrency)
    }
}

/// Builds the HTTP settings for the `site` subcommand
pub fn http_config(timeout_secs: u64) -> HttpConfig {
    HttpConfig::default().with_timeout(Duration::from_secs(timeout_secs))
}
