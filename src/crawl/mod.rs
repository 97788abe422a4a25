// src/crawl/mod.rs
// =============================================================================
// This module handles crawling.
//
// Features:
// - Concurrent crawling: every discovered link is visited in its own task
// - Depth limit: each hop from the root costs one level of depth
// - Every page fetched at most once, via the shared FetchCache
// - Waits for every spawned task before reporting the crawl as finished
// - Optional cap on concurrent fetches
//
// Submodules:
// - driver: the Crawler and its task fan-out
// - report: what a crawl produces (CrawlReport, CrawlSummary)
// =============================================================================

mod driver;
mod report;

pub use driver::Crawler;
pub use report::{CrawlReport, CrawlSummary};
