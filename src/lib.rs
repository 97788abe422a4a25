// src/lib.rs
// =============================================================================
// The library half of link-crawler: everything except the command line.
//
// - fetch: the Fetcher trait plus HTTP and fixed-dataset fetchers
// - cache: FetchCache, which fetches each URL at most once
// - crawl: Crawler, the concurrent depth-bounded crawl
// - config: settings for crawls and HTTP
//
// Typical use:
//
//   let cache = Arc::new(FetchCache::new(DatasetFetcher::golang_tour()));
//   let crawler = Crawler::new(cache, CrawlConfig::default());
//   let reports = crawler.crawl("https://golang.org/").await;
// =============================================================================

pub mod cache;
pub mod config;
pub mod crawl;
pub mod fetch;

pub use cache::{CacheStats, FetchCache};
pub use config::{CrawlConfig, HttpConfig};
pub use crawl::{CrawlReport, CrawlSummary, Crawler};
pub use fetch::{DatasetFetcher, FetchError, FetchResult, Fetcher, HttpFetcher, Page};
