// src/config.rs
// =============================================================================
// Settings for a crawl and for the HTTP fetcher.
//
// Both structs have sensible defaults (Default trait) and small builder-style
// setters, so callers only spell out what they want to change:
//
//   let config = CrawlConfig::default().with_max_depth(2);
//
// main.rs fills them in from command-line arguments.
// =============================================================================

use std::time::Duration;

/// How far and how wide a crawl may go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlConfig {
    /// Remaining depth at the root. The root is fetched when this is >= 1;
    /// 0 or negative means the crawl does nothing.
    pub max_depth: i32,
    /// Upper bound on fetches running at the same time. None = unbounded.
    pub max_concurrency: Option<usize>,
    /// Buffer size of the report channel between crawl tasks and the consumer.
    pub channel_capacity: usize,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_depth: 4,
            max_concurrency: None,
            channel_capacity: 100,
        }
    }
}

impl CrawlConfig {
    pub fn with_max_depth(mut self, max_depth: i32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Limits concurrent fetches. `Some(0)` is treated as `Some(1)`, since a
    /// semaphore with no permits would never let the crawl start.
    pub fn with_max_concurrency(mut self, max_concurrency: Option<usize>) -> Self {
        self.max_concurrency = max_concurrency.map(|n| n.max(1));
        self
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        // tokio::sync::mpsc::channel panics on a capacity of 0
        self.channel_capacity = capacity.max(1);
        self
    }
}

/// Settings for HttpFetcher's reqwest client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    /// Per-request timeout
    pub timeout: Duration,
    /// Redirects followed before giving up with TooManyRedirects
    pub max_redirects: usize,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_redirects: 5,
            user_agent: concat!("link-crawler/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl HttpConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
