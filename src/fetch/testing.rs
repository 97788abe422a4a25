// src/fetch/testing.rs
// Test helpers: small fixed graphs, and a fetcher wrapper that counts how
// often each URL is fetched. An optional delay keeps fetches "in flight" long
// enough for concurrent callers to pile up on the same URL.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use super::{DatasetFetcher, FetchResult, Fetcher, Page};

/// Builds a dataset from `(url, content, links)` triples.
pub fn graph(pages: &[(&str, &str, &[&str])]) -> DatasetFetcher {
    pages
        .iter()
        .map(|(url, content, links)| {
            let links = links.iter().map(|l| l.to_string()).collect();
            (url.to_string(), Page::new(*content, links))
        })
        .collect()
}

/// `{A: ("pageA", [B, C]), B: ("pageB", []), C: ("pageC", [A])}`
pub fn abc_graph() -> DatasetFetcher {
    graph(&[
        ("A", "pageA", &["B", "C"]),
        ("B", "pageB", &[]),
        ("C", "pageC", &["A"]),
    ])
}

pub struct CountingFetcher<F> {
    inner: F,
    delay: Option<Duration>,
    calls: Mutex<HashMap<String, usize>>,
}

impl<F: Fetcher> CountingFetcher<F> {
    pub fn new(inner: F) -> Self {
        Self {
            inner,
            delay: None,
            calls: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// How many times `url` reached the inner fetcher
    pub fn calls(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    /// Total fetches across all URLs
    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    /// Every URL that was fetched at least once
    pub fn fetched_urls(&self) -> Vec<String> {
        let mut urls: Vec<_> = self.calls.lock().unwrap().keys().cloned().collect();
        urls.sort();
        urls
    }
}

#[async_trait]
impl<F: Fetcher> Fetcher for CountingFetcher<F> {
    async fn fetch(&self, url: &str) -> FetchResult {
        // Count before sleeping so an in-flight fetch is already visible
        *self.calls.lock().unwrap().entry(url.to_string()).or_insert(0) += 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.inner.fetch(url).await
    }
}
