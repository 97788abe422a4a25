// src/fetch/mod.rs
// =============================================================================
// This module defines how pages are fetched.
//
// The crawler never talks to the network directly. It goes through the
// `Fetcher` trait, so the same cache and crawl logic works with:
// - HttpFetcher: real HTTP requests (reqwest + scraper/pulldown-cmark)
// - DatasetFetcher: a fixed in-memory set of pages (tests, `replay`, `demo`)
//
// Submodules:
// - error: FetchError, the typed failure that gets cached and replayed
// - dataset: fixed-dataset fetcher
// - http: network fetcher
// - html / markdown: link extraction for fetched documents
//
// Rust concepts:
// - Traits: An interface that many types can implement
// - async-trait: Lets traits have async methods
// - Trait objects: Box<dyn Fetcher> to choose a fetcher at runtime
// =============================================================================

mod dataset;
mod error;
mod html;
mod http;
mod markdown;

#[cfg(test)]
pub mod testing;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub use dataset::DatasetFetcher;
pub use error::FetchError;
pub use http::HttpFetcher;

/// A successfully fetched page: its content and the links found on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// The page body (or whatever text the fetcher considers the content)
    pub content: String,
    /// Absolute URLs referenced by the page, in document order
    #[serde(default)]
    pub links: Vec<String>,
}

impl Page {
    pub fn new(content: impl Into<String>, links: Vec<String>) -> Self {
        Self {
            content: content.into(),
            links,
        }
    }
}

/// The recorded outcome of fetching one URL.
pub type FetchResult = Result<Page, FetchError>;

/// Anything that can turn a URL into a page.
///
/// Implementations may be slow or fail; callers never retry on their behalf.
/// `Send + Sync + 'static` because fetchers are shared across tokio tasks.
#[async_trait]
pub trait Fetcher: Send + Sync + 'static {
    /// Fetches `url`, returning its content and outbound links.
    async fn fetch(&self, url: &str) -> FetchResult;
}

// Sharing a fetcher behind an Arc should not stop it from being a fetcher
#[async_trait]
impl<F: Fetcher + ?Sized> Fetcher for Arc<F> {
    async fn fetch(&self, url: &str) -> FetchResult {
        (**self).fetch(url).await
    }
}

// Lets callers pick a fetcher at runtime (e.g. HTTP vs. a fixed dataset)
#[async_trait]
impl Fetcher for Box<dyn Fetcher> {
    async fn fetch(&self, url: &str) -> FetchResult {
        (**self).fetch(url).await
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a trait instead of calling reqwest directly?
//    - The cache and the crawler only need "give me this page"
//    - Tests can plug in a fixed dataset and count how often it is called
//    - No network needed to test the tricky concurrency parts
//
// 2. Why #[async_trait]?
//    - It rewrites `async fn` in traits into methods returning a boxed future
//    - The boxed future is Send, so it can move between tokio worker threads
//    - It also keeps the trait usable as `dyn Fetcher`
//
// 3. What is `?Sized`?
//    - By default generic types must have a known size at compile time
//    - `dyn Fetcher` doesn't, so `?Sized` lets Arc<dyn Fetcher> work too
// -----------------------------------------------------------------------------
