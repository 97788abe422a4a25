// src/fetch/dataset.rs
// =============================================================================
// A fetcher that serves pages from a fixed, in-memory dataset.
//
// Used for:
// - Tests: deterministic pages, no network
// - `link-crawler replay <file> <root>`: crawl a JSON dataset
// - `link-crawler demo`: the built-in golang.org dataset
//
// Dataset JSON format:
//   {
//     "https://golang.org/": {
//       "content": "The Go Programming Language",
//       "links": ["https://golang.org/pkg/", "https://golang.org/cmd/"]
//     }
//   }
//
// Any URL that is not a key in the dataset fails with FetchError::NotFound.
// =============================================================================

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;

use super::{FetchError, FetchResult, Fetcher, Page};

#[derive(Debug, Clone, Default)]
pub struct DatasetFetcher {
    pages: HashMap<String, Page>,
}

impl DatasetFetcher {
    /// Creates a fetcher that serves exactly the given pages.
    pub fn new(pages: HashMap<String, Page>) -> Self {
        Self { pages }
    }

    /// Parses a dataset from a JSON string (see the module header for the format).
    pub fn from_json_str(json: &str) -> Result<Self> {
        let pages: HashMap<String, Page> =
            serde_json::from_str(json).context("Invalid dataset JSON")?;
        Ok(Self::new(pages))
    }

    /// Reads and parses a dataset file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read dataset {}", path.display()))?;
        Self::from_json_str(&json)
            .with_context(|| format!("Could not load dataset {}", path.display()))
    }

    /// The small golang.org site used by `link-crawler demo`.
    ///
    /// `https://golang.org/cmd/` is linked from several pages but has no
    /// entry, so crawling it reports a "not found" error.
    pub fn golang_tour() -> Self {
        let page = |content: &str, links: &[&str]| {
            Page::new(content, links.iter().map(|l| l.to_string()).collect())
        };

        let pages = HashMap::from([
            (
                "https://golang.org/".to_string(),
                page(
                    "The Go Programming Language",
                    &["https://golang.org/pkg/", "https://golang.org/cmd/"],
                ),
            ),
            (
                "https://golang.org/pkg/".to_string(),
                page(
                    "Packages",
                    &[
                        "https://golang.org/",
                        "https://golang.org/cmd/",
                        "https://golang.org/pkg/fmt/",
                        "https://golang.org/pkg/os/",
                    ],
                ),
            ),
            (
                "https://golang.org/pkg/fmt/".to_string(),
                page(
                    "Package fmt",
                    &["https://golang.org/", "https://golang.org/pkg/"],
                ),
            ),
            (
                "https://golang.org/pkg/os/".to_string(),
                page(
                    "Package os",
                    &["https://golang.org/", "https://golang.org/pkg/"],
                ),
            ),
        ]);

        Self::new(pages)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

impl FromIterator<(String, Page)> for DatasetFetcher {
    fn from_iter<I: IntoIterator<Item = (String, Page)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[async_trait]
impl Fetcher for DatasetFetcher {
    async fn fetch(&self, url: &str) -> FetchResult {
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::not_found(url))
    }
}
