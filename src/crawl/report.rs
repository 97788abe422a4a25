// src/crawl/report.rs
// =============================================================================
// What a crawl tells us about each page it visits.
//
// Every visit that reaches the fetch step produces exactly one report:
// - Found: the page was fetched; we keep its content and how many links it had
// - Failed: the fetch failed; the branch stops there
//
// Visits that run out of depth produce nothing.
// =============================================================================

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use crate::fetch::FetchError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CrawlReport {
    Found {
        url: String,
        /// Remaining depth when the page was visited
        depth: i32,
        content: String,
        /// Number of links discovered on the page
        links: usize,
    },
    Failed {
        url: String,
        depth: i32,
        error: FetchError,
    },
}

impl CrawlReport {
    pub fn url(&self) -> &str {
        match self {
            CrawlReport::Found { url, .. } | CrawlReport::Failed { url, .. } => url,
        }
    }

    pub fn depth(&self) -> i32 {
        match self {
            CrawlReport::Found { depth, .. } | CrawlReport::Failed { depth, .. } => *depth,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, CrawlReport::Found { .. })
    }
}

// found: https://golang.org/ "The Go Programming Language"
// not found: https://golang.org/cmd/
//
// A precision shortens long content: format!("{:.20}", report)
impl fmt::Display for CrawlReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrawlReport::Found { url, content, .. } => match f.precision() {
                Some(max) if content.chars().count() > max => {
                    let preview: String = content.chars().take(max).collect();
                    write!(f, "found: {} {:?}...", url, preview)
                }
                _ => write!(f, "found: {} {:?}", url, content),
            },
            CrawlReport::Failed { error, .. } => write!(f, "{}", error),
        }
    }
}

/// Totals over a finished crawl.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CrawlSummary {
    pub found: usize,
    pub failed: usize,
    /// URLs reported at least once (a URL can be visited via several paths)
    pub distinct_urls: usize,
}

impl CrawlSummary {
    pub fn from_reports(reports: &[CrawlReport]) -> Self {
        let found = reports.iter().filter(|r| r.is_found()).count();
        let distinct_urls = reports
            .iter()
            .map(CrawlReport::url)
            .collect::<HashSet<_>>()
            .len();

        Self {
            found,
            failed: reports.len() - found,
            distinct_urls,
        }
    }
}
