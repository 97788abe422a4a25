// src/crawl/driver.rs
// =============================================================================
// This module implements the crawl itself: a depth-first fan-out where every
// discovered link becomes its own tokio task.
//
// How it works:
// 1. Visit(url, depth): if depth <= 0, stop
// 2. Fetch the url through the cache (which fetches each url only once)
// 3. On failure: report the error and stop this branch
// 4. On success: report the page, then spawn Visit(link, depth - 1) for
//    every link, without waiting for them
//
// Knowing when we're done:
// - Every task owns a clone of the report channel's Sender
// - The receiver only returns None once *all* Senders are dropped, i.e. once
//   every task, including every descendant, has finished
// - So draining the receiver is a wait-group for the whole crawl
//
// We don't skip pages we've already visited: the same url can be visited
// again through a different path. The cache makes those revisits free.
//
// Rust concepts:
// - tokio::spawn: Run a future as an independent task on the runtime
// - mpsc channels: Many producers (tasks), one consumer (the caller)
// - Semaphore: Optionally cap how many fetches run at once
// =============================================================================

use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, info, trace};

use super::CrawlReport;
use crate::cache::FetchCache;
use crate::config::CrawlConfig;
use crate::fetch::Fetcher;

pub struct Crawler<F> {
    cache: Arc<FetchCache<F>>,
    config: Arc<CrawlConfig>,
    // None = no limit on concurrent fetches
    limiter: Option<Arc<Semaphore>>,
}

impl<F: Fetcher> Crawler<F> {
    pub fn new(cache: Arc<FetchCache<F>>, config: CrawlConfig) -> Self {
        let limiter = config
            .max_concurrency
            .map(|permits| Arc::new(Semaphore::new(permits.max(1))));

        Self {
            cache,
            config: Arc::new(config),
            limiter,
        }
    }

    pub fn cache(&self) -> &Arc<FetchCache<F>> {
        &self.cache
    }

    /// Starts crawling from `root` and returns a channel of reports.
    ///
    /// Reports arrive in whatever order tasks finish. The channel closes once
    /// every task spawned by this crawl has finished. Dropping the receiver
    /// early makes the remaining tasks stop instead of exploring further.
    ///
    /// Must be called from within a tokio runtime.
    pub fn crawl_stream(&self, root: &str) -> mpsc::Receiver<CrawlReport> {
        let (reports, receiver) = mpsc::channel(self.config.channel_capacity.max(1));

        info!(
            root,
            max_depth = self.config.max_depth,
            max_concurrency = ?self.config.max_concurrency,
            "starting crawl"
        );
        self.spawn_visit(root.to_string(), self.config.max_depth, reports);

        receiver
    }

    /// Crawls from `root` and returns every report once the whole crawl,
    /// including all descendant tasks, has finished.
    pub async fn crawl(&self, root: &str) -> Vec<CrawlReport> {
        let mut receiver = self.crawl_stream(root);

        let mut reports = Vec::new();
        while let Some(report) = receiver.recv().await {
            reports.push(report);
        }

        info!(reports = reports.len(), cached = self.cache.len(), "crawl finished");
        reports
    }

    // A plain (non-async) fn, so the visit future doesn't have to contain
    // itself to spawn its children
    fn spawn_visit(&self, url: String, depth: i32, reports: mpsc::Sender<CrawlReport>) {
        if depth <= 0 {
            trace!(%url, "depth exhausted");
            return;
        }

        let crawler = self.clone();
        tokio::spawn(async move {
            crawler.visit(url, depth, reports).await;
        });
    }

    async fn visit(self, url: String, depth: i32, reports: mpsc::Sender<CrawlReport>) {
        debug!(%url, depth, "visiting");

        let outcome = {
            // Held only while fetching, never while children run
            let _permit = match &self.limiter {
                Some(limiter) => limiter.acquire().await.ok(),
                None => None,
            };
            self.cache.fetch(&url).await
        };

        match &*outcome {
            Err(error) => {
                debug!(%url, %error, "fetch failed");
                let report = CrawlReport::Failed {
                    url,
                    depth,
                    error: error.clone(),
                };
                // Nothing to explore either way, so a closed channel is fine
                let _ = reports.send(report).await;
            }
            Ok(page) => {
                let report = CrawlReport::Found {
                    url,
                    depth,
                    content: page.content.clone(),
                    links: page.links.len(),
                };
                if reports.send(report).await.is_err() {
                    debug!("report receiver dropped, stopping branch");
                    return;
                }

                for link in &page.links {
                    self.spawn_visit(link.clone(), depth - 1, reports.clone());
                }
            }
        }
    }
}

// Every field is an Arc, so cloning a Crawler is cheap and doesn't need F: Clone
impl<F> Clone for Crawler<F> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            config: Arc::clone(&self.config),
            limiter: self.limiter.clone(),
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why spawn a task per link?
//    - Each page's fetch may be slow (network)
//    - Tasks let all branches make progress at the same time
//    - tokio spreads tasks over a pool of worker threads
//
// 2. How does the channel act as a wait-group?
//    - mpsc::Sender can be cloned; each clone keeps the channel open
//    - recv() returns None only when every Sender is gone
//    - A task drops its Sender when it finishes, after handing clones to its
//      children, so None means "the whole tree is done"
//
// 3. Why does visit() take self by value?
//    - tokio::spawn needs a 'static future: it can't borrow from the caller
//    - Each task gets its own cheap clone of the Crawler (a few Arcs)
//
// 4. What does `let _ = ...` do?
//    - Explicitly ignores a value (here, a send error we don't care about)
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::{abc_graph, graph, CountingFetcher};
    use crate::fetch::{DatasetFetcher, FetchError};
    use std::time::Duration;

    fn crawler<F: Fetcher>(fetcher: F, max_depth: i32) -> Crawler<F> {
        let config = CrawlConfig::default().with_max_depth(max_depth);
        Crawler::new(Arc::new(FetchCache::new(fetcher)), config)
    }

    // (url, depth) of every Found report, sorted
    fn found(reports: &[CrawlReport]) -> Vec<(String, i32)> {
        let mut found: Vec<_> = reports
            .iter()
            .filter(|r| r.is_found())
            .map(|r| (r.url().to_string(), r.depth()))
            .collect();
        found.sort();
        found
    }

    fn failed(reports: &[CrawlReport]) -> Vec<String> {
        let mut failed: Vec<_> = reports
            .iter()
            .filter(|r| !r.is_found())
            .map(|r| r.url().to_string())
            .collect();
        failed.sort();
        failed
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_cycle_reports_each_page_once() {
        let fetcher = Arc::new(CountingFetcher::new(abc_graph()));
        let reports = crawler(Arc::clone(&fetcher), 2).crawl("A").await;

        assert_eq!(
            found(&reports),
            vec![("A".into(), 2), ("B".into(), 1), ("C".into(), 1)]
        );
        assert!(failed(&reports).is_empty());
        assert_eq!(fetcher.fetched_urls(), vec!["A", "B", "C"]);
        assert_eq!(fetcher.total_calls(), 3);

        let contents: Vec<_> = reports
            .iter()
            .filter_map(|r| match r {
                CrawlReport::Found { url, content, .. } if url == "B" => Some(content.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(contents, vec!["pageB"]);
    }

    #[tokio::test]
    async fn test_depth_zero_reports_nothing() {
        let fetcher = Arc::new(CountingFetcher::new(abc_graph()));
        let reports = crawler(Arc::clone(&fetcher), 0).crawl("A").await;

        assert!(reports.is_empty());
        assert_eq!(fetcher.total_calls(), 0);
    }

    #[tokio::test]
    async fn test_negative_depth_reports_nothing() {
        let reports = crawler(abc_graph(), -1).crawl("A").await;
        assert!(reports.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_depth_bounds_the_crawl() {
        let chain = graph(&[
            ("A", "a", &["B"]),
            ("B", "b", &["C"]),
            ("C", "c", &["D"]),
            ("D", "d", &[]),
        ]);
        let fetcher = Arc::new(CountingFetcher::new(chain));
        let reports = crawler(Arc::clone(&fetcher), 2).crawl("A").await;

        assert_eq!(found(&reports), vec![("A".into(), 2), ("B".into(), 1)]);
        assert_eq!(fetcher.calls("C"), 0);
        assert_eq!(fetcher.calls("D"), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_failure_does_not_affect_siblings() {
        let dataset = graph(&[("A", "pageA", &["X", "B"]), ("B", "pageB", &[])]);
        let reports = crawler(dataset, 3).crawl("A").await;

        assert_eq!(found(&reports), vec![("A".into(), 3), ("B".into(), 2)]);
        assert_eq!(failed(&reports), vec!["X"]);
    }

    #[tokio::test]
    async fn test_unknown_root_reports_error_with_url() {
        let reports = crawler(abc_graph(), 3).crawl("Z").await;

        assert_eq!(reports.len(), 1);
        match &reports[0] {
            CrawlReport::Failed { url, error, .. } => {
                assert_eq!(url, "Z");
                assert_eq!(*error, FetchError::not_found("Z"));
                assert!(error.to_string().contains('Z'));
            }
            other => panic!("expected a failure, got {other:?}"),
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_revisits_are_reported_but_fetched_once() {
        let diamond = graph(&[
            ("A", "a", &["B", "C"]),
            ("B", "b", &["D"]),
            ("C", "c", &["D"]),
            ("D", "d", &[]),
        ]);
        let fetcher = Arc::new(CountingFetcher::new(diamond).with_delay(Duration::from_millis(5)));
        let reports = crawler(Arc::clone(&fetcher), 3).crawl("A").await;

        assert_eq!(
            found(&reports),
            vec![
                ("A".into(), 3),
                ("B".into(), 2),
                ("C".into(), 2),
                ("D".into(), 1),
                ("D".into(), 1),
            ]
        );
        assert_eq!(fetcher.calls("D"), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_golang_tour() {
        let fetcher = Arc::new(CountingFetcher::new(DatasetFetcher::golang_tour()));
        let crawler = crawler(Arc::clone(&fetcher), 4);
        let reports = crawler.crawl("https://golang.org/").await;

        let mut found_urls: Vec<_> = found(&reports).into_iter().map(|(url, _)| url).collect();
        found_urls.dedup();
        assert_eq!(
            found_urls,
            vec![
                "https://golang.org/",
                "https://golang.org/pkg/",
                "https://golang.org/pkg/fmt/",
                "https://golang.org/pkg/os/",
            ]
        );
        assert!(failed(&reports).iter().all(|url| url == "https://golang.org/cmd/"));
        assert!(!failed(&reports).is_empty());

        // Five distinct urls, each fetched exactly once
        assert_eq!(fetcher.total_calls(), 5);
        assert_eq!(crawler.cache().len(), 5);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrency_limit_gives_same_reports() {
        let unbounded = crawler(DatasetFetcher::golang_tour(), 4)
            .crawl("https://golang.org/")
            .await;

        let config = CrawlConfig::default()
            .with_max_concurrency(Some(1))
            .with_channel_capacity(1);
        let limited = Crawler::new(Arc::new(FetchCache::new(DatasetFetcher::golang_tour())), config)
            .crawl("https://golang.org/")
            .await;

        assert_eq!(found(&limited), found(&unbounded));
        assert_eq!(failed(&limited), failed(&unbounded));
    }

    #[tokio::test]
    async fn test_crawl_stream_closes_when_done() {
        let crawler = crawler(abc_graph(), 2);
        let mut receiver = crawler.crawl_stream("A");

        let mut count = 0;
        while let Some(_report) = tokio::time::timeout(Duration::from_secs(5), receiver.recv())
            .await
            .expect("crawl did not finish")
        {
            count += 1;
        }
        assert_eq!(count, 3);
    }
}
