// src/cache/mod.rs
// =============================================================================
// This module caches fetch results so each URL is fetched at most once.
//
// The crawler runs many tasks at the same time, and they often ask for the
// same page simultaneously (pages link back to each other). A plain
// "check the map, fetch, insert" cache would let several tasks miss at once
// and all fetch the same page. Holding one lock across the fetch would fix
// that, but then a slow page would block every other page.
//
// How it works (singleflight):
// 1. Lock the map for a moment
// 2. If the URL has an entry, clone it. Otherwise insert a new *shared
//    future* that will perform the fetch, and clone that
// 3. Unlock, then await the clone
//
// Every caller for a URL awaits a clone of the same shared future, so the
// fetch runs once and they all get the same Arc'd result. Callers for other
// URLs only ever wait for the brief map lookup.
//
// Entries are never replaced or removed. Failures are cached like successes.
//
// Rust concepts:
// - Shared futures (futures::future::Shared): one future, many awaiters
// - Mutex: Guards the map; never held across an .await
// - Arc: The result is shared read-only with every caller
// - Atomics: Lock-free hit/miss counters
// =============================================================================

use futures::future::{BoxFuture, FutureExt, Shared};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace};

use crate::fetch::{FetchResult, Fetcher};

// A fetch that may still be running; completed ones just hold their output
type PendingFetch = Shared<BoxFuture<'static, Arc<FetchResult>>>;

/// Cache hit/miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Calls that found an entry (finished or still in flight)
    pub hits: u64,
    /// Calls that created the entry, i.e. fetches started
    pub misses: u64,
}

/// A fetcher wrapper that guarantees each URL reaches the inner fetcher at
/// most once, no matter how many tasks ask for it concurrently.
pub struct FetchCache<F> {
    fetcher: Arc<F>,
    entries: Mutex<HashMap<String, PendingFetch>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<F: Fetcher> FetchCache<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            entries: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Returns the recorded outcome for `url`, fetching it first if no one
    /// has asked for it before.
    ///
    /// Concurrent callers for the same URL wait for the single in-flight
    /// fetch. If the caller that started a fetch is cancelled, the next
    /// caller resumes the same future rather than starting a second fetch.
    pub async fn fetch(&self, url: &str) -> Arc<FetchResult> {
        let pending = {
            let mut entries = self.lock_entries();
            match entries.get(url) {
                Some(pending) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    trace!(url, "cache hit");
                    pending.clone()
                }
                None => {
                    self.misses.fetch_add(1, Ordering::Relaxed);
                    debug!(url, "cache miss, fetching");
                    let pending = self.start_fetch(url);
                    entries.insert(url.to_string(), pending.clone());
                    pending
                }
            }
        };

        pending.await
    }

    /// The outcome for `url` if it has already been fetched. Never fetches.
    pub fn peek(&self, url: &str) -> Option<Arc<FetchResult>> {
        self.lock_entries()
            .get(url)
            .and_then(|pending| pending.peek().cloned())
    }

    /// Number of URLs ever requested (including fetches still in flight)
    pub fn len(&self) -> usize {
        self.lock_entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_entries().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    // Builds the future but doesn't poll it; the first awaiter drives it
    fn start_fetch(&self, url: &str) -> PendingFetch {
        let fetcher = Arc::clone(&self.fetcher);
        let url = url.to_string();
        async move { Arc::new(fetcher.fetch(&url).await) }
            .boxed()
            .shared()
    }

    // Entries are inserted whole under the lock, so a poisoned map is still
    // consistent and safe to keep using
    fn lock_entries(&self) -> MutexGuard<'_, HashMap<String, PendingFetch>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is a Shared future?
//    - Normally a future can be awaited only once, by one owner
//    - .shared() wraps it so it can be cloned; every clone resolves to a
//      clone of the same output
//    - Whichever clone is polled drives the real work; the others are woken
//      when it finishes
//
// 2. Why is the Mutex released before .await?
//    - std::sync::Mutex blocks the whole thread while held
//    - Holding it across an .await could block other tasks on this thread,
//      or deadlock if the awaited future needs the same lock
//    - The { ... } block ends the MutexGuard's scope before we await
//
// 3. Why Arc<FetchResult> instead of FetchResult?
//    - Every caller gets the same recorded result
//    - Cloning an Arc just bumps a counter; the page content isn't copied
//
// 4. What is Ordering::Relaxed?
//    - The weakest memory ordering for atomics
//    - Fine for statistics counters that nothing else depends on
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::testing::{abc_graph, CountingFetcher};
    use crate::fetch::{FetchError, Page};
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::Notify;
    use tokio::time::timeout;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_fetches_hit_fetcher_once() {
        let fetcher = Arc::new(CountingFetcher::new(abc_graph()).with_delay(Duration::from_millis(50)));
        let cache = Arc::new(FetchCache::new(Arc::clone(&fetcher)));

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let cache = Arc::clone(&cache);
                tokio::spawn(async move { cache.fetch("A").await })
            })
            .collect();

        let mut outcomes = Vec::new();
        for handle in handles {
            outcomes.push(handle.await.unwrap());
        }

        assert_eq!(fetcher.calls("A"), 1);
        let expected: FetchResult = Ok(Page::new("pageA", vec!["B".into(), "C".into()]));
        assert!(outcomes.iter().all(|outcome| **outcome == expected));
        assert_eq!(cache.stats(), CacheStats { hits: 31, misses: 1 });
    }

    #[tokio::test]
    async fn test_sequential_fetches_are_idempotent() {
        let fetcher = Arc::new(CountingFetcher::new(abc_graph()));
        let cache = FetchCache::new(Arc::clone(&fetcher));

        let first = cache.fetch("B").await;
        let second = cache.fetch("B").await;

        assert_eq!(first, second);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(fetcher.calls("B"), 1);
    }

    #[tokio::test]
    async fn test_failures_are_cached_and_replayed() {
        let fetcher = Arc::new(CountingFetcher::new(abc_graph()));
        let cache = FetchCache::new(Arc::clone(&fetcher));

        for _ in 0..3 {
            let outcome = cache.fetch("Z").await;
            let Err(error) = &*outcome else {
                panic!("expected a failure, got {outcome:?}");
            };
            assert_eq!(*error, FetchError::not_found("Z"));
            assert!(error.to_string().contains('Z'));
        }
        assert_eq!(fetcher.calls("Z"), 1);
    }

    fn content(outcome: &FetchResult) -> &str {
        &outcome.as_ref().unwrap().content
    }

    // Blocks fetches of "slow" until released; everything else is instant
    struct GateFetcher {
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl Fetcher for GateFetcher {
        async fn fetch(&self, url: &str) -> FetchResult {
            if url == "slow" {
                self.gate.notified().await;
            }
            Ok(Page::new(url, vec![]))
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_slow_key_does_not_block_other_keys() {
        let gate = Arc::new(Notify::new());
        let cache = Arc::new(FetchCache::new(GateFetcher { gate: Arc::clone(&gate) }));

        let slow = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move { cache.fetch("slow").await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        let fast = timeout(Duration::from_secs(1), cache.fetch("fast"))
            .await
            .expect("unrelated key waited on the slow fetch");
        assert_eq!(content(&fast), "fast");
        assert!(cache.peek("slow").is_none());

        gate.notify_one();
        let slow = slow.await.unwrap();
        assert_eq!(content(&slow), "slow");
    }

    #[tokio::test]
    async fn test_cancelled_caller_does_not_cause_refetch() {
        let fetcher = Arc::new(CountingFetcher::new(abc_graph()).with_delay(Duration::from_millis(100)));
        let cache = FetchCache::new(Arc::clone(&fetcher));

        // Give up on the first fetch while it's still in flight
        assert!(timeout(Duration::from_millis(10), cache.fetch("A")).await.is_err());

        let outcome = cache.fetch("A").await;
        assert!(outcome.is_ok());
        assert_eq!(fetcher.calls("A"), 1);
    }

    #[tokio::test]
    async fn test_peek_and_len() {
        let cache = FetchCache::new(abc_graph());
        assert!(cache.is_empty());
        assert!(cache.peek("A").is_none());

        cache.fetch("A").await;
        cache.fetch("missing").await;

        assert_eq!(cache.len(), 2);
        assert!(cache.peek("A").unwrap().is_ok());
        assert!(cache.peek("missing").unwrap().is_err());
        assert!(cache.peek("B").is_none());
    }
}
