use crate::error::MarketError;
use crate::marketstack::{MarketData, Sort};
use futures::future::{BoxFuture, FutureExt, Shared};
use log::trace;
use runnr_core::DailyBar;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

type Bars = Result<Arc<Vec<DailyBar>>, MarketError>;
type SharedFetch = Shared<BoxFuture<'static, Bars>>;

/// Identity of a request: same symbols, same row limit, same ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    pub symbols: String,
    pub limit: u32,
    pub sort: Sort,
}

/// Table of requests currently on the wire.
///
/// A caller asking for a key that is already in flight awaits the same response
/// instead of issuing a second request. Entries leave the table as soon as their
/// request settles, or once every caller awaiting them has gone away, so nothing
/// is served from memory afterwards.
#[derive(Default)]
pub struct InFlight {
    table: Mutex<HashMap<RequestKey, Entry>>,
}

struct Entry {
    fetch: SharedFetch,
    waiters: usize,
}

/// One caller's stake in an entry; releases it on drop, settled or not.
struct Waiter<'a> {
    table: &'a Mutex<HashMap<RequestKey, Entry>>,
    key: RequestKey,
    fetch: SharedFetch,
    settled: bool,
}

impl Drop for Waiter<'_> {
    fn drop(&mut self) {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(entry) = table.get_mut(&self.key) else {
            return;
        };
        if !entry.fetch.ptr_eq(&self.fetch) {
            return;
        }

        entry.waiters = entry.waiters.saturating_sub(1);
        if self.settled || entry.waiters == 0 {
            if !self.settled {
                trace!("abandoning in-flight request {:?}", self.key);
            }
            table.remove(&self.key);
        }
    }
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct requests currently pending.
    pub fn pending(&self) -> usize {
        self.table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Await the request for `key`, starting it with `fetch` if nobody else has.
    pub async fn run<F, Fut>(&self, key: RequestKey, fetch: F) -> Bars
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Bars> + Send + 'static,
    {
        let mut waiter = {
            let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
            let shared = match table.get_mut(&key) {
                Some(entry) => {
                    trace!("joining in-flight request {key:?}");
                    entry.waiters += 1;
                    entry.fetch.clone()
                }
                None => {
                    let shared = fetch().boxed().shared();
                    let entry = Entry {
                        fetch: shared.clone(),
                        waiters: 1,
                    };
                    table.insert(key.clone(), entry);
                    shared
                }
            };
            Waiter {
                table: &self.table,
                key,
                fetch: shared,
                settled: false,
            }
        };

        let result = waiter.fetch.clone().await;
        waiter.settled = true;
        result
    }
}

/// Wraps a [`MarketData`] source so identical concurrent requests, e.g. the
/// sidebar and the chart both asking for the same symbol, share one HTTP call.
pub struct Deduplicated<M> {
    inner: Arc<M>,
    inflight: InFlight,
}

impl<M> Deduplicated<M> {
    pub fn new(inner: M) -> Self {
        Self {
            inner: Arc::new(inner),
            inflight: InFlight::new(),
        }
    }

    pub fn inner(&self) -> &M {
        &self.inner
    }
}

impl<M: MarketData + 'static> MarketData for Deduplicated<M> {
    async fn fetch_series(&self, symbol: &str, limit: u32) -> Result<Vec<DailyBar>, MarketError> {
        let key = RequestKey {
            symbols: symbol.to_string(),
            limit,
            sort: Sort::Asc,
        };
        let inner = Arc::clone(&self.inner);
        let symbol = symbol.to_string();
        let bars = self
            .inflight
            .run(key, move || async move {
                inner.fetch_series(&symbol, limit).await.map(Arc::new)
            })
            .await?;
        Ok(bars.as_ref().clone())
    }

    async fn fetch_snapshot(
        &self,
        symbols: &[String],
        limit: u32,
    ) -> Result<Vec<DailyBar>, MarketError> {
        let key = RequestKey {
            symbols: symbols.join(","),
            limit,
            sort: Sort::Desc,
        };
        let inner = Arc::clone(&self.inner);
        let symbols = symbols.to_vec();
        let bars = self
            .inflight
            .run(key, move || async move {
                inner.fetch_snapshot(&symbols, limit).await.map(Arc::new)
            })
            .await?;
        Ok(bars.as_ref().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Counts calls and answers after a short delay.
    #[derive(Default)]
    struct Slow {
        calls: AtomicUsize,
    }

    impl MarketData for Slow {
        async fn fetch_series(
            &self,
            symbol: &str,
            limit: u32,
        ) -> Result<Vec<DailyBar>, MarketError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok((0..limit)
                .map(|i| DailyBar {
                    symbol: symbol.to_string(),
                    date: format!("2024-01-{:02}", i + 1),
                    open: 1.0,
                    high: 1.0,
                    low: 1.0,
                    close: 1.0,
                    volume: 1,
                })
                .collect())
        }

        async fn fetch_snapshot(
            &self,
            _symbols: &[String],
            _limit: u32,
        ) -> Result<Vec<DailyBar>, MarketError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Err(MarketError::unavailable("503 Service Unavailable"))
        }
    }

    #[tokio::test]
    async fn concurrent_identical_requests_share_one_call() {
        let data = Deduplicated::new(Slow::default());
        let (a, b) = futures::join!(data.fetch_series("AAPL", 3), data.fetch_series("AAPL", 3));
        assert_eq!(a.unwrap().len(), 3);
        assert_eq!(b.unwrap().len(), 3);
        assert_eq!(data.inner().calls.load(Ordering::SeqCst), 1);
        assert_eq!(data.inflight.pending(), 0);
    }

    #[tokio::test]
    async fn different_keys_are_separate_calls() {
        let data = Deduplicated::new(Slow::default());
        let (a, b) = futures::join!(data.fetch_series("AAPL", 3), data.fetch_series("AAPL", 5));
        assert_eq!(a.unwrap().len(), 3);
        assert_eq!(b.unwrap().len(), 5);
        assert_eq!(data.inner().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn settled_requests_are_not_cached() {
        let data = Deduplicated::new(Slow::default());
        data.fetch_series("MSFT", 1).await.unwrap();
        data.fetch_series("MSFT", 1).await.unwrap();
        assert_eq!(data.inner().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn abandoned_request_leaves_the_table() {
        let data = Deduplicated::new(Slow::default());
        let abandoned =
            tokio::time::timeout(Duration::from_millis(5), data.fetch_series("AAPL", 2)).await;
        assert!(abandoned.is_err());
        assert_eq!(data.inflight.pending(), 0);

        // a fresh request goes out instead of resuming the dropped one
        let bars = data.fetch_series("AAPL", 2).await.unwrap();
        assert_eq!(bars.len(), 2);
        assert_eq!(data.inner().calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn remaining_waiter_keeps_the_request() {
        let data = Deduplicated::new(Slow::default());
        let kept = data.fetch_series("MSFT", 1);
        let dropped = tokio::time::timeout(Duration::from_millis(5), data.fetch_series("MSFT", 1));
        let (kept, dropped) = futures::join!(kept, dropped);

        assert!(dropped.is_err());
        assert_eq!(kept.unwrap().len(), 1);
        assert_eq!(data.inner().calls.load(Ordering::SeqCst), 1);
        assert_eq!(data.inflight.pending(), 0);
    }

    #[tokio::test]
    async fn failures_are_shared_too() {
        let data = Deduplicated::new(Slow::default());
        let symbols = vec!["AAPL".to_string(), "MSFT".to_string()];
        let (a, b) = futures::join!(
            data.fetch_snapshot(&symbols, 120),
            data.fetch_snapshot(&symbols, 120)
        );
        assert!(matches!(a, Err(MarketError::DataUnavailable(_))));
        assert_eq!(a, b);
        assert_eq!(data.inner().calls.load(Ordering::SeqCst), 1);
        assert_eq!(data.inflight.pending(), 0);
    }
}
