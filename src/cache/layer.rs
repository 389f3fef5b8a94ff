//! Query client: deduplicating, freshness-aware coordination between views
//! and the network.

use futures::FutureExt;
use std::sync::Arc;
use tokio::time::{Duration, Instant};
use tracing::debug;

use super::storage::{InFlight, QueryStore};
use super::traits::QueryFetcher;
use crate::query::QueryState;

/// Freshness and eviction windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheOptions {
  /// How long after a successful fetch data is served without a network call
  pub stale_time: Duration,
  /// How long an entry with no subscribers is kept before eviction
  pub gc_time: Duration,
}

impl Default for CacheOptions {
  fn default() -> Self {
    Self {
      stale_time: Duration::from_secs(5 * 60),
      gc_time: Duration::from_secs(30 * 60),
    }
  }
}

/// What `begin` decided for a key.
enum Begin<T> {
  Fresh(QueryState<T>),
  Pending(InFlight<T>),
}

/// Tuple-keyed query cache sitting between views and the fetcher.
///
/// - At most one request per key is in flight; concurrent callers share it.
/// - Successful data is served from memory for `stale_time`.
/// - Results are always stored under the key that requested them, so a late
///   response for a superseded query never overwrites another key's entry.
/// - Requests run on the runtime to completion even if every caller has
///   moved on.
pub struct QueryClient<F: QueryFetcher> {
  fetcher: Arc<F>,
  store: Arc<QueryStore<F::Key, F::Data>>,
  options: CacheOptions,
}

impl<F: QueryFetcher> QueryClient<F> {
  pub fn new(fetcher: F) -> Self {
    Self {
      fetcher: Arc::new(fetcher),
      store: Arc::new(QueryStore::default()),
      options: CacheOptions::default(),
    }
  }

  pub fn with_options(mut self, options: CacheOptions) -> Self {
    self.options = options;
    self
  }

  /// Make sure `key` has fresh data or a request on the way. Does not wait.
  pub fn fetch(&self, key: &F::Key) {
    // Dropping the handle is fine: the request is spawned
    let _ = self.begin(key);
  }

  /// Resolve `key` to a settled state, from memory when fresh.
  pub async fn resolve(&self, key: &F::Key) -> QueryState<F::Data> {
    match self.begin(key) {
      Begin::Fresh(state) => state,
      Begin::Pending(request) => request.await,
    }
  }

  /// Current state of `key` for rendering.
  ///
  /// While stale data is being refetched this keeps reporting the old
  /// `Success`; use [`QueryClient::is_fetching`] to show a refresh marker.
  pub fn state(&self, key: &F::Key) -> QueryState<F::Data> {
    self.store.state(key)
  }

  pub fn is_fetching(&self, key: &F::Key) -> bool {
    self
      .store
      .with_existing(key, |entry| entry.in_flight.is_some())
      .unwrap_or(false)
  }

  /// Failure of the latest refetch of `key` while its older data is still
  /// served. Cleared by the next successful fetch.
  pub fn last_error(&self, key: &F::Key) -> Option<String> {
    self
      .store
      .with_existing(key, |entry| entry.last_error.clone())
      .flatten()
  }

  /// Mark `key` as in use. The entry cannot be evicted while any
  /// subscription for it is alive.
  pub fn subscribe(&self, key: F::Key) -> QuerySubscription<F> {
    self.store.subscribe(&key, Instant::now());
    QuerySubscription {
      store: Arc::clone(&self.store),
      key,
    }
  }

  /// Force the next `fetch`/`resolve` of `key` to go to the network.
  /// An in-flight request is left alone.
  pub fn invalidate(&self, key: &F::Key) {
    self.store.with_existing(key, |entry| entry.fetched_at = None);
  }

  /// Evict entries nobody has used for `gc_time`.
  pub fn collect_garbage(&self) -> usize {
    let evicted = self.store.collect(self.options.gc_time, Instant::now());
    if evicted > 0 {
      debug!(evicted, "collected idle queries");
    }
    evicted
  }

  #[cfg(test)]
  pub fn entry_count(&self) -> usize {
    self.store.len()
  }

  fn begin(&self, key: &F::Key) -> Begin<F::Data> {
    let now = Instant::now();
    self.store.with_entry(key, now, |entry| {
      if entry.is_fresh(self.options.stale_time, now) {
        debug!(?key, "cache hit");
        return Begin::Fresh(entry.state.clone());
      }
      if let Some(request) = &entry.in_flight {
        debug!(?key, "joining in-flight request");
        return Begin::Pending(request.clone());
      }

      debug!(?key, stale = entry.state.is_success(), "fetching");
      let request = self.spawn_request(key);
      // Stale data stays visible while it is refreshed
      if !entry.state.is_success() {
        entry.state = QueryState::Loading;
      }
      entry.in_flight = Some(request.clone());
      Begin::Pending(request)
    })
  }

  fn spawn_request(&self, key: &F::Key) -> InFlight<F::Data> {
    let response = self.fetcher.fetch(key);
    let store = Arc::clone(&self.store);
    let key = key.clone();

    let request = async move {
      let result = response.await;
      store.settle(&key, result, Instant::now())
    }
    .boxed()
    .shared();

    // The store lock is held by the caller; the task blocks on it until
    // `begin` has recorded the request
    tokio::spawn(request.clone());
    request
  }
}

impl<F: QueryFetcher> Clone for QueryClient<F> {
  fn clone(&self) -> Self {
    Self {
      fetcher: Arc::clone(&self.fetcher),
      store: Arc::clone(&self.store),
      options: self.options,
    }
  }
}

/// Keeps a query entry alive. Dropping it starts the entry's idle clock.
pub struct QuerySubscription<F: QueryFetcher> {
  store: Arc<QueryStore<F::Key, F::Data>>,
  key: F::Key,
}

impl<F: QueryFetcher> QuerySubscription<F> {
  pub fn key(&self) -> &F::Key {
    &self.key
  }
}

impl<F: QueryFetcher> Drop for QuerySubscription<F> {
  fn drop(&mut self) {
    self.store.unsubscribe(&self.key, Instant::now());
  }
}

impl<F: QueryFetcher> std::fmt::Debug for QuerySubscription<F> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("QuerySubscription")
      .field("key", &self.key)
      .finish_non_exhaustive()
  }
}
