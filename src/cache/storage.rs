//! In-memory entry map shared by every consumer of the query cache.

use futures::future::{BoxFuture, Shared};
use std::collections::HashMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::query::QueryState;

/// A request shared by everyone waiting on the same key.
/// Resolves to the entry's state after the result has been stored.
pub type InFlight<T> = Shared<BoxFuture<'static, QueryState<T>>>;

/// Cache entry for one query key.
pub struct Entry<T> {
  pub state: QueryState<T>,
  /// Time of the last successful fetch; `None` forces a refetch
  pub fetched_at: Option<Instant>,
  pub in_flight: Option<InFlight<T>>,
  /// Failure of the latest refetch while older data is still shown
  pub last_error: Option<String>,
  pub subscribers: usize,
  /// When the last subscriber went away (or creation, if never subscribed)
  pub idle_since: Option<Instant>,
}

impl<T> Entry<T> {
  fn new(now: Instant) -> Self {
    Self {
      state: QueryState::Idle,
      fetched_at: None,
      in_flight: None,
      last_error: None,
      subscribers: 0,
      idle_since: Some(now),
    }
  }

  pub fn is_fresh(&self, stale_time: Duration, now: Instant) -> bool {
    self.state.is_success()
      && self
        .fetched_at
        .is_some_and(|at| now.saturating_duration_since(at) < stale_time)
  }

  fn is_collectable(&self, gc_time: Duration, now: Instant) -> bool {
    self.subscribers == 0
      && self.in_flight.is_none()
      && self
        .idle_since
        .is_some_and(|since| now.saturating_duration_since(since) >= gc_time)
  }
}

/// Key → entry map guarded by a mutex that is never held across an await.
pub struct QueryStore<K, T> {
  entries: Mutex<HashMap<K, Entry<T>>>,
}

impl<K, T> Default for QueryStore<K, T> {
  fn default() -> Self {
    Self {
      entries: Mutex::new(HashMap::new()),
    }
  }
}

impl<K, T> QueryStore<K, T>
where
  K: Clone + Eq + Hash + Debug,
  T: Clone,
{
  // Entries stay consistent under every early return, so a poisoned lock is
  // still safe to use
  fn lock(&self) -> MutexGuard<'_, HashMap<K, Entry<T>>> {
    self.entries.lock().unwrap_or_else(PoisonError::into_inner)
  }

  /// Run `f` against the entry for `key`, creating it on first reference.
  pub fn with_entry<R>(&self, key: &K, now: Instant, f: impl FnOnce(&mut Entry<T>) -> R) -> R {
    let mut entries = self.lock();
    let entry = entries
      .entry(key.clone())
      .or_insert_with(|| Entry::new(now));
    f(entry)
  }

  /// Run `f` against an existing entry only.
  pub fn with_existing<R>(&self, key: &K, f: impl FnOnce(&mut Entry<T>) -> R) -> Option<R> {
    self.lock().get_mut(key).map(f)
  }

  /// Snapshot of the state for `key`; `Idle` if never referenced.
  pub fn state(&self, key: &K) -> QueryState<T> {
    self
      .lock()
      .get(key)
      .map(|entry| entry.state.clone())
      .unwrap_or(QueryState::Idle)
  }

  /// Store the outcome of a request under its own key.
  ///
  /// A failed refetch keeps earlier data and records the failure in
  /// `last_error`; the entry stays stale so the next fetch retries.
  pub fn settle<E: Display>(&self, key: &K, result: Result<T, E>, now: Instant) -> QueryState<T> {
    self.with_entry(key, now, |entry| {
      entry.in_flight = None;
      match result {
        Ok(data) => {
          debug!(?key, "query succeeded");
          entry.state = QueryState::Success(data);
          entry.fetched_at = Some(now);
          entry.last_error = None;
        }
        Err(e) if entry.state.is_success() => {
          warn!(?key, error = %e, "refetch failed, keeping cached data");
          entry.fetched_at = None;
          entry.last_error = Some(e.to_string());
        }
        Err(e) => {
          warn!(?key, error = %e, "query failed");
          entry.state = QueryState::Error(e.to_string());
          entry.last_error = None;
        }
      }
      if entry.subscribers == 0 {
        entry.idle_since = Some(now);
      }
      entry.state.clone()
    })
  }

  pub fn subscribe(&self, key: &K, now: Instant) {
    self.with_entry(key, now, |entry| {
      entry.subscribers += 1;
      entry.idle_since = None;
    });
  }

  pub fn unsubscribe(&self, key: &K, now: Instant) {
    self.with_existing(key, |entry| {
      entry.subscribers = entry.subscribers.saturating_sub(1);
      if entry.subscribers == 0 {
        entry.idle_since = Some(now);
      }
    });
  }

  /// Evict entries unused for at least `gc_time`. Returns the number evicted.
  pub fn collect(&self, gc_time: Duration, now: Instant) -> usize {
    let mut entries = self.lock();
    let before = entries.len();
    entries.retain(|key, entry| {
      let keep = !entry.is_collectable(gc_time, now);
      if !keep {
        debug!(?key, "evicting idle query");
      }
      keep
    });
    before - entries.len()
  }

  #[cfg(test)]
  pub fn len(&self) -> usize {
    self.lock().len()
  }

  #[cfg(test)]
  pub fn contains(&self, key: &K) -> bool {
    self.lock().contains_key(key)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn store() -> QueryStore<&'static str, u32> {
    QueryStore::default()
  }

  #[test]
  fn test_unknown_key_is_idle() {
    assert_eq!(store().state(&"missing"), QueryState::Idle);
  }

  #[test]
  fn test_settle_error_without_data() {
    let store = store();
    let now = Instant::now();

    let state = store.settle::<&str>(&"a", Err("boom"), now);
    assert_eq!(state, QueryState::Error("boom".to_string()));
    assert_eq!(store.with_entry(&"a", now, |e| e.last_error.clone()), None);
  }

  #[test]
  fn test_failed_refetch_keeps_data_and_records_error() {
    let store = store();
    let now = Instant::now();
    let stale_time = Duration::from_secs(60);

    let state = store.settle::<String>(&"a", Ok(1), now);
    assert_eq!(state, QueryState::Success(1));
    assert!(store.with_entry(&"a", now, |e| e.is_fresh(stale_time, now)));

    let state = store.settle(&"a", Err("boom"), now);
    assert_eq!(state, QueryState::Success(1));
    assert_eq!(
      store.with_entry(&"a", now, |e| e.last_error.clone()),
      Some("boom".to_string())
    );
    assert!(!store.with_entry(&"a", now, |e| e.is_fresh(stale_time, now)));

    // A later success clears the recorded failure
    store.settle::<String>(&"a", Ok(2), now);
    assert_eq!(store.state(&"a"), QueryState::Success(2));
    assert_eq!(store.with_entry(&"a", now, |e| e.last_error.clone()), None);
  }

  #[test]
  fn test_freshness_window() {
    let store = store();
    let start = Instant::now();
    store.settle::<String>(&"a", Ok(1), start);

    let stale_time = Duration::from_secs(300);
    let just_before = start + Duration::from_secs(299);
    let at_limit = start + Duration::from_secs(300);
    assert!(store.with_entry(&"a", start, |e| e.is_fresh(stale_time, just_before)));
    assert!(!store.with_entry(&"a", start, |e| e.is_fresh(stale_time, at_limit)));
  }

  #[test]
  fn test_collect_respects_subscribers_and_idle_time() {
    let store = store();
    let start = Instant::now();
    let gc_time = Duration::from_secs(1800);

    store.subscribe(&"watched", start);
    store.settle::<String>(&"watched", Ok(1), start);
    store.settle::<String>(&"unwatched", Ok(2), start);

    assert_eq!(store.collect(gc_time, start + Duration::from_secs(1799)), 0);
    assert_eq!(store.collect(gc_time, start + gc_time), 1);
    assert!(store.contains(&"watched"));
    assert!(!store.contains(&"unwatched"));

    // The idle clock starts when the last subscriber leaves
    let released = start + Duration::from_secs(3600);
    store.unsubscribe(&"watched", released);
    assert_eq!(store.collect(gc_time, released + Duration::from_secs(10)), 0);
    assert_eq!(store.collect(gc_time, released + gc_time), 1);
    assert_eq!(store.len(), 0);
  }
}
