//! Core traits for the query cache.

use futures::future::BoxFuture;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Source of data for the query cache.
///
/// Implementors map a logical query key to the network operation that answers
/// it. The cache decides *when* to call `fetch`; the fetcher only knows *how*.
pub trait QueryFetcher: Send + Sync + 'static {
  /// Value-identity key describing what data is wanted
  type Key: Clone + Eq + Hash + Debug + Send + Sync + 'static;
  /// Payload stored on success; cloned out to every reader, so keep it cheap
  type Data: Clone + Send + Sync + 'static;
  type Error: Display + Send + 'static;

  /// Start the request for `key`. Called at most once per in-flight key.
  fn fetch(&self, key: &Self::Key) -> BoxFuture<'static, Result<Self::Data, Self::Error>>;
}
