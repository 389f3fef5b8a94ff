//! Observable state of a single logical query.
//!
//! Inspired by TanStack Query: a query moves `Idle → Loading → Success | Error`
//! and views render whichever state the query they care about is in.
//!
//! ```ignore
//! match client.state(&key) {
//!     QueryState::Idle | QueryState::Loading => render_spinner(),
//!     QueryState::Success(data) => render_data(data),
//!     QueryState::Error(e) => render_error(e),
//! }
//! ```

/// The state of a query
#[derive(Debug, Clone, PartialEq)]
pub enum QueryState<T> {
  /// Query has not been started
  Idle,
  /// Query is fetching and has no data yet
  Loading,
  /// Query completed successfully
  Success(T),
  /// Query failed; carries the failure reason
  Error(String),
}

impl<T> QueryState<T> {
  pub fn is_success(&self) -> bool {
    matches!(self, QueryState::Success(_))
  }

  pub fn is_error(&self) -> bool {
    matches!(self, QueryState::Error(_))
  }

  pub fn data(&self) -> Option<&T> {
    match self {
      QueryState::Success(data) => Some(data),
      _ => None,
    }
  }

  /// Transform the success payload, keeping every other state as is.
  pub fn map<U>(self, f: impl FnOnce(T) -> U) -> QueryState<U> {
    match self {
      QueryState::Idle => QueryState::Idle,
      QueryState::Loading => QueryState::Loading,
      QueryState::Success(data) => QueryState::Success(f(data)),
      QueryState::Error(e) => QueryState::Error(e),
    }
  }
}
