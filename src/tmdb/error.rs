use thiserror::Error;

/// Failure of a single TMDB request.
///
/// Cloneable so one failed request can be reported to every view waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
  /// Transport failure or timeout
  #[error("network error: {0}")]
  Network(String),

  /// Non-2xx response other than 404 (rate limit, bad credential, server error)
  #[error("TMDB returned {status}: {message}")]
  Status { status: u16, message: String },

  /// The requested resource does not exist
  #[error("not found: {0}")]
  NotFound(String),

  /// Response body did not match the expected shape
  #[error("unexpected response: {0}")]
  Decode(String),

  /// A search was attempted with blank text
  #[error("search query must not be empty")]
  InvalidQuery,
}

impl ApiError {
  pub fn is_rate_limited(&self) -> bool {
    matches!(self, ApiError::Status { status: 429, .. })
  }
}

impl From<reqwest::Error> for ApiError {
  fn from(err: reqwest::Error) -> Self {
    if err.is_decode() {
      ApiError::Decode(err.to_string())
    } else {
      // Strip the URL so the credential never ends up in messages or logs
      ApiError::Network(err.without_url().to_string())
    }
  }
}
