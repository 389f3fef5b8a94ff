//! Trailing-edge debounce for text input.
//!
//! Every `push` restarts the quiet period; a value settles only after the
//! input has been left alone for the whole period. Intermediate values are
//! never emitted, and dropping the debouncer discards anything pending.
//!
//! Time comes from tokio's clock so tests can pause and advance it.

use tokio::time::{Duration, Instant};

#[derive(Debug)]
pub struct Debouncer<T> {
  delay: Duration,
  pending: Option<T>,
  deadline: Option<Instant>,
}

impl<T> Debouncer<T> {
  pub fn new(delay: Duration) -> Self {
    Self {
      delay,
      pending: None,
      deadline: None,
    }
  }

  /// Record the latest raw value and restart the quiet period.
  pub fn push(&mut self, value: T) {
    self.pending = Some(value);
    self.deadline = Some(Instant::now() + self.delay);
  }

  /// Take the settled value if the quiet period has elapsed.
  pub fn poll(&mut self) -> Option<T> {
    let deadline = self.deadline?;
    if Instant::now() < deadline {
      return None;
    }
    self.deadline = None;
    self.pending.take()
  }

  /// Wait for the pending value to settle. `None` if nothing is pending.
  /// The UI polls from its tick instead.
  #[cfg(test)]
  pub async fn settled(&mut self) -> Option<T> {
    let deadline = self.deadline?;
    tokio::time::sleep_until(deadline).await;
    self.poll()
  }

  /// Discard the pending value without emitting it.
  pub fn cancel(&mut self) {
    self.pending = None;
    self.deadline = None;
  }

  pub fn is_pending(&self) -> bool {
    self.deadline.is_some()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const QUIET: Duration = Duration::from_millis(500);

  #[tokio::test(start_paused = true)]
  async fn test_nothing_pending() {
    let mut debouncer: Debouncer<String> = Debouncer::new(QUIET);
    assert_eq!(debouncer.poll(), None);
    assert_eq!(debouncer.settled().await, None);
    assert!(!debouncer.is_pending());
  }

  #[tokio::test(start_paused = true)]
  async fn test_rapid_input_settles_once_on_last_value() {
    let mut debouncer = Debouncer::new(QUIET);

    for text in ["b", "ba", "bat"] {
      debouncer.push(text.to_string());
      tokio::time::advance(Duration::from_millis(200)).await;
      assert_eq!(debouncer.poll(), None);
    }

    // 200ms since "bat"
    tokio::time::advance(Duration::from_millis(299)).await;
    assert_eq!(debouncer.poll(), None);

    tokio::time::advance(Duration::from_millis(1)).await;
    assert_eq!(debouncer.poll(), Some("bat".to_string()));

    // Emitted exactly once
    assert_eq!(debouncer.poll(), None);
    assert!(!debouncer.is_pending());
  }

  #[tokio::test(start_paused = true)]
  async fn test_settled_waits_for_quiet_period() {
    let mut debouncer = Debouncer::new(QUIET);
    let start = Instant::now();

    debouncer.push("dune");
    let value = debouncer.settled().await;

    assert_eq!(value, Some("dune"));
    assert!(start.elapsed() >= QUIET);
    assert!(start.elapsed() < QUIET + Duration::from_millis(10));
  }

  #[tokio::test(start_paused = true)]
  async fn test_push_resets_timer() {
    let mut debouncer = Debouncer::new(QUIET);

    debouncer.push(1);
    tokio::time::advance(Duration::from_millis(400)).await;
    debouncer.push(2);

    tokio::time::advance(Duration::from_millis(499)).await;
    assert_eq!(debouncer.poll(), None);
    tokio::time::advance(Duration::from_millis(1)).await;
    assert_eq!(debouncer.poll(), Some(2));
  }

  #[tokio::test(start_paused = true)]
  async fn test_cancel_discards_pending() {
    let mut debouncer = Debouncer::new(QUIET);
    debouncer.push("alien");
    debouncer.cancel();

    tokio::time::advance(QUIET * 2).await;
    assert_eq!(debouncer.poll(), None);
  }
}
