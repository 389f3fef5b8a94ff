/// How a component responded to a key.
///
/// Components such as the search bar return this so the owning view knows
/// whether to keep routing the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyResult<T> {
  /// Key was consumed, no event for parent to handle
  Handled,
  /// Key was consumed, here's an event for parent to process
  Event(T),
  /// Key was not consumed, parent should try next handler
  NotHandled,
}

impl<T> KeyResult<T> {
  pub fn is_consumed(&self) -> bool {
    !matches!(self, KeyResult::NotHandled)
  }

  pub fn into_event(self) -> Option<T> {
    match self {
      KeyResult::Event(event) => Some(event),
      _ => None,
    }
  }
}
