use std::time::Duration;

/// Default debounce window, long enough to absorb double clicks and rapid
/// toggling without perceptibly delaying a deliberate single action.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(350);

/// Tuning for a [`Coalescer`](crate::Coalescer).
///
/// The debounce window is a UI constant, not a correctness knob: any positive
/// value preserves the dispatcher's guarantees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoalesceConfig {
  debounce: Duration,
}

impl CoalesceConfig {
  pub fn with_debounce(debounce: Duration) -> Self {
    Self { debounce }
  }

  pub fn debounce_ms(ms: u64) -> Self {
    Self::with_debounce(Duration::from_millis(ms))
  }

  pub fn debounce(&self) -> Duration {
    self.debounce
  }
}

impl Default for CoalesceConfig {
  fn default() -> Self {
    Self {
      debounce: DEFAULT_DEBOUNCE,
    }
  }
}
