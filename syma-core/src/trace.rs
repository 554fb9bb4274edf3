/*!

A process-wide switch for step tracing (§4.5, §6): when enabled, [`crate::normalize::normalize_with_trace`]
records one [`crate::normalize::StepRecord`] per rewrite step instead of discarding it. The flag itself is
a simple global — tracing is a debugging aid, not part of the rewriting semantics, so it is never
threaded through the `Universe` or any pure function's signature.

*/

use std::sync::atomic::{AtomicBool, Ordering};

static TRACE_ENABLED: AtomicBool = AtomicBool::new(false);

pub fn set_trace(enabled: bool) {
  TRACE_ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn get_trace() -> bool {
  TRACE_ENABLED.load(Ordering::Relaxed)
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Mutex;

  // Tests mutate shared global state, so they must not run concurrently.
  static GUARD: Mutex<()> = Mutex::new(());

  #[test]
  fn toggle_round_trips() {
    let _guard = GUARD.lock().unwrap();
    let before = get_trace();
    set_trace(!before);
    assert_eq!(get_trace(), !before);
    set_trace(before);
  }
}
