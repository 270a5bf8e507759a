//! Clock adapter.
//!
//! `SystemClock` stamps occurrences in production. Tests use `MockClock`
//! from `crate::infrastructure::mocks` to control first/last-seen times.

use crate::application::ports::Clock;
use std::time::Instant;

/// Monotonic clock backed by `Instant::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    /// Create a new system clock.
    pub fn new() -> Self {
        Self
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
