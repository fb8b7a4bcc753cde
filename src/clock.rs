//! Time source collaborator.
//!
//! The core never calls `SystemTime::now()` directly so that timestamp
//! boundary tests (`time-too-new`, `time-too-old`) can be deterministic.

use std::time::{SystemTime, UNIX_EPOCH};

/// Seconds-since-epoch time source, injected into [`crate::validator`] and
/// [`crate::engine::ChainEngine`].
pub trait Clock {
    /// Current time, in seconds since the Unix epoch.
    fn now(&self) -> i64;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock is before the Unix epoch")
            .as_secs() as i64
    }
}

#[cfg(test)]
/// A fixed-value clock for deterministic boundary tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

#[cfg(test)]
impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.0
    }
}
