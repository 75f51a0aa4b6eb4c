//! Time sources for the fake queue
//!
//! The queue reads the current time through [`Clock`] when it records
//! `enqueued_at`, resolves `perform_in` intervals, and snapshots jobs for
//! matching. Tests that assert on scheduled times can swap in a
//! [`FrozenClock`] so intervals resolve deterministically.

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;
use std::sync::Arc;

/// Source of the current time
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
    /// Current time
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock that only moves when told to
///
/// Clones share the same instant, so a test can keep one handle and give
/// another to the queue.
///
/// # Example
///
/// ```rust
/// use acton_job_matchers::clock::{Clock, FrozenClock};
/// use chrono::Duration;
///
/// let clock = FrozenClock::new();
/// let start = clock.now();
///
/// clock.advance(Duration::minutes(3));
/// assert_eq!(clock.now() - start, Duration::minutes(3));
/// ```
#[derive(Debug, Clone)]
pub struct FrozenClock {
    current: Arc<Mutex<DateTime<Utc>>>,
}

impl FrozenClock {
    /// Freeze at the current wall-clock time
    #[must_use]
    pub fn new() -> Self {
        Self::at(Utc::now())
    }

    /// Freeze at `instant`
    #[must_use]
    pub fn at(instant: DateTime<Utc>) -> Self {
        Self {
            current: Arc::new(Mutex::new(instant)),
        }
    }

    /// Move the clock forward by `duration`
    pub fn advance(&self, duration: Duration) {
        *self.current.lock() += duration;
    }

    /// Jump to `instant`
    pub fn set(&self, instant: DateTime<Utc>) {
        *self.current.lock() = instant;
    }
}

impl Default for FrozenClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FrozenClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock()
    }
}
