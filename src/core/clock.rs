//! Monotonic time sources.
//!
//! The game measures two things in time: how long it has been played and
//! when a ban runs out. Both read a `Clock`, which reports the time elapsed
//! since the clock was created.
//!
//! - `SystemClock`: wall-clock monotonic time (`std::time::Instant`).
//! - `TokioClock`: Tokio's clock, which honours paused/advanced test time.
//! - `ManualClock`: moves only when told to; shared between clones.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

/// A monotonic clock.
pub trait Clock: Send + Sync {
    /// Time elapsed since the clock's origin.
    fn now(&self) -> Duration;
}

/// Monotonic system time.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: std::time::Instant,
}

impl SystemClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Tokio time, for games driven by Tokio timers.
///
/// Under `tokio::time::pause` this clock only moves when the runtime's
/// clock is advanced, which keeps ban expiry and timer wake-ups in step.
#[derive(Clone, Copy, Debug)]
pub struct TokioClock {
    origin: tokio::time::Instant,
}

impl TokioClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-driven clock. Clones share the same reading.
///
/// ```
/// use std::time::Duration;
/// use set_engine::core::{Clock, ManualClock};
///
/// let clock = ManualClock::new();
/// let view = clock.clone();
/// clock.advance(Duration::from_secs(2));
/// assert_eq!(view.now(), Duration::from_secs(2));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    now: Arc<Mutex<Duration>>,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        *self.now.lock()
    }
}
