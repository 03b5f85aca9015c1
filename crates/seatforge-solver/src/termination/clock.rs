//! Injectable wall-clock access.

use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Monotonic time source measured from an arbitrary origin.
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> Duration;
}

/// Real time, measured from the clock's creation.
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
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

/// Simulated time for tests.
///
/// Time only moves through [`advance`](ManualClock::advance) or by a fixed
/// step on every read.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use seatforge_solver::termination::{Clock, ManualClock};
///
/// let clock = ManualClock::new().with_tick(Duration::from_millis(10));
/// assert_eq!(clock.now(), Duration::from_millis(10));
/// clock.advance(Duration::from_secs(1));
/// assert_eq!(clock.now(), Duration::from_millis(1020));
/// ```
#[derive(Debug, Default)]
pub struct ManualClock {
    nanos: AtomicU64,
    tick_nanos: u64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the clock by `tick` on every read.
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick_nanos = tick.as_nanos() as u64;
        self
    }

    pub fn advance(&self, by: Duration) {
        self.nanos
            .fetch_add(by.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        let nanos = self.nanos.fetch_add(self.tick_nanos, Ordering::SeqCst) + self.tick_nanos;
        Duration::from_nanos(nanos)
    }
}
