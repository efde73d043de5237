//! Time source for the scan-cycle wait
//!
//! [`MonotonicClock`] is the production clock: one computed sleep until the
//! deadline, never a polling loop. [`ManualClock`] only moves when told to,
//! which makes the scan timing observable in tests and the simulator.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

pub trait Clock {
    fn now(&self) -> Instant;

    /// Block the caller until `deadline`; returns immediately if it has passed
    fn sleep_until(&self, deadline: Instant);
}

/// Wall-independent clock backed by `std::time::Instant`
#[derive(Debug, Clone, Copy, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep_until(&self, deadline: Instant) {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if !remaining.is_zero() {
            thread::sleep(remaining);
        }
    }
}

/// Virtual clock; sleeping jumps straight to the deadline
///
/// Clones share the same time, so a test can keep one handle while the
/// scanner owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<Instant>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Arc::new(Mutex::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock()
    }

    fn sleep_until(&self, deadline: Instant) {
        let mut now = self.now.lock();
        if deadline > *now {
            *now = deadline;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_jumps_to_deadline() {
        let clock = ManualClock::new();
        let start = clock.now();
        clock.sleep_until(start + Duration::from_secs(3));
        assert_eq!(clock.now() - start, Duration::from_secs(3));
    }

    #[test]
    fn test_manual_clock_ignores_past_deadline() {
        let clock = ManualClock::new();
        let start = clock.now();
        clock.advance(Duration::from_secs(5));
        clock.sleep_until(start + Duration::from_secs(1));
        assert_eq!(clock.now() - start, Duration::from_secs(5));
    }

    #[test]
    fn test_manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let handle = clock.clone();
        let start = handle.now();
        clock.advance(Duration::from_millis(750));
        assert_eq!(handle.now() - start, Duration::from_millis(750));
    }

    #[test]
    fn test_monotonic_clock_waits_for_deadline() {
        let clock = MonotonicClock;
        let deadline = clock.now() + Duration::from_millis(20);
        clock.sleep_until(deadline);
        assert!(clock.now() >= deadline);
    }
}
