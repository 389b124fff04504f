//! Clock abstraction so time-dependent code (discovery pacing, retry
//! backoff) can run against virtual time in tests.

use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// Clock trait for time abstraction
pub trait Clock: Send + Sync {
    /// Get the current time
    fn now(&self) -> Instant;

    /// Sleep for the specified duration
    fn sleep(&self, duration: Duration);
}

/// Real-time clock implementation
#[derive(Default)]
pub struct RealClock;

impl RealClock {
    pub fn new() -> Self {
        Self
    }
}

impl Clock for RealClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Virtual clock for deterministic testing. `sleep` advances virtual time
/// instead of blocking, and the total slept duration is observable.
pub struct TestClock {
    state: Mutex<TestClockState>,
}

struct TestClockState {
    current: Instant,
    slept: Duration,
}

impl Default for TestClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TestClock {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(TestClockState {
                current: Instant::now(),
                slept: Duration::ZERO,
            }),
        }
    }

    /// Manually advance virtual time
    pub fn advance(&self, duration: Duration) {
        let mut state = self.state.lock();
        state.current += duration;
    }

    /// Total virtual time spent in `sleep` calls
    pub fn total_slept(&self) -> Duration {
        self.state.lock().slept
    }
}

impl Clock for TestClock {
    fn now(&self) -> Instant {
        self.state.lock().current
    }

    fn sleep(&self, duration: Duration) {
        let mut state = self.state.lock();
        state.current += duration;
        state.slept += duration;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_sleep_is_virtual() {
        let clock = TestClock::new();
        let before = clock.now();
        clock.sleep(Duration::from_secs(3600));
        assert_eq!(clock.now() - before, Duration::from_secs(3600));
        assert_eq!(clock.total_slept(), Duration::from_secs(3600));
    }

    #[test]
    fn test_clock_advance_does_not_count_as_sleep() {
        let clock = TestClock::new();
        clock.advance(Duration::from_secs(5));
        assert_eq!(clock.total_slept(), Duration::ZERO);
    }
}
