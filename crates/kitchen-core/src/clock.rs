//! Wall-clock source for order timestamps and ids

use parking_lot::Mutex;
use std::sync::Arc;

/// Source of the current wall-clock time
pub trait Clock: Send + Sync {
    /// Current unix time in milliseconds
    fn now_millis(&self) -> i64;

    /// Current unix time in seconds
    fn now_secs(&self) -> i64 {
        self.now_millis().div_euclid(1000)
    }
}

/// System time via `chrono`
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Manually driven clock for tests and replays
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    millis: Arc<Mutex<i64>>,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self {
            millis: Arc::new(Mutex::new(start_millis)),
        }
    }

    pub fn set_millis(&self, millis: i64) {
        *self.millis.lock() = millis;
    }

    pub fn advance_secs(&self, secs: i64) {
        *self.millis.lock() += secs * 1000;
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        *self.millis.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock() {
        let clock = ManualClock::new(1_500);
        assert_eq!(clock.now_secs(), 1);

        clock.advance_secs(10);
        assert_eq!(clock.now_millis(), 11_500);

        let shared = clock.clone();
        shared.set_millis(42_000);
        assert_eq!(clock.now_secs(), 42);
    }

    #[test]
    fn test_system_clock_is_recent() {
        // 2023-11-14 in unix seconds
        assert!(SystemClock.now_secs() > 1_700_000_000);
    }
}
