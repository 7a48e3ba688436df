// Time Provider Port (for testability)

use std::sync::atomic::{AtomicI64, Ordering};

/// Time provider interface (allows mocking in tests)
pub trait TimeProvider: Send + Sync {
    /// Get current time in milliseconds since epoch
    fn now_millis(&self) -> i64;
}

/// System time provider (production)
pub struct SystemTimeProvider;

impl TimeProvider for SystemTimeProvider {
    fn now_millis(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Clock that advances by a fixed step on every read
pub struct SteppingTimeProvider {
    next: AtomicI64,
    step: i64,
}

impl SteppingTimeProvider {
    pub fn new(start_millis: i64, step: i64) -> Self {
        Self {
            next: AtomicI64::new(start_millis),
            step,
        }
    }
}

impl TimeProvider for SteppingTimeProvider {
    fn now_millis(&self) -> i64 {
        self.next.fetch_add(self.step, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stepping_clock() {
        let clock = SteppingTimeProvider::new(1000, 10);
        assert_eq!(clock.now_millis(), 1000);
        assert_eq!(clock.now_millis(), 1010);
        assert_eq!(clock.now_millis(), 1020);
    }
}
