//! Mock clock for testing.

use crate::application::ports::Clock;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock clock for testing.
///
/// Allows tests to control time progression explicitly, enabling
/// deterministic testing of throttle windows. Time is a plain
/// milliseconds-since-epoch counter starting at zero.
///
/// # Examples
///
/// ```
/// use logfan::infrastructure::mocks::MockClock;
/// use logfan::application::ports::Clock;
/// use std::time::Duration;
///
/// let clock = MockClock::new();
/// assert_eq!(clock.now(), 0);
///
/// // Advance time explicitly
/// clock.advance(Duration::from_secs(10));
/// assert_eq!(clock.now(), 10_000);
///
/// // Or set an absolute reading
/// clock.set(42);
/// assert_eq!(clock.now(), 42);
/// ```
///
/// # Thread Safety
///
/// `MockClock` is thread-safe and can be cloned to share across threads.
/// All clones share the same underlying time value, so advancing time in
/// one clone affects all clones.
#[derive(Debug, Clone, Default)]
pub struct MockClock {
    current_millis: Arc<Mutex<u64>>,
}

impl MockClock {
    /// Create a mock clock starting at zero milliseconds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock clock starting at a specific reading.
    pub fn starting_at(millis: u64) -> Self {
        Self {
            current_millis: Arc::new(Mutex::new(millis)),
        }
    }

    /// Advance the clock by a duration.
    pub fn advance(&self, duration: Duration) {
        let mut millis = self
            .current_millis
            .lock()
            .expect("MockClock mutex poisoned - a test thread panicked while holding the lock");
        *millis += duration.as_millis() as u64;
    }

    /// Set the clock to an absolute reading.
    pub fn set(&self, millis: u64) {
        let mut current = self
            .current_millis
            .lock()
            .expect("MockClock mutex poisoned - a test thread panicked while holding the lock");
        *current = millis;
    }
}

impl Clock for MockClock {
    fn now(&self) -> u64 {
        *self
            .current_millis
            .lock()
            .expect("MockClock mutex poisoned - a test thread panicked while holding the lock")
    }
}
