//! Windowed emission throttling.
//!
//! Each reporter may cap how often it emits: at most one emission per
//! window, either shared across all entries or split per tag signature.
//! State is the timestamp of the last allowed emission, kept per
//! reporter and throttle key.

use crate::application::ports::Clock;
use crate::application::registry::{ReporterOptions, Throttle};
use crate::domain::signature::ThrottleSignature;
use ahash::RandomState;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

/// Decision for one entry at one reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    /// Emit, and the window just restarted.
    Allow,
    /// Inside an open window; emit nothing.
    Suppress,
}

impl ThrottleDecision {
    pub fn is_allow(&self) -> bool {
        matches!(self, ThrottleDecision::Allow)
    }

    pub fn is_suppress(&self) -> bool {
        matches!(self, ThrottleDecision::Suppress)
    }
}

/// Tracks the last allowed emission per reporter and throttle key.
///
/// The decision and the timestamp update happen under a single map
/// entry, so two concurrent calls can never both claim the same window.
#[derive(Debug)]
pub struct ThrottleGate {
    clock: Arc<dyn Clock>,
    last_emit: DashMap<(String, ThrottleSignature), u64, RandomState>,
}

impl ThrottleGate {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        ThrottleGate {
            clock,
            last_emit: DashMap::with_hasher(RandomState::new()),
        }
    }

    /// Decide whether this entry may emit at `reporter`, recording the
    /// emission timestamp when it may.
    ///
    /// With `throttle` off the gate always allows and records nothing.
    /// Otherwise an entry is suppressed while `now - last_emit` is
    /// smaller than the window for its key. Wall-clock regressions are
    /// treated as an elapsed time of zero, which keeps the window
    /// closed rather than panicking or emitting bursts.
    pub fn check(
        &self,
        reporter: &str,
        tags: &[String],
        options: &ReporterOptions,
    ) -> ThrottleDecision {
        let window = match options.throttle.window() {
            Some(window) => window,
            None => return ThrottleDecision::Allow,
        };
        let signature = ThrottleSignature::for_entry(options.throttle_based_on_tags, tags);
        let now = self.clock.now();

        match self.last_emit.entry((reporter.to_string(), signature)) {
            Entry::Occupied(mut last) => {
                if now.saturating_sub(*last.get()) < window {
                    ThrottleDecision::Suppress
                } else {
                    last.insert(now);
                    ThrottleDecision::Allow
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(now);
                ThrottleDecision::Allow
            }
        }
    }

    /// Forget all window state.
    pub fn reset(&self) {
        self.last_emit.clear();
    }

    /// Number of throttle keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.last_emit.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mocks::MockClock;
    use std::time::Duration;

    fn throttled(window_ms: u64, based_on_tags: bool) -> ReporterOptions {
        let mut options = ReporterOptions::default();
        options.throttle = Throttle::Millis(window_ms);
        options.throttle_based_on_tags = based_on_tags;
        options
    }

    fn strings(tags: &[&str]) -> Vec<String> {
        tags.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_off_never_suppresses_and_records_nothing() {
        let gate = ThrottleGate::new(Arc::new(MockClock::new()));
        let options = ReporterOptions::default();

        for _ in 0..10 {
            assert!(gate.check("console", &[], &options).is_allow());
        }
        assert_eq!(gate.tracked_keys(), 0);
    }

    #[test]
    fn test_window_suppresses_until_elapsed() {
        let clock = Arc::new(MockClock::new());
        let gate = ThrottleGate::new(clock.clone());
        let options = throttled(1000, false);

        assert!(gate.check("console", &[], &options).is_allow());
        assert!(gate.check("console", &[], &options).is_suppress());

        clock.advance(Duration::from_millis(999));
        assert!(gate.check("console", &[], &options).is_suppress());

        clock.advance(Duration::from_millis(1));
        assert!(gate.check("console", &[], &options).is_allow());
    }

    #[test]
    fn test_canonical_three_bursts() {
        // 3 calls at t=0, 3 at t=500, 3 at t=1500 with a 1000ms window:
        // exactly two allowed.
        let clock = Arc::new(MockClock::new());
        let gate = ThrottleGate::new(clock.clone());
        let options = throttled(1000, false);

        let mut allowed = 0;
        for _ in 0..3 {
            if gate.check("r", &[], &options).is_allow() {
                allowed += 1;
            }
        }
        clock.advance(Duration::from_millis(500));
        for _ in 0..3 {
            if gate.check("r", &[], &options).is_allow() {
                allowed += 1;
            }
        }
        clock.advance(Duration::from_millis(1000));
        for _ in 0..3 {
            if gate.check("r", &[], &options).is_allow() {
                allowed += 1;
            }
        }

        assert_eq!(allowed, 2);
    }

    #[test]
    fn test_tag_signatures_throttle_independently() {
        let clock = Arc::new(MockClock::new());
        let gate = ThrottleGate::new(clock);
        let options = throttled(1000, true);

        assert!(gate.check("r", &strings(&["a"]), &options).is_allow());
        assert!(gate.check("r", &strings(&["b"]), &options).is_allow());
        assert!(gate.check("r", &strings(&["a"]), &options).is_suppress());
        assert!(gate.check("r", &strings(&["b"]), &options).is_suppress());
        assert_eq!(gate.tracked_keys(), 2);
    }

    #[test]
    fn test_ignoring_tags_shares_one_window() {
        let clock = Arc::new(MockClock::new());
        let gate = ThrottleGate::new(clock);
        let options = throttled(1000, false);

        assert!(gate.check("r", &strings(&["a"]), &options).is_allow());
        assert!(gate.check("r", &strings(&["b"]), &options).is_suppress());
        assert_eq!(gate.tracked_keys(), 1);
    }

    #[test]
    fn test_reporters_do_not_share_windows() {
        let clock = Arc::new(MockClock::new());
        let gate = ThrottleGate::new(clock);
        let options = throttled(1000, false);

        assert!(gate.check("first", &[], &options).is_allow());
        assert!(gate.check("second", &[], &options).is_allow());
        assert!(gate.check("first", &[], &options).is_suppress());
    }

    #[test]
    fn test_clock_regression_keeps_window_closed() {
        let clock = Arc::new(MockClock::new());
        clock.set(5000);
        let gate = ThrottleGate::new(clock.clone());
        let options = throttled(1000, false);

        assert!(gate.check("r", &[], &options).is_allow());
        clock.set(4000);
        assert!(gate.check("r", &[], &options).is_suppress());
    }

    #[test]
    fn test_reset_forgets_windows() {
        let clock = Arc::new(MockClock::new());
        let gate = ThrottleGate::new(clock);
        let options = throttled(1000, false);

        assert!(gate.check("r", &[], &options).is_allow());
        gate.reset();
        assert!(gate.check("r", &[], &options).is_allow());
    }
}
