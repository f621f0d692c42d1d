//! Dispatch metrics.
//!
//! Counts what happened to entries at each reporter, for monitoring and
//! for tests that assert on dispatch behavior without a capture sink.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Metrics tracking dispatch outcomes.
///
/// All counters use atomic operations for thread-safe updates and reads,
/// and are recorded per reporter per call: one log call fanning out to
/// three reporters moves three counters.
#[derive(Debug, Clone)]
pub struct DispatchMetrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug)]
struct MetricsInner {
    /// Entries a reporter's callback completed for (whether or not it
    /// produced an output line)
    delivered: AtomicU64,
    /// Entries skipped by a filter or exclude list
    filtered: AtomicU64,
    /// Entries suppressed inside a throttle window
    throttled: AtomicU64,
    /// Callback faults (errors and panics)
    faulted: AtomicU64,
    /// Entries skipped because the reporter was disabled
    disabled: AtomicU64,
}

impl DispatchMetrics {
    pub fn new() -> Self {
        DispatchMetrics {
            inner: Arc::new(MetricsInner {
                delivered: AtomicU64::new(0),
                filtered: AtomicU64::new(0),
                throttled: AtomicU64::new(0),
                faulted: AtomicU64::new(0),
                disabled: AtomicU64::new(0),
            }),
        }
    }

    pub(crate) fn record_delivered(&self) {
        self.inner.delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_filtered(&self) {
        self.inner.filtered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_throttled(&self) {
        self.inner.throttled.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_faulted(&self) {
        self.inner.faulted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_disabled(&self) {
        self.inner.disabled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn delivered(&self) -> u64 {
        self.inner.delivered.load(Ordering::Relaxed)
    }

    pub fn filtered(&self) -> u64 {
        self.inner.filtered.load(Ordering::Relaxed)
    }

    pub fn throttled(&self) -> u64 {
        self.inner.throttled.load(Ordering::Relaxed)
    }

    pub fn faulted(&self) -> u64 {
        self.inner.faulted.load(Ordering::Relaxed)
    }

    pub fn disabled(&self) -> u64 {
        self.inner.disabled.load(Ordering::Relaxed)
    }

    /// Get a point-in-time snapshot of all counters.
    pub fn snapshot(&self) -> DispatchSnapshot {
        DispatchSnapshot {
            delivered: self.delivered(),
            filtered: self.filtered(),
            throttled: self.throttled(),
            faulted: self.faulted(),
            disabled: self.disabled(),
        }
    }

    /// Reset all counters to zero.
    ///
    /// Useful for testing or when starting a new monitoring period.
    pub fn reset(&self) {
        self.inner.delivered.store(0, Ordering::Relaxed);
        self.inner.filtered.store(0, Ordering::Relaxed);
        self.inner.throttled.store(0, Ordering::Relaxed);
        self.inner.faulted.store(0, Ordering::Relaxed);
        self.inner.disabled.store(0, Ordering::Relaxed);
    }
}

impl Default for DispatchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of dispatch metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DispatchSnapshot {
    pub delivered: u64,
    pub filtered: u64,
    pub throttled: u64,
    pub faulted: u64,
    pub disabled: u64,
}

impl DispatchSnapshot {
    /// Total reporter decisions recorded.
    pub fn total(&self) -> u64 {
        self.delivered
            .saturating_add(self.filtered)
            .saturating_add(self.throttled)
            .saturating_add(self.faulted)
            .saturating_add(self.disabled)
    }

    /// Ratio of delivered entries to total decisions (0.0 to 1.0).
    ///
    /// Returns 0.0 when nothing has been dispatched.
    pub fn delivery_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.delivered as f64 / total as f64
        }
    }
}
