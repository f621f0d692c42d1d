//! Capturing sink for testing.

use crate::application::ports::Sink;
use std::sync::{Arc, Mutex};

/// Sink that records every line instead of printing it.
///
/// Clones share the same buffer, so a test can hand one clone to the
/// logger and keep another for assertions.
///
/// # Examples
///
/// ```
/// use logfan::infrastructure::mocks::CaptureSink;
/// use logfan::application::ports::Sink;
///
/// let sink = CaptureSink::new();
/// sink.write("hello");
///
/// assert_eq!(sink.lines(), vec!["hello".to_string()]);
/// assert_eq!(sink.count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CaptureSink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl CaptureSink {
    /// Create an empty capturing sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything written so far, in write order.
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .expect("CaptureSink mutex poisoned - a test thread panicked while holding the lock")
            .clone()
    }

    /// Number of lines written so far.
    pub fn count(&self) -> usize {
        self.lines
            .lock()
            .expect("CaptureSink mutex poisoned - a test thread panicked while holding the lock")
            .len()
    }

    /// Discard everything captured so far.
    pub fn clear(&self) {
        self.lines
            .lock()
            .expect("CaptureSink mutex poisoned - a test thread panicked while holding the lock")
            .clear();
    }
}

impl Sink for CaptureSink {
    fn write(&self, line: &str) {
        self.lines
            .lock()
            .expect("CaptureSink mutex poisoned - a test thread panicked while holding the lock")
            .push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_sink_records_in_order() {
        let sink = CaptureSink::new();
        sink.write("a");
        sink.write("b");

        assert_eq!(sink.lines(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_clones_share_the_buffer() {
        let sink = CaptureSink::new();
        let clone = sink.clone();

        clone.write("shared");

        assert_eq!(sink.count(), 1);
        sink.clear();
        assert_eq!(clone.count(), 0);
    }
}
