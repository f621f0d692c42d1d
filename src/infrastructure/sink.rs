//! Sink adapters for rendered output.
//!
//! Every reporter line and every fault diagnostic leaves the engine
//! through one [`Sink`]. Production loggers write to stdout; tests swap
//! in `CaptureSink` (in `crate::infrastructure::mocks`) to assert on
//! output without touching the terminal.

use crate::application::ports::Sink;
use std::fmt;

/// Sink writing each line to standard output.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl StdoutSink {
    /// Create a new stdout sink.
    pub fn new() -> Self {
        Self
    }
}

impl Sink for StdoutSink {
    fn write(&self, line: &str) {
        println!("{line}");
    }
}

/// Sink delegating each line to a caller-supplied function.
///
/// Useful for forwarding rendered output into an existing logging setup
/// or a network shipper without implementing [`Sink`] by hand.
pub struct FnSink<F> {
    callback: F,
}

impl<F> FnSink<F>
where
    F: Fn(&str) + Send + Sync,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> Sink for FnSink<F>
where
    F: Fn(&str) + Send + Sync,
{
    fn write(&self, line: &str) {
        (self.callback)(line);
    }
}

impl<F> fmt::Debug for FnSink<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnSink").field("callback", &"<fn>").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_fn_sink_forwards_lines() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let captured = seen.clone();
        let sink = FnSink::new(move |line: &str| {
            captured.lock().unwrap().push(line.to_string());
        });

        sink.write("first");
        sink.write("second");

        assert_eq!(
            *seen.lock().unwrap(),
            vec!["first".to_string(), "second".to_string()]
        );
    }
}
