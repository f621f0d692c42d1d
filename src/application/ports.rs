//! Ports (trait interfaces) for the dispatch pipeline.
//!
//! These traits define the boundaries of the engine: where time comes
//! from, where rendered lines go, and what a reporter looks like.
//! Infrastructure adapters and caller code implement them.

use crate::application::registry::{ReporterOptions, ReporterOptionsPatch};
use crate::domain::message::LogMessage;
use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by the asynchronous reporter hook.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The error type reporters may fail with.
///
/// Faults are caught by the engine, reported through the sink, and never
/// reach the caller of `log`.
pub type ReporterError = Box<dyn std::error::Error + Send + Sync>;

/// Wall-clock time source.
///
/// Throttle windows compare wall-clock timestamps; monotonicity beyond
/// that is not required. Tests substitute a controllable mock.
pub trait Clock: Send + Sync + Debug {
    /// Milliseconds since the Unix epoch.
    fn now(&self) -> u64;
}

/// Final output boundary.
///
/// Receives every rendered line a reporter produces, plus engine
/// diagnostics for reporter faults and the optional startup summary.
pub trait Sink: Send + Sync + Debug {
    fn write(&self, line: &str);
}

/// A log reporter: renders the entries it receives into output lines.
///
/// `log` is the synchronous rendering hook. Reporters doing async work
/// override [`Reporter::log_async`] instead; the engine only ever awaits
/// `log_async`, whose default implementation wraps `log`, so synchronous
/// results are trivially complete.
///
/// Reporters receive an owned copy of the tags and message and are free
/// to mutate them; siblings never observe those mutations.
pub trait Reporter: Send + Sync {
    /// Option defaults declared by the reporter, merged beneath
    /// registration-site options.
    fn defaults(&self) -> ReporterOptionsPatch {
        ReporterOptionsPatch::default()
    }

    /// One-time setup hook, run at registration when the reporter is
    /// enabled. A failure here is a fatal configuration error, not a
    /// dispatch-time fault.
    fn init(&self, options: &ReporterOptions) -> Result<(), ReporterError> {
        let _ = options;
        Ok(())
    }

    /// Render an entry. `Ok(None)` (and an empty string) emit nothing.
    fn log(
        &self,
        options: &ReporterOptions,
        tags: Vec<String>,
        message: LogMessage,
    ) -> Result<Option<String>, ReporterError>;

    /// Asynchronous rendering hook; the default wraps [`Reporter::log`].
    fn log_async<'a>(
        &'a self,
        options: &'a ReporterOptions,
        tags: Vec<String>,
        message: LogMessage,
    ) -> BoxFuture<'a, Result<Option<String>, ReporterError>> {
        Box::pin(async move { self.log(options, tags, message) })
    }
}
