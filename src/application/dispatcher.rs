//! The dispatch engine.
//!
//! Drives one log call through serialization, default-tag prepending,
//! and the per-reporter pipeline: enabled check, filter, exclude,
//! throttle, invocation, and forwarding to the sink. Reporter faults are
//! caught here and reported as sink diagnostics; a fault at one reporter
//! never stops the remaining reporters and never reaches the caller.

use crate::application::metrics::DispatchMetrics;
use crate::application::ports::Sink;
use crate::application::registry::{ReporterEntry, ReporterOptions, ReporterOptionsPatch, ReporterSet};
use crate::application::throttle::ThrottleGate;
use crate::domain::message::LogMessage;
use crate::domain::serialize::Serializer;
use crate::domain::tags::{exclude_match, filter_match, Tags};
use futures::FutureExt;
use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

pub(crate) struct DispatchEngine {
    serializer: Serializer,
    default_tags: Vec<String>,
    reporters: ReporterSet,
    throttle: ThrottleGate,
    sink: Arc<dyn Sink>,
    metrics: DispatchMetrics,
}

impl DispatchEngine {
    pub(crate) fn new(
        serializer: Serializer,
        default_tags: Vec<String>,
        reporters: ReporterSet,
        throttle: ThrottleGate,
        sink: Arc<dyn Sink>,
        metrics: DispatchMetrics,
    ) -> Self {
        DispatchEngine {
            serializer,
            default_tags,
            reporters,
            throttle,
            sink,
            metrics,
        }
    }

    pub(crate) fn metrics(&self) -> &DispatchMetrics {
        &self.metrics
    }

    pub(crate) fn reporters(&self) -> &ReporterSet {
        &self.reporters
    }

    pub(crate) fn sink(&self) -> &Arc<dyn Sink> {
        &self.sink
    }

    /// Dispatch one call to every registered reporter, in registration
    /// order. Completes only after the last callback has completed.
    pub(crate) async fn dispatch(
        &self,
        tags: Tags,
        message: LogMessage,
        overrides: Option<&HashMap<String, ReporterOptionsPatch>>,
    ) {
        let mut tags = tags;
        // Serialize exactly once, before any reporter sees the entry.
        let message = self.serializer.serialize(&mut tags, message);
        if !self.default_tags.is_empty() {
            tags.prepend(&self.default_tags);
        }

        for entry in self.reporters.iter() {
            if let Some(patch) = overrides.and_then(|map| map.get(&entry.name)) {
                // Sticky: merged into the persisted options, so later
                // calls see it too.
                entry.apply_override(patch);
            }
            let options = entry.options();

            if !options.enabled {
                self.metrics.record_disabled();
                continue;
            }
            if !filter_match(&options.filter, tags.as_slice()) {
                self.metrics.record_filtered();
                continue;
            }
            if exclude_match(&options.exclude, tags.as_slice()) {
                self.metrics.record_filtered();
                continue;
            }
            if self
                .throttle
                .check(&entry.name, tags.as_slice(), &options)
                .is_suppress()
            {
                self.metrics.record_throttled();
                continue;
            }

            self.invoke(entry, &options, &tags, &message).await;
        }
    }

    /// Invoke one reporter with its own copy of the entry and forward
    /// the outcome. Both the callback and its future run under panic
    /// protection.
    async fn invoke(
        &self,
        entry: &ReporterEntry,
        options: &ReporterOptions,
        tags: &Tags,
        message: &LogMessage,
    ) {
        let future = panic::catch_unwind(AssertUnwindSafe(|| {
            entry
                .handler
                .log_async(options, tags.to_vec(), message.clone())
        }));
        let future = match future {
            Ok(future) => future,
            Err(payload) => {
                self.report_fault(&entry.name, tags, message, &panic_text(payload.as_ref()));
                return;
            }
        };

        match AssertUnwindSafe(future).catch_unwind().await {
            Ok(Ok(rendered)) => {
                self.metrics.record_delivered();
                // Empty renders emit nothing, matching absent ones.
                if let Some(line) = rendered {
                    if !line.is_empty() {
                        self.sink.write(&line);
                    }
                }
            }
            Ok(Err(fault)) => {
                self.report_fault(&entry.name, tags, message, &fault.to_string());
            }
            Err(payload) => {
                self.report_fault(&entry.name, tags, message, &panic_text(payload.as_ref()));
            }
        }
    }

    fn report_fault(&self, reporter: &str, tags: &Tags, message: &LogMessage, fault: &str) {
        self.metrics.record_faulted();
        self.sink.write(&format!(
            "reporter '{reporter}' failed: {fault}; tags=[{tags}] message={message}"
        ));
    }
}

fn panic_text(payload: &(dyn Any + Send)) -> String {
    if let Some(text) = payload.downcast_ref::<&'static str>() {
        (*text).to_string()
    } else if let Some(text) = payload.downcast_ref::<String>() {
        text.clone()
    } else {
        "unknown panic".to_string()
    }
}
