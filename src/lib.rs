//! # logfan
//!
//! Tag-based log fan-out: one `log(tags, message)` call, filtered and
//! dispatched to any number of independently configured reporters.
//!
//! Every log call carries a list of tags and a message (text, structured
//! JSON, or an error). Each registered reporter decides for itself
//! whether the call matters: its own filter and exclude lists, its own
//! throttle window, its own renderer settings. Reporters run in
//! registration order, faults in one never reach the caller or stop the
//! others, and rendered lines leave through a single swappable sink.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use logfan::Logger;
//!
//! # async fn demo() {
//! // One console reporter, stdout sink
//! let logger = Logger::new();
//!
//! logger.log(["info", "server"], "listening on :8080").await;
//! # }
//! ```
//!
//! Or configure reporters explicitly:
//!
//! ```rust,no_run
//! use logfan::{Logger, ReporterOptionsPatch, ReporterSpec};
//! use serde_json::json;
//!
//! # async fn demo() {
//! let logger = Logger::builder()
//!     // Built-in JSON lines, but only for "api" entries
//!     .with_reporter_options(
//!         "api-json",
//!         ReporterSpec::named("json"),
//!         ReporterOptionsPatch::new().with_filter(vec!["api".to_string()]),
//!     )
//!     // A bare rendering callback
//!     .with_reporter(
//!         "short",
//!         ReporterSpec::callback(|_options, tags, message| {
//!             Some(format!("{}: {}", tags.join("/"), message))
//!         }),
//!     )
//!     .build()
//!     .unwrap();
//!
//! logger.log(["api", "debug"], json!({ "route": "/users" })).await;
//! # }
//! ```
//!
//! ## Tags and Filtering
//!
//! A reporter with an empty filter accepts every entry; a non-empty
//! filter requires at least one shared tag. Exclude lists win over
//! filters. The builder-level `with_filter`/`with_exclude` lists are
//! concatenated after each reporter's own, and the `LOGFAN_FILTER` /
//! `LOGFAN_EXCLUDE` environment variables (comma-separated) replace the
//! builder-level lists outright, so `debug` output can be switched on
//! without a redeploy.
//!
//! `with_default_tags` prepends tags to every call before matching, so a
//! service name set once appears everywhere.
//!
//! ## Reporters
//!
//! A reporter is anything implementing [`Reporter`]: a rendering hook
//! returning `Some(line)` to emit, `None` (or an empty string) to stay
//! silent, plus optional `defaults` and `init` hooks. Registration
//! accepts three shapes via [`ReporterSpec`]: a built-in name
//! (`console`, `json`, `cli`), a plain callback, or a full
//! implementation. Re-registering a name replaces the earlier reporter
//! in place, keeping its position in the fan-out order.
//!
//! Asynchronous reporters override `log_async` (or use
//! `ReporterSpec::callback_async`); the engine awaits every reporter
//! uniformly.
//!
//! ## Errors
//!
//! Logging an error captures its display text and cause chain:
//!
//! ```rust,no_run
//! use logfan::{Logger, LogMessage};
//!
//! # async fn demo() {
//! let logger = Logger::new();
//! let err = std::io::Error::new(std::io::ErrorKind::Other, "disk offline");
//!
//! // Reporters receive { message, stack } and the "error" tag
//! logger.log(["db"], LogMessage::error(&err)).await;
//! # }
//! ```
//!
//! Errors carrying a [`ResponseError`] are serialized into
//! `{ message: "Response Error: <code> <text>", statusCode, payload }`
//! instead. The `"error"` tag is appended exactly once; disable it with
//! `with_add_error_tag(false)`. [`error_value`] renders the same record
//! for embedding inside a structured message.
//!
//! ## Redaction
//!
//! Structured messages are walked recursively before any reporter runs;
//! values under keys matching the blacklist pattern (default
//! `password|token`, case-insensitive) are replaced with `xxxxxx`. The
//! caller's own value is never modified.
//!
//! ## Throttling
//!
//! Each reporter can cap its output rate:
//!
//! ```rust,no_run
//! use logfan::{Logger, ReporterOptionsPatch, ReporterSpec, Throttle};
//!
//! let logger = Logger::builder()
//!     .with_reporter_options(
//!         "console",
//!         ReporterSpec::named("console"),
//!         ReporterOptionsPatch::new()
//!             // At most one line per five seconds
//!             .with_throttle(Throttle::Millis(5_000))
//!             // Tracked per tag combination instead of globally
//!             .with_throttle_based_on_tags(true),
//!     )
//!     .build()
//!     .unwrap();
//! ```
//!
//! Suppressed entries are counted in the metrics but otherwise dropped
//! silently. Throttle state is shared by every clone of the logger.
//!
//! ## Per-Call Overrides
//!
//! `log_with` merges an options patch into named reporters before the
//! entry is matched. The patch is sticky: later calls see it too.
//!
//! ```rust,no_run
//! use logfan::{Logger, ReporterOptionsPatch};
//! use std::collections::HashMap;
//!
//! # async fn demo() {
//! let logger = Logger::new();
//! let overrides = HashMap::from([(
//!     "console".to_string(),
//!     ReporterOptionsPatch::new().with_enabled(false),
//! )]);
//!
//! // Silences the console reporter from here on
//! logger.log_with(["noisy"], "suppressed", &overrides).await;
//! # }
//! ```
//!
//! ## Observability
//!
//! ```rust,no_run
//! # use logfan::Logger;
//! # let logger = Logger::new();
//! let metrics = logger.metrics();
//! println!("delivered: {}", metrics.delivered());
//! println!("throttled: {}", metrics.throttled());
//!
//! let snapshot = metrics.snapshot();
//! println!("delivery rate: {:.2}%", snapshot.delivery_rate() * 100.0);
//! ```
//!
//! ## Testing
//!
//! The `test-helpers` feature exposes `MockClock` (deterministic
//! throttle windows) and `CaptureSink` (collects rendered lines) under
//! `infrastructure::mocks`:
//!
//! ```toml
//! [dev-dependencies]
//! logfan = { version = "*", features = ["test-helpers"] }
//! ```

// Domain layer - pure business logic
pub mod domain;

// Application layer - orchestration
pub mod application;

// Infrastructure layer - external adapters
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::{
    message::{error_value, ErrorDetails, LogMessage, ResponseError},
    redact::{Blacklist, DEFAULT_BLACKLIST, REDACTED},
    serialize::{Serializer, ERROR_TAG},
    signature::ThrottleSignature,
    tags::{exclude_match, filter_match, Tags},
};

pub use application::{
    metrics::{DispatchMetrics, DispatchSnapshot},
    ports::{BoxFuture, Clock, Reporter, ReporterError, Sink},
    registry::{ReporterOptions, ReporterOptionsPatch, ReporterSpec, Throttle},
    throttle::{ThrottleDecision, ThrottleGate},
};

pub use infrastructure::{
    clock::SystemClock,
    logger::{ConfigError, Logger, LoggerBuilder, ENV_EXCLUDE, ENV_FILTER},
    reporters::{CliReporter, ConsoleReporter, JsonReporter},
    sink::{FnSink, StdoutSink},
};
