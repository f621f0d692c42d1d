//! Logger assembly.
//!
//! Provides the [`Logger`] facade and its builder: reporter
//! registration, option resolution, environment overrides, and the
//! wiring of clock, sink, serializer, and throttle into one dispatch
//! engine.

use crate::application::dispatcher::DispatchEngine;
use crate::application::metrics::DispatchMetrics;
use crate::application::ports::{Clock, Sink};
use crate::application::registry::{
    resolve_options, ReporterEntry, ReporterOptionsPatch, ReporterSet, ReporterSpec,
};
use crate::application::throttle::ThrottleGate;
use crate::domain::message::LogMessage;
use crate::domain::redact::{Blacklist, DEFAULT_BLACKLIST};
use crate::domain::serialize::Serializer;
use crate::domain::tags::Tags;
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::reporters;
use crate::infrastructure::sink::StdoutSink;
use std::collections::HashMap;
use std::sync::Arc;

/// Environment variable replacing the global filter list when set.
///
/// Comma-separated tags; an empty value is ignored.
pub const ENV_FILTER: &str = "LOGFAN_FILTER";

/// Environment variable replacing the global exclude list when set.
pub const ENV_EXCLUDE: &str = "LOGFAN_EXCLUDE";

/// Error returned when building a [`Logger`] fails.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A reporter was registered under an empty name
    EmptyReporterName,
    /// A named reporter does not exist in the built-in table
    UnknownReporter {
        /// The name that failed to resolve
        name: String,
    },
    /// The blacklist pattern did not compile
    InvalidBlacklist(regex::Error),
    /// A reporter's `init` hook failed
    ReporterInit {
        /// The reporter that failed
        name: String,
        /// The failure, rendered
        reason: String,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::EmptyReporterName => {
                write!(f, "reporter name must not be empty")
            }
            ConfigError::UnknownReporter { name } => {
                write!(
                    f,
                    "unknown built-in reporter '{name}' (known: console, json, cli)"
                )
            }
            ConfigError::InvalidBlacklist(e) => {
                write!(f, "blacklist pattern error: {e}")
            }
            ConfigError::ReporterInit { name, reason } => {
                write!(f, "reporter '{name}' failed to initialize: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidBlacklist(e) => Some(e),
            _ => None,
        }
    }
}

impl From<regex::Error> for ConfigError {
    fn from(e: regex::Error) -> Self {
        ConfigError::InvalidBlacklist(e)
    }
}

/// Builder for constructing a [`Logger`].
pub struct LoggerBuilder {
    reporters: Vec<(String, ReporterSpec, ReporterOptionsPatch)>,
    reporter_defaults: ReporterOptionsPatch,
    filter: Vec<String>,
    exclude: Vec<String>,
    default_tags: Vec<String>,
    blacklist: String,
    add_error_tag: bool,
    init_log: bool,
    clock: Option<Arc<dyn Clock>>,
    sink: Option<Arc<dyn Sink>>,
}

impl LoggerBuilder {
    /// Register a reporter under a name, with no registration-site
    /// options. Re-registering a name replaces the earlier reporter in
    /// place, keeping its position in the fan-out order.
    pub fn with_reporter(self, name: impl Into<String>, spec: ReporterSpec) -> Self {
        self.with_reporter_options(name, spec, ReporterOptionsPatch::default())
    }

    /// Register a reporter with registration-site options.
    ///
    /// The options overlay the reporter's own defaults; the global
    /// filter/exclude lists are concatenated after the reporter's own at
    /// build time.
    pub fn with_reporter_options(
        mut self,
        name: impl Into<String>,
        spec: ReporterSpec,
        options: ReporterOptionsPatch,
    ) -> Self {
        self.reporters.push((name.into(), spec, options));
        self
    }

    /// Set a defaults patch applied to every reporter, below each
    /// reporter's own defaults.
    pub fn with_reporter_defaults(mut self, defaults: ReporterOptionsPatch) -> Self {
        self.reporter_defaults = defaults;
        self
    }

    /// Set the global filter list, concatenated after each reporter's
    /// own filter. Overridden by the `LOGFAN_FILTER` environment
    /// variable when that is set.
    pub fn with_filter(mut self, filter: Vec<String>) -> Self {
        self.filter = filter;
        self
    }

    /// Set the global exclude list. Overridden by the `LOGFAN_EXCLUDE`
    /// environment variable when that is set.
    pub fn with_exclude(mut self, exclude: Vec<String>) -> Self {
        self.exclude = exclude;
        self
    }

    /// Tags prepended to every log call, before per-reporter matching.
    pub fn with_default_tags(mut self, tags: Vec<String>) -> Self {
        self.default_tags = tags;
        self
    }

    /// Set the key blacklist pattern for structured-message redaction.
    ///
    /// Matched case-insensitively against object keys; matching keys
    /// have their values replaced before any reporter runs. The pattern
    /// will be validated when `build()` is called.
    ///
    /// Default: `password|token`
    pub fn with_blacklist(mut self, pattern: impl Into<String>) -> Self {
        self.blacklist = pattern.into();
        self
    }

    /// Control whether logging an error appends the `"error"` tag.
    ///
    /// Default: `true`
    pub fn with_add_error_tag(mut self, add: bool) -> Self {
        self.add_error_tag = add;
        self
    }

    /// Emit one startup line summarizing enabled reporters and their
    /// filters when the logger is built.
    ///
    /// Default: `false`
    pub fn with_init_log(mut self, init_log: bool) -> Self {
        self.init_log = init_log;
        self
    }

    /// Set a custom clock (mainly for testing).
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Set the sink receiving rendered lines and fault diagnostics.
    ///
    /// Default: stdout.
    pub fn with_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Build the logger.
    ///
    /// Resolves named reporters against the built-in table, merges each
    /// reporter's options, runs enabled reporters' `init` hooks, and
    /// applies environment overrides.
    ///
    /// # Errors
    /// Returns `ConfigError` if the configuration is invalid or a
    /// reporter fails to initialize.
    pub fn build(self) -> Result<Logger, ConfigError> {
        let filter = env_tag_list(ENV_FILTER).unwrap_or(self.filter);
        let exclude = env_tag_list(ENV_EXCLUDE).unwrap_or(self.exclude);
        let blacklist = Blacklist::new(&self.blacklist)?;

        // An unconfigured logger still logs: one console reporter.
        let mut registrations = self.reporters;
        if registrations.is_empty() {
            registrations.push((
                "console".to_string(),
                ReporterSpec::named("console"),
                ReporterOptionsPatch::default(),
            ));
        }

        let mut set = ReporterSet::new();
        for (name, spec, registration) in registrations {
            if name.is_empty() {
                return Err(ConfigError::EmptyReporterName);
            }
            let handler = match spec {
                ReporterSpec::Named(builtin) => reporters::built_in(&builtin)
                    .ok_or(ConfigError::UnknownReporter { name: builtin })?,
                ReporterSpec::Handler(handler) => handler,
            };
            let options = resolve_options(
                &self.reporter_defaults,
                &handler.defaults(),
                &registration,
                &filter,
                &exclude,
            );
            if options.enabled {
                handler
                    .init(&options)
                    .map_err(|e| ConfigError::ReporterInit {
                        name: name.clone(),
                        reason: e.to_string(),
                    })?;
            }
            set.insert(ReporterEntry::new(name, handler, options));
        }

        let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock::new()));
        let sink = self.sink.unwrap_or_else(|| Arc::new(StdoutSink::new()));

        if self.init_log {
            sink.write(&startup_line(&set));
        }

        let engine = DispatchEngine::new(
            Serializer::new(blacklist, self.add_error_tag),
            self.default_tags,
            set,
            ThrottleGate::new(clock),
            sink,
            DispatchMetrics::new(),
        );

        Ok(Logger {
            engine: Arc::new(engine),
        })
    }
}

fn env_tag_list(var: &str) -> Option<Vec<String>> {
    std::env::var(var)
        .ok()
        .filter(|raw| !raw.is_empty())
        .map(|raw| {
            raw.split(',')
                .filter(|tag| !tag.is_empty())
                .map(str::to_string)
                .collect()
        })
}

fn startup_line(set: &ReporterSet) -> String {
    let enabled: Vec<String> = set
        .iter()
        .filter(|entry| entry.options().enabled)
        .map(|entry| {
            let options = entry.options();
            if options.filter.is_empty() {
                entry.name.clone()
            } else {
                format!("{} (filter: {})", entry.name, options.filter.join(","))
            }
        })
        .collect();
    if enabled.is_empty() {
        "logger initialized with no enabled reporters".to_string()
    } else {
        format!("logger initialized with reporters: {}", enabled.join(", "))
    }
}

/// The logging facade: one `log` call fans out to every reporter.
///
/// Cloning is cheap and every clone shares the same reporters, throttle
/// state, and metrics.
#[derive(Clone)]
pub struct Logger {
    engine: Arc<DispatchEngine>,
}

impl Logger {
    /// Create a builder for configuring the logger.
    ///
    /// Defaults:
    /// - Reporters: one `console` reporter (when none are registered)
    /// - Blacklist: `password|token`
    /// - Error tag: appended to error messages
    /// - Sink: stdout
    /// - Startup line: disabled
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder {
            reporters: Vec::new(),
            reporter_defaults: ReporterOptionsPatch::default(),
            filter: Vec::new(),
            exclude: Vec::new(),
            default_tags: Vec::new(),
            blacklist: DEFAULT_BLACKLIST.to_string(),
            add_error_tag: true,
            init_log: false,
            clock: None,
            sink: None,
        }
    }

    /// Create a logger with default settings.
    ///
    /// Equivalent to `Logger::builder().build().unwrap()`.
    ///
    /// # Panics
    /// This method cannot panic because all default values are valid.
    pub fn new() -> Self {
        Self::builder()
            .build()
            .expect("default configuration is always valid")
    }

    /// Log a message under a set of tags.
    ///
    /// Completes after every reporter has run; reporter faults are
    /// reported to the sink, never to the caller. Spawn the returned
    /// future to fan out in the background instead.
    pub async fn log(&self, tags: impl Into<Tags>, message: impl Into<LogMessage>) {
        self.engine.dispatch(tags.into(), message.into(), None).await;
    }

    /// Log a message with no tags of its own.
    ///
    /// Behaves exactly like `log` with an empty tag list: default tags
    /// still apply, and serialization may still append the error tag.
    pub async fn log_message(&self, message: impl Into<LogMessage>) {
        self.engine
            .dispatch(Tags::empty(), message.into(), None)
            .await;
    }

    /// Log with per-reporter option overrides.
    ///
    /// Each patch is merged into the named reporter's options before any
    /// check runs, and stays merged for subsequent calls.
    pub async fn log_with(
        &self,
        tags: impl Into<Tags>,
        message: impl Into<LogMessage>,
        overrides: &HashMap<String, ReporterOptionsPatch>,
    ) {
        self.engine
            .dispatch(tags.into(), message.into(), Some(overrides))
            .await;
    }

    /// Dispatch counters shared by every clone of this logger.
    pub fn metrics(&self) -> DispatchMetrics {
        self.engine.metrics().clone()
    }

    /// Registered reporter names, in fan-out order.
    pub fn reporter_names(&self) -> Vec<String> {
        self.engine.reporters().names()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("reporters", &self.reporter_names())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::mocks::CaptureSink;
    use futures::executor::block_on;

    #[test]
    fn test_default_logger_has_a_console_reporter() {
        let logger = Logger::new();
        assert_eq!(logger.reporter_names(), vec!["console".to_string()]);
    }

    #[test]
    fn test_unknown_named_reporter_fails() {
        let result = Logger::builder()
            .with_reporter("syslog", ReporterSpec::named("syslog"))
            .build();

        assert_eq!(
            result.err(),
            Some(ConfigError::UnknownReporter {
                name: "syslog".to_string()
            })
        );
    }

    #[test]
    fn test_empty_reporter_name_fails() {
        let result = Logger::builder()
            .with_reporter("", ReporterSpec::named("console"))
            .build();

        assert_eq!(result.err(), Some(ConfigError::EmptyReporterName));
    }

    #[test]
    fn test_invalid_blacklist_fails() {
        let result = Logger::builder().with_blacklist("password|(").build();

        assert!(matches!(result, Err(ConfigError::InvalidBlacklist(_))));
    }

    #[test]
    fn test_init_runs_once_for_enabled_reporters() {
        use crate::application::ports::{Reporter, ReporterError};
        use crate::application::registry::ReporterOptions;
        use std::sync::atomic::{AtomicUsize, Ordering};

        #[derive(Debug, Default)]
        struct CountingInit(Arc<AtomicUsize>);

        impl Reporter for CountingInit {
            fn init(&self, _options: &ReporterOptions) -> Result<(), ReporterError> {
                self.0.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }

            fn log(
                &self,
                _options: &ReporterOptions,
                _tags: Vec<String>,
                _message: LogMessage,
            ) -> Result<Option<String>, ReporterError> {
                Ok(None)
            }
        }

        let calls = Arc::new(AtomicUsize::new(0));
        let disabled_calls = Arc::new(AtomicUsize::new(0));
        Logger::builder()
            .with_reporter("counting", ReporterSpec::handler(CountingInit(calls.clone())))
            .with_reporter_options(
                "disabled",
                ReporterSpec::handler(CountingInit(disabled_calls.clone())),
                ReporterOptionsPatch::new().with_enabled(false),
            )
            .build()
            .expect("valid configuration");

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(disabled_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_failing_init_surfaces_as_config_error() {
        use crate::application::ports::{Reporter, ReporterError};
        use crate::application::registry::ReporterOptions;

        #[derive(Debug)]
        struct RefusingInit;

        impl Reporter for RefusingInit {
            fn init(&self, _options: &ReporterOptions) -> Result<(), ReporterError> {
                Err("no socket".into())
            }

            fn log(
                &self,
                _options: &ReporterOptions,
                _tags: Vec<String>,
                _message: LogMessage,
            ) -> Result<Option<String>, ReporterError> {
                Ok(None)
            }
        }

        let result = Logger::builder()
            .with_reporter("net", ReporterSpec::handler(RefusingInit))
            .build();

        assert_eq!(
            result.err(),
            Some(ConfigError::ReporterInit {
                name: "net".to_string(),
                reason: "no socket".to_string()
            })
        );
    }

    #[test]
    fn test_startup_line_lists_enabled_reporters_and_filters() {
        let sink = CaptureSink::new();
        Logger::builder()
            .with_reporter_options(
                "api",
                ReporterSpec::callback(|_, _, _| None),
                ReporterOptionsPatch::new().with_filter(vec!["api".to_string()]),
            )
            .with_reporter("open", ReporterSpec::callback(|_, _, _| None))
            .with_reporter_options(
                "off",
                ReporterSpec::callback(|_, _, _| None),
                ReporterOptionsPatch::new().with_enabled(false),
            )
            .with_init_log(true)
            .with_sink(Arc::new(sink.clone()))
            .build()
            .expect("valid configuration");

        assert_eq!(
            sink.lines(),
            vec!["logger initialized with reporters: api (filter: api), open".to_string()]
        );
    }

    #[test]
    fn test_log_reaches_a_registered_callback() {
        let sink = CaptureSink::new();
        let logger = Logger::builder()
            .with_reporter(
                "echo",
                ReporterSpec::callback(|_options, tags, message| {
                    Some(format!("{}|{}", tags.join(","), message))
                }),
            )
            .with_sink(Arc::new(sink.clone()))
            .build()
            .expect("valid configuration");

        block_on(logger.log(["debug"], "ready"));

        assert_eq!(sink.lines(), vec!["debug|ready".to_string()]);
        assert_eq!(logger.metrics().delivered(), 1);
    }

    #[test]
    fn test_log_message_behaves_like_empty_tags() {
        let sink = CaptureSink::new();
        let logger = Logger::builder()
            .with_reporter(
                "echo",
                ReporterSpec::callback(|_options, tags, message| {
                    Some(format!("[{}] {}", tags.join(","), message))
                }),
            )
            .with_default_tags(vec!["svc".to_string()])
            .with_sink(Arc::new(sink.clone()))
            .build()
            .expect("valid configuration");

        block_on(logger.log_message("plain"));

        assert_eq!(sink.lines(), vec!["[svc] plain".to_string()]);
    }

    #[test]
    fn test_replacing_a_reporter_keeps_its_position() {
        let logger = Logger::builder()
            .with_reporter("first", ReporterSpec::callback(|_, _, _| None))
            .with_reporter("second", ReporterSpec::callback(|_, _, _| None))
            .with_reporter("first", ReporterSpec::callback(|_, _, _| Some("new".into())))
            .build()
            .expect("valid configuration");

        assert_eq!(
            logger.reporter_names(),
            vec!["first".to_string(), "second".to_string()]
        );
    }
}
