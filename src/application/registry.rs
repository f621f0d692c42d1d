//! Reporter registration: option resolution and shape normalization.
//!
//! Reporters arrive in several shapes (a bare callback, a full
//! implementation, a built-in name). Registration normalizes every shape
//! into one uniform entry of name, handler, and resolved options, so the
//! dispatch engine deals with exactly one form.

use crate::application::ports::{BoxFuture, Reporter, ReporterError};
use crate::domain::message::LogMessage;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::{Arc, RwLock};

/// How often a reporter may emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Throttle {
    /// No rate limiting.
    #[default]
    Off,
    /// At most one emission per window of this many milliseconds.
    Millis(u64),
}

impl Throttle {
    pub fn is_off(&self) -> bool {
        matches!(self, Throttle::Off)
    }

    /// The window length, when throttling is on.
    pub fn window(&self) -> Option<u64> {
        match self {
            Throttle::Off => None,
            Throttle::Millis(ms) => Some(*ms),
        }
    }
}

/// Effective options governing one registered reporter.
///
/// Resolved once at registration (see [`resolve_options`]) and mutated
/// afterwards only by sticky per-call overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct ReporterOptions {
    /// Disabled reporters are never invoked; their `init` never runs.
    pub enabled: bool,
    /// Tags admitting an entry; empty admits everything.
    pub filter: Vec<String>,
    /// Tags rejecting an entry; wins over the filter.
    pub exclude: Vec<String>,
    pub throttle: Throttle,
    /// Throttle per tag combination instead of one shared window.
    pub throttle_based_on_tags: bool,
    /// Renderer-specific settings (timestamp, colors, additional
    /// fields, ...), an open map so reporters can define their own.
    pub settings: Map<String, Value>,
}

impl Default for ReporterOptions {
    fn default() -> Self {
        ReporterOptions {
            enabled: true,
            filter: Vec::new(),
            exclude: Vec::new(),
            throttle: Throttle::Off,
            throttle_based_on_tags: false,
            settings: Map::new(),
        }
    }
}

impl ReporterOptions {
    /// Overlay a patch: present fields replace, settings merge per key.
    pub fn apply(&mut self, patch: &ReporterOptionsPatch) {
        if let Some(enabled) = patch.enabled {
            self.enabled = enabled;
        }
        if let Some(filter) = &patch.filter {
            self.filter = filter.clone();
        }
        if let Some(exclude) = &patch.exclude {
            self.exclude = exclude.clone();
        }
        if let Some(throttle) = patch.throttle {
            self.throttle = throttle;
        }
        if let Some(based_on_tags) = patch.throttle_based_on_tags {
            self.throttle_based_on_tags = based_on_tags;
        }
        for (key, value) in &patch.settings {
            self.settings.insert(key.clone(), value.clone());
        }
    }

    /// Look up a renderer setting.
    pub fn setting(&self, key: &str) -> Option<&Value> {
        self.settings.get(key)
    }

    /// A boolean renderer setting, with a default for absent keys.
    pub fn setting_bool(&self, key: &str, default: bool) -> bool {
        self.setting(key).and_then(Value::as_bool).unwrap_or(default)
    }

    /// A string renderer setting.
    pub fn setting_str(&self, key: &str) -> Option<&str> {
        self.setting(key).and_then(Value::as_str)
    }
}

/// A partial options overlay.
///
/// `None` fields leave the base untouched; list fields replace wholesale
/// (concatenation with the global lists happens separately, at
/// resolution). Used for reporter defaults, registration-site options,
/// constructor-level defaults, and per-call overrides alike.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReporterOptionsPatch {
    pub enabled: Option<bool>,
    pub filter: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub throttle: Option<Throttle>,
    pub throttle_based_on_tags: Option<bool>,
    pub settings: Map<String, Value>,
}

impl ReporterOptionsPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn with_filter(mut self, filter: Vec<String>) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_exclude(mut self, exclude: Vec<String>) -> Self {
        self.exclude = Some(exclude);
        self
    }

    pub fn with_throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = Some(throttle);
        self
    }

    pub fn with_throttle_based_on_tags(mut self, based_on_tags: bool) -> Self {
        self.throttle_based_on_tags = Some(based_on_tags);
        self
    }

    pub fn with_setting(mut self, key: impl Into<String>, value: Value) -> Self {
        self.settings.insert(key.into(), value);
        self
    }
}

/// A reporter registration, before normalization.
#[derive(Clone)]
pub enum ReporterSpec {
    /// Resolve against the built-in reporter table
    /// (`console`, `json`, `cli`). Unknown names fail registration.
    Named(String),
    /// A caller-supplied reporter implementation.
    Handler(Arc<dyn Reporter>),
}

impl ReporterSpec {
    pub fn named(name: impl Into<String>) -> Self {
        ReporterSpec::Named(name.into())
    }

    pub fn handler<R: Reporter + 'static>(reporter: R) -> Self {
        ReporterSpec::Handler(Arc::new(reporter))
    }

    pub fn shared(reporter: Arc<dyn Reporter>) -> Self {
        ReporterSpec::Handler(reporter)
    }

    /// The bare-callback shape: a plain rendering function with no
    /// defaults and no init hook.
    pub fn callback<F>(callback: F) -> Self
    where
        F: Fn(&ReporterOptions, Vec<String>, LogMessage) -> Option<String>
            + Send
            + Sync
            + 'static,
    {
        ReporterSpec::Handler(Arc::new(FnReporter { callback }))
    }

    /// The bare-callback shape for asynchronous rendering functions.
    pub fn callback_async<F>(callback: F) -> Self
    where
        F: Fn(ReporterOptions, Vec<String>, LogMessage) -> BoxFuture<'static, Option<String>>
            + Send
            + Sync
            + 'static,
    {
        ReporterSpec::Handler(Arc::new(AsyncFnReporter { callback }))
    }
}

impl fmt::Debug for ReporterSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReporterSpec::Named(name) => f.debug_tuple("Named").field(name).finish(),
            ReporterSpec::Handler(_) => f.debug_tuple("Handler").field(&"<reporter>").finish(),
        }
    }
}

struct FnReporter<F> {
    callback: F,
}

impl<F> Reporter for FnReporter<F>
where
    F: Fn(&ReporterOptions, Vec<String>, LogMessage) -> Option<String> + Send + Sync,
{
    fn log(
        &self,
        options: &ReporterOptions,
        tags: Vec<String>,
        message: LogMessage,
    ) -> Result<Option<String>, ReporterError> {
        Ok((self.callback)(options, tags, message))
    }
}

struct AsyncFnReporter<F> {
    callback: F,
}

impl<F> Reporter for AsyncFnReporter<F>
where
    F: Fn(ReporterOptions, Vec<String>, LogMessage) -> BoxFuture<'static, Option<String>>
        + Send
        + Sync,
{
    fn log(
        &self,
        _options: &ReporterOptions,
        _tags: Vec<String>,
        _message: LogMessage,
    ) -> Result<Option<String>, ReporterError> {
        // The engine only ever drives log_async.
        Err("async reporter invoked through the sync hook".into())
    }

    fn log_async<'a>(
        &'a self,
        options: &'a ReporterOptions,
        tags: Vec<String>,
        message: LogMessage,
    ) -> BoxFuture<'a, Result<Option<String>, ReporterError>> {
        let rendered = (self.callback)(options.clone(), tags, message);
        Box::pin(async move { Ok(rendered.await) })
    }
}

/// One normalized reporter: name, handler, resolved options.
///
/// Options sit behind a lock because sticky per-call overrides mutate
/// them during dispatch.
pub(crate) struct ReporterEntry {
    pub(crate) name: String,
    pub(crate) handler: Arc<dyn Reporter>,
    pub(crate) options: RwLock<ReporterOptions>,
}

impl ReporterEntry {
    pub(crate) fn new(name: String, handler: Arc<dyn Reporter>, options: ReporterOptions) -> Self {
        ReporterEntry {
            name,
            handler,
            options: RwLock::new(options),
        }
    }

    /// Snapshot the current options. A poisoned lock still yields usable
    /// options; dispatch must never panic.
    pub(crate) fn options(&self) -> ReporterOptions {
        self.options
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Merge a sticky override into the persisted options.
    pub(crate) fn apply_override(&self, patch: &ReporterOptionsPatch) {
        self.options
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .apply(patch);
    }
}

impl fmt::Debug for ReporterEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReporterEntry")
            .field("name", &self.name)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// The registered reporters, in fan-out order.
#[derive(Debug, Default)]
pub(crate) struct ReporterSet {
    entries: Vec<ReporterEntry>,
}

impl ReporterSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Insert an entry. Re-registering a name replaces the earlier entry
    /// in place, keeping its original position in the fan-out order.
    pub(crate) fn insert(&mut self, entry: ReporterEntry) {
        match self.entries.iter_mut().find(|e| e.name == entry.name) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub(crate) fn iter(&self) -> std::slice::Iter<'_, ReporterEntry> {
        self.entries.iter()
    }

    pub(crate) fn get(&self, name: &str) -> Option<&ReporterEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub(crate) fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve a reporter's effective options.
///
/// Layering, lowest to highest precedence: built-in defaults, the
/// constructor-level defaults patch, the reporter's own defaults, the
/// registration-site options. The global filter/exclude lists are then
/// concatenated after the reporter's own (no deduplication).
pub(crate) fn resolve_options(
    constructor_defaults: &ReporterOptionsPatch,
    handler_defaults: &ReporterOptionsPatch,
    registration: &ReporterOptionsPatch,
    global_filter: &[String],
    global_exclude: &[String],
) -> ReporterOptions {
    let mut options = ReporterOptions::default();
    options.apply(constructor_defaults);
    options.apply(handler_defaults);
    options.apply(registration);
    options.filter.extend_from_slice(global_filter);
    options.exclude.extend_from_slice(global_exclude);
    options
}
