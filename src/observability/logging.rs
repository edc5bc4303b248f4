//! The logger handle returned by bootstrap.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use tracing::Dispatch;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

use crate::config::LogConfiguration;
use crate::error::Result;
use crate::observability::level::Severity;
use crate::observability::sinks::Sinks;

/// Structured fields attached to a record, ordered by name.
///
/// tracing field names are static, so the map is recorded as a single
/// `fields` value holding compact JSON. JSON output therefore carries it as
/// one string-valued `fields` key, not as nested keys; decode that string
/// to get the map back.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Fields(BTreeMap<String, Value>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, replacing any previous value under the same name.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<K, V> FromIterator<(K, V)> for Fields
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Renders as a compact JSON object.
impl fmt::Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let encoded = serde_json::to_string(&self.0).map_err(|_| fmt::Error)?;
        f.write_str(&encoded)
    }
}

// Level must be a constant at each tracing callsite, hence one arm per level.
macro_rules! dispatch_event {
    ($level:expr, $fields:expr, $message:expr) => {
        tracing::event!(
            target: "logboot",
            $level,
            fields = $fields,
            "{}",
            $message
        )
    };
    ($level:expr, $severity:expr, $fields:expr, $message:expr) => {
        tracing::event!(
            target: "logboot",
            $level,
            severity = %$severity,
            fields = $fields,
            "{}",
            $message
        )
    };
}

/// A configured logger.
///
/// Owns its subscriber and minimum severity; nothing is installed process-wide
/// unless [`LoggerHandle::install_global`] is called. Cloning is cheap and
/// clones share the same sinks.
#[derive(Debug, Clone)]
pub struct LoggerHandle {
    dispatch: Dispatch,
    level: Severity,
    config: LogConfiguration,
    log_file: Option<PathBuf>,
}

impl LoggerHandle {
    /// Combine the sink layers into one subscriber filtered at `level`.
    pub fn new(sinks: Sinks, level: Severity) -> Self {
        let subscriber = Registry::default()
            .with(sinks.layers)
            .with(level.as_level_filter());

        Self {
            dispatch: Dispatch::new(subscriber),
            level,
            config: sinks.config,
            log_file: sinks.log_file,
        }
    }

    /// Minimum severity resolved at bootstrap.
    pub fn level(&self) -> Severity {
        self.level
    }

    /// Effective configuration, including a fallback log directory.
    pub fn config(&self) -> &LogConfiguration {
        &self.config
    }

    pub fn log_file_path(&self) -> Option<&Path> {
        self.log_file.as_deref()
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    /// Whether a record at `severity` would reach the sinks.
    pub fn enabled(&self, severity: Severity) -> bool {
        severity != Severity::Disabled && severity >= self.level
    }

    /// Emit one record. Records below the handle's level are dropped.
    pub fn emit(&self, severity: Severity, fields: &Fields, message: &str) {
        if !self.enabled(severity) {
            return;
        }

        let rendered = (!fields.is_empty()).then(|| tracing::field::display(fields));

        tracing::dispatcher::with_default(&self.dispatch, || match severity {
            Severity::Trace => dispatch_event!(tracing::Level::TRACE, rendered, message),
            Severity::Debug => dispatch_event!(tracing::Level::DEBUG, rendered, message),
            Severity::Info => dispatch_event!(tracing::Level::INFO, rendered, message),
            Severity::Warn => dispatch_event!(tracing::Level::WARN, rendered, message),
            Severity::Error => dispatch_event!(tracing::Level::ERROR, rendered, message),
            Severity::Fatal | Severity::Panic => {
                dispatch_event!(tracing::Level::ERROR, severity, rendered, message)
            }
            Severity::Disabled => {}
        });
    }

    pub fn trace(&self, fields: &Fields, message: &str) {
        self.emit(Severity::Trace, fields, message);
    }

    pub fn debug(&self, fields: &Fields, message: &str) {
        self.emit(Severity::Debug, fields, message);
    }

    pub fn info(&self, fields: &Fields, message: &str) {
        self.emit(Severity::Info, fields, message);
    }

    pub fn warn(&self, fields: &Fields, message: &str) {
        self.emit(Severity::Warn, fields, message);
    }

    pub fn error(&self, fields: &Fields, message: &str) {
        self.emit(Severity::Error, fields, message);
    }

    /// Emit at fatal severity. Does not exit; the caller decides.
    pub fn fatal(&self, fields: &Fields, message: &str) {
        self.emit(Severity::Fatal, fields, message);
    }

    /// Emit at panic severity. Does not unwind; the caller decides.
    pub fn panic(&self, fields: &Fields, message: &str) {
        self.emit(Severity::Panic, fields, message);
    }

    /// Run `f` with this logger as the thread's default subscriber, so plain
    /// `tracing` macros inside it reach these sinks.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Make this logger the process-wide default subscriber. Fails if one is
    /// already installed.
    pub fn install_global(&self) -> Result<()> {
        tracing::dispatcher::set_global_default(self.dispatch.clone())?;
        Ok(())
    }
}
