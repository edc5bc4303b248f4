//! Severity levels and resolution of the configured level name.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::filter::LevelFilter;

/// Level used when the configured name is empty or unrecognized.
pub const DEFAULT_LEVEL: Severity = Severity::Warn;

/// Record severity, ordered from most to least verbose.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
    Fatal,
    Panic,
    /// Drops every record.
    Disabled,
}

impl Severity {
    pub const ALL: [Severity; 8] = [
        Severity::Trace,
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::Fatal,
        Severity::Panic,
        Severity::Disabled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Trace => "trace",
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::Fatal => "fatal",
            Severity::Panic => "panic",
            Severity::Disabled => "disabled",
        }
    }

    /// Closest tracing filter. Fatal and panic records travel as ERROR events,
    /// so their exact threshold is enforced by the logger handle.
    pub fn as_level_filter(self) -> LevelFilter {
        match self {
            Severity::Trace => LevelFilter::TRACE,
            Severity::Debug => LevelFilter::DEBUG,
            Severity::Info => LevelFilter::INFO,
            Severity::Warn => LevelFilter::WARN,
            Severity::Error | Severity::Fatal | Severity::Panic => LevelFilter::ERROR,
            Severity::Disabled => LevelFilter::OFF,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The level name is not one of the known severities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown severity level '{0}'")]
pub struct ParseSeverityError(String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseSeverityError(s.to_string()))
    }
}

/// Resolve a configured level name, falling back to [`DEFAULT_LEVEL`].
///
/// Never fails: a bad name must not abort startup.
pub fn resolve_level(name: &str) -> Severity {
    match name.parse() {
        Ok(level) => level,
        Err(err) => {
            if !name.is_empty() {
                tracing::warn!(%err, default = %DEFAULT_LEVEL, "Falling back to default logging level");
            }
            DEFAULT_LEVEL
        }
    }
}
