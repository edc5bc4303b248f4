//! Startup orchestration.
//!
//! # Responsibilities
//! - Load (or create) and validate the logging configuration
//! - Build the sinks and resolve the minimum severity
//! - Hand back a ready logger carrying the effective configuration
//!
//! # Design Decisions
//! - Fail fast: any error other than a bad level name is fatal
//! - Steps run in order, once, on the calling thread
//! - Nothing is installed globally; the caller owns the handle

use std::path::Path;

use crate::config::{load_config, validate_config};
use crate::error::{Error, Result};
use crate::observability::{build_sinks, resolve_level, LoggerHandle};

/// Bootstrap logging from the configuration file `dir/config_filename`.
///
/// The file is created with defaults if it does not exist. Calling this again
/// re-reads the file and builds a fresh handle.
pub fn start(dir: impl AsRef<Path>, config_filename: &str) -> Result<LoggerHandle> {
    let dir = dir.as_ref();

    let config = load_config(dir, config_filename)?;
    validate_config(&config).map_err(Error::Validation)?;

    let sinks = build_sinks(&config, dir)?;
    let level = resolve_level(&config.logging_level);

    let handle = LoggerHandle::new(sinks, level);
    tracing::info!(
        config = %dir.join(config_filename).display(),
        level = %handle.level(),
        log_file = ?handle.log_file_path(),
        "Logging started"
    );

    Ok(handle)
}
