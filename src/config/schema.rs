//! Configuration schema definitions.
//!
//! Field names on disk are the PascalCase keys of the JSON file; the Rust
//! fields keep snake_case.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Logging configuration for the console and rotating file sinks.
///
/// Field order matches the order keys are written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase", default = "LogConfiguration::zeroed")]
pub struct LogConfiguration {
    /// Emit human-readable records to stderr.
    pub console_logging_enabled: bool,

    /// Target directory for the file sink. Empty means the configuration
    /// directory.
    pub directory: String,

    /// Encode file records as JSON instead of plain text.
    #[serde(rename = "EncodeLogsAsJSON")]
    pub encode_logs_as_json: bool,

    /// Emit records to the rotating file.
    pub file_logging_enabled: bool,

    /// Log file path, relative to `directory`.
    pub filename: String,

    /// Minimum severity name (trace, debug, info, warn, error, fatal, panic,
    /// disabled).
    pub logging_level: String,

    /// Days before a rotated file is deleted (0 = keep forever).
    pub max_file_age: u32,

    /// Maximum rotated files retained (0 = keep all).
    pub max_file_backups: u32,

    /// Megabytes before the active file is rotated.
    pub max_file_size: u64,
}

impl Default for LogConfiguration {
    fn default() -> Self {
        Self {
            console_logging_enabled: false,
            directory: String::new(),
            encode_logs_as_json: true,
            file_logging_enabled: true,
            filename: "logs/output.log".to_string(),
            logging_level: "warn".to_string(),
            max_file_age: 30,
            max_file_backups: 10,
            max_file_size: 10,
        }
    }
}

impl LogConfiguration {
    /// All fields at their zero value. Used to fill keys absent from the file.
    pub fn zeroed() -> Self {
        Self {
            console_logging_enabled: false,
            directory: String::new(),
            encode_logs_as_json: false,
            file_logging_enabled: false,
            filename: String::new(),
            logging_level: String::new(),
            max_file_age: 0,
            max_file_backups: 0,
            max_file_size: 0,
        }
    }

    /// Directory the file sink writes into, with an empty `directory`
    /// resolved against `base_dir`.
    pub fn log_directory(&self, base_dir: &Path) -> PathBuf {
        if self.directory.is_empty() {
            base_dir.to_path_buf()
        } else {
            PathBuf::from(&self.directory)
        }
    }

    /// Full path of the active log file.
    pub fn log_file_path(&self, base_dir: &Path) -> PathBuf {
        self.log_directory(base_dir).join(&self.filename)
    }
}
