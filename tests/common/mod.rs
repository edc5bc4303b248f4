//! Shared helpers for bootstrap integration tests.

use std::fs;
use std::path::Path;

use logboot::config::loader::encode_config;
use logboot::LogConfiguration;
use serde_json::Value;

pub const CONFIG_NAME: &str = "app.json";

/// Write `config` to `dir/CONFIG_NAME` in the on-disk format.
pub fn write_config(dir: &Path, config: &LogConfiguration) {
    fs::create_dir_all(dir).unwrap();
    fs::write(dir.join(CONFIG_NAME), encode_config(config).unwrap()).unwrap();
}

/// File-only JSON logging into `log_dir` at `level`.
pub fn file_config(log_dir: &Path, level: &str) -> LogConfiguration {
    LogConfiguration {
        directory: log_dir.display().to_string(),
        logging_level: level.to_string(),
        ..LogConfiguration::default()
    }
}

/// Non-empty lines of a log file.
pub fn read_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap_or_default()
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Every line of a JSON-encoded log file, parsed.
#[allow(dead_code)]
pub fn read_records(path: &Path) -> Vec<Value> {
    read_lines(path)
        .iter()
        .map(|line| serde_json::from_str(line).unwrap_or_else(|e| panic!("bad record {line:?}: {e}")))
        .collect()
}
