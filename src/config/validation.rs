//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Reject file-sink settings that would break rotation
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LogConfiguration → Result<(), Vec<ValidationError>>
//! - File fields are only checked when file logging is enabled

use thiserror::Error;

use crate::config::schema::LogConfiguration;

/// A single semantic violation in a logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Filename must not be empty when file logging is enabled")]
    EmptyFilename,

    #[error("MaxFileSize must be greater than zero when file logging is enabled")]
    ZeroMaxFileSize,
}

/// Check a decoded configuration.
pub fn validate_config(config: &LogConfiguration) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.file_logging_enabled {
        if config.filename.trim().is_empty() {
            errors.push(ValidationError::EmptyFilename);
        }
        if config.max_file_size == 0 {
            errors.push(ValidationError::ZeroMaxFileSize);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
