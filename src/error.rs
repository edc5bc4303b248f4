//! Error types for logging bootstrap.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::validation::ValidationError;

/// Errors that abort logging bootstrap.
#[derive(Debug, Error)]
pub enum Error {
    /// Directory creation or file write failed.
    #[error("I/O error at '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Permission fallback to the working directory failed as well.
    #[error(
        "failed to create the log in both '{}' and '{}': {source}",
        .requested.display(),
        .fallback.display()
    )]
    DirectoryFallback {
        requested: PathBuf,
        fallback: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configuration file exists but could not be opened or read.
    #[error("failed to read logging configuration '{}': {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Configuration file is not valid JSON for the expected shape.
    #[error("failed to parse logging configuration '{}': {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Configuration decoded but violates a semantic constraint.
    #[error("invalid logging configuration: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    /// Default configuration could not be encoded.
    #[error("failed to encode logging configuration: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A global default subscriber was already installed.
    #[error("a global logger is already installed")]
    AlreadyInstalled(#[from] tracing::dispatcher::SetGlobalDefaultError),
}

/// Coarse error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Io,
    ConfigRead,
    ConfigParse,
}

impl Error {
    /// Category of this error; validation failures count as parse errors.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io { .. }
            | Error::DirectoryFallback { .. }
            | Error::Serialize(_)
            | Error::AlreadyInstalled(_) => ErrorKind::Io,
            Error::ConfigRead { .. } => ErrorKind::ConfigRead,
            Error::ConfigParse { .. } | Error::Validation(_) => ErrorKind::ConfigParse,
        }
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for bootstrap operations.
pub type Result<T> = std::result::Result<T, Error>;
