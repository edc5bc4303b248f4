//! Process logging bootstrap.
//!
//! Reads a JSON logging configuration (creating it with defaults on first
//! run), builds console and rotating-file sinks and returns a
//! [`LoggerHandle`] that emits structured records at a minimum severity.

pub mod config;
pub mod error;
pub mod fs;
pub mod lifecycle;
pub mod observability;

pub use config::LogConfiguration;
pub use error::{Error, ErrorKind, Result};
pub use lifecycle::start;
pub use observability::{Fields, LoggerHandle, Severity};
