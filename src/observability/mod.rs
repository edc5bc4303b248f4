//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! LogConfiguration
//!     → sinks.rs (console layer, rotating file layer; directory fallback)
//!     → rotation.rs (size/age/backup rotated file behind the file layer)
//!     → level.rs (configured level name → Severity, default warn)
//!     → logging.rs (LoggerHandle: owns the subscriber and the level)
//!
//! Emission:
//!     LoggerHandle::{trace..panic}
//!     → level check
//!     → every sink layer (fan-out), each record timestamped
//! ```
//!
//! # Design Decisions
//! - Structured logging via `tracing`; each sink is a `tracing-subscriber` fmt layer
//! - The minimum level is held by the handle, not a process global
//! - A handle with no sinks is valid and discards every record

pub mod level;
pub mod logging;
pub mod rotation;
pub mod sinks;

pub use level::{resolve_level, Severity, DEFAULT_LEVEL};
pub use logging::{Fields, LoggerHandle};
pub use rotation::{RollingFile, RotationPolicy};
pub use sinks::{build_file_sink, build_sinks, LogDirectory, Sinks};
