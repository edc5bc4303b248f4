//! Logging configuration subsystem.
//!
//! # Data Flow
//! ```text
//! <dir>/<filename> (JSON)
//!     → loader.rs (write defaults if absent, read & deserialize)
//!     → validation.rs (semantic checks)
//!     → LogConfiguration (immutable once handed to the sink builder)
//! ```
//!
//! # Design Decisions
//! - The file is auto-created with defaults on first run
//! - Keys missing from the file decode to zero values, not defaults
//! - Validation separates syntactic (serde) from semantic checks
//! - `LoggingLevel` is never rejected; the severity resolver falls back instead

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, write_default_config};
pub use schema::LogConfiguration;
pub use validation::{validate_config, ValidationError};
