//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Check config file → Write defaults if absent → Decode → Validate
//!     → Build sinks → Resolve level → LoggerHandle
//! ```
//!
//! # Design Decisions
//! - Startup is a one-shot sequence on a single thread
//! - The returned handle is shared read-only afterwards
//! - No hot reload: the level and sinks are fixed for the handle's lifetime

pub mod startup;

pub use startup::start;
