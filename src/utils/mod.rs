//! Utility modules for configuration, error handling, and serialization helpers.

pub mod config;
pub mod error;
pub mod nanos;

// Re-export commonly used error types for convenience
pub use error::{ConfigError, ReportError, SnapshotError};
