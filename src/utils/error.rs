//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.
//!
//! Recording never fails; only report assembly and file handling do.

use thiserror::Error;

/// Errors raised while assembling a report
#[derive(Error, Debug)]
pub enum ReportError {
    /// No recording session exists for the calling context.
    /// The caller must initialise recording before asking for a report.
    #[error("no recording session has been initialised for this context")]
    UninitializedRecorder,

    /// A row was expected to carry a tagged value that was never attached.
    /// Indicates the tree/adjustment pipeline produced an inconsistent node.
    #[error("row for operation '{operation}' is missing its {tag} value")]
    MissingCorrelatedMonitor { tag: String, operation: String },

    #[error("failed to render table: {0}")]
    Render(#[from] std::io::Error),
}

/// Errors that can occur while reading or writing snapshot, stage and report files
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("Unsupported snapshot version: {0}")]
    UnsupportedVersion(String),

    #[error("Invalid snapshot entry: {0}")]
    InvalidEntry(String),
}

/// Errors that can occur while loading the report configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
}
