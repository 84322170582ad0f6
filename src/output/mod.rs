//! File formats for snapshots, stage metadata and reports.
//!
//! This module handles:
//! - The versioned snapshot schema
//! - JSON reading and writing

pub mod json;
pub mod schema;

// Re-export main functions
pub use json::{read_report, read_snapshot, read_stages, validate_output_path, write_report, write_snapshot};
pub use schema::{Snapshot, SnapshotEntry};
