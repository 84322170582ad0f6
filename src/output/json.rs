//! JSON readers and writers for snapshots, stage lists and reports.

use super::schema::{check_version, Snapshot};
use crate::report::{Report, StageTiming};
use crate::utils::error::SnapshotError;
use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Write a snapshot to a JSON file
///
/// # Errors
/// * `SnapshotError::Io` - I/O error during write
/// * `SnapshotError::Json` - JSON serialization error
/// * `SnapshotError::InvalidPath` - Path cannot be created or is invalid
pub fn write_snapshot(snapshot: &Snapshot, output_path: impl AsRef<Path>) -> Result<(), SnapshotError> {
    let output_path = output_path.as_ref();
    info!(
        "Writing snapshot ({} entries) to: {}",
        snapshot.entries.len(),
        output_path.display()
    );
    write_json(snapshot, output_path)
}

/// Read a snapshot from a JSON file
pub fn read_snapshot(input_path: impl AsRef<Path>) -> Result<Snapshot, SnapshotError> {
    let input_path = input_path.as_ref();
    let snapshot: Snapshot = read_json(input_path)?;
    check_version(&snapshot.version)?;

    debug!(
        "Snapshot loaded: version {}, contributor {}, {} entries",
        snapshot.version,
        snapshot.contributor,
        snapshot.entries.len()
    );
    Ok(snapshot)
}

/// Write a generated report to a JSON file
pub fn write_report(report: &Report, output_path: impl AsRef<Path>) -> Result<(), SnapshotError> {
    let output_path = output_path.as_ref();
    info!("Writing report to: {}", output_path.display());
    write_json(report, output_path)
}

/// Read a report from a JSON file
pub fn read_report(input_path: impl AsRef<Path>) -> Result<Report, SnapshotError> {
    let report: Report = read_json(input_path.as_ref())?;
    check_version(&report.version)?;
    Ok(report)
}

/// Read external stage metadata (a JSON array of stage records)
pub fn read_stages(input_path: impl AsRef<Path>) -> Result<Vec<StageTiming>, SnapshotError> {
    let stages: Vec<StageTiming> = read_json(input_path.as_ref())?;
    debug!("Loaded {} stage records", stages.len());
    Ok(stages)
}

fn write_json<T: Serialize>(value: &T, output_path: &Path) -> Result<(), SnapshotError> {
    validate_output_path(output_path)?;

    // Create parent directories if needed
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                SnapshotError::InvalidPath(format!("Cannot create directory {}: {}", parent.display(), e))
            })?;
        }
    }

    let file = File::create(output_path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, value)?;

    debug!("Written {} bytes", calculate_file_size(output_path));
    Ok(())
}

fn read_json<T: DeserializeOwned>(input_path: &Path) -> Result<T, SnapshotError> {
    debug!("Reading JSON from: {}", input_path.display());
    let file = File::open(input_path)?;
    let value = serde_json::from_reader(BufReader::new(file))?;
    Ok(value)
}

/// Validate that output path is writable
pub fn validate_output_path(path: &Path) -> Result<(), SnapshotError> {
    if path.as_os_str().is_empty() {
        return Err(SnapshotError::InvalidPath("Path is empty".to_string()));
    }

    if path.is_dir() {
        return Err(SnapshotError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}
