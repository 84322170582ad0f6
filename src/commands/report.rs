//! Report command implementation.
//!
//! The report command:
//! 1. Loads and merges contributor snapshots
//! 2. Loads stage metadata (if given)
//! 3. Builds the adjusted forest and both tables
//! 4. Prints the tables and writes the JSON report

use super::models::ReportArgs;
use crate::output::{read_snapshot, read_stages, validate_output_path, write_report};
use crate::report::{generate_report, Report, TextRenderer};
use crate::timing::RecordingSession;
use crate::utils::config::{load_config, ReportConfig};
use anyhow::{Context, Result};
use log::{debug, info};
use std::io;
use std::path::Path;
use std::time::Instant;

/// Execute the report command
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * Unreadable or incompatible snapshot/stage/config files
/// * Inconsistent report rows
/// * File write errors
pub fn execute_report(args: ReportArgs) -> Result<Report> {
    let start_time = Instant::now();

    let config = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ReportConfig::default(),
    };

    // Step 1: Merge snapshots
    info!("Step 1/4: Merging {} snapshots...", args.snapshots.len());
    let session = RecordingSession::new(args.session.clone());
    for path in &args.snapshots {
        let timers = load_timers(path)?;
        debug!("{}: {} timers", path.display(), timers.len());
        session.submit(timers);
    }

    // Step 2: Stage metadata
    let stages = match &args.stages {
        Some(path) => {
            info!("Step 2/4: Loading stage metadata...");
            Some(read_stages(path).with_context(|| format!("Failed to read stages {}", path.display()))?)
        }
        None => {
            info!("Step 2/4: No stage metadata supplied");
            None
        }
    };

    // Step 3: Build report
    info!("Step 3/4: Building timing tree...");
    let report = generate_report(Some(&session), stages.as_deref()).context("Failed to build report")?;

    // Step 4: Output
    info!("Step 4/4: Writing output...");
    if !args.quiet {
        let stdout = io::stdout();
        let mut renderer = TextRenderer::new(stdout.lock(), config.duration_unit);
        report
            .render(&mut renderer, &config)
            .context("Failed to print report")?;
    }

    if let Some(output) = &args.output_json {
        write_report(&report, output).context("Failed to write report JSON")?;
        info!("✓ Report written to: {}", output.display());
    }

    if report.dropped_paths > 0 {
        info!(
            "{} paths had no recorded parent and were left out",
            report.dropped_paths
        );
    }

    let elapsed = start_time.elapsed();
    info!("Report completed in {:.2}s", elapsed.as_secs_f64());

    Ok(report)
}

fn load_timers(path: &Path) -> Result<crate::timing::TimerMap> {
    let snapshot = read_snapshot(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    let timers = snapshot
        .into_timers()
        .with_context(|| format!("Invalid snapshot {}", path.display()))?;
    Ok(timers)
}

/// Validate report arguments
///
/// **Public** - can be called before execute_report for early validation
pub fn validate_args(args: &ReportArgs) -> Result<()> {
    if args.snapshots.is_empty() {
        anyhow::bail!("At least one snapshot file is required");
    }

    for path in &args.snapshots {
        if !path.is_file() {
            anyhow::bail!("Snapshot file not found: {}", path.display());
        }
    }

    if let Some(stages) = &args.stages {
        if !stages.is_file() {
            anyhow::bail!("Stage file not found: {}", stages.display());
        }
    }

    if let Some(output) = &args.output_json {
        validate_output_path(output)?;
    }

    if args.session.trim().is_empty() {
        anyhow::bail!("Session name cannot be empty");
    }

    Ok(())
}
