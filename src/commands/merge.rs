//! Merge command: reduce several snapshots into one.

use super::models::MergeArgs;
use crate::aggregator::{merge_all, total_recorded};
use crate::output::{read_snapshot, validate_output_path, write_snapshot, Snapshot};
use anyhow::{Context, Result};
use log::info;

/// Merge the snapshot files in `args` and write the result
pub fn execute_merge(args: MergeArgs) -> Result<Snapshot> {
    if args.snapshots.is_empty() {
        anyhow::bail!("At least one snapshot file is required");
    }
    validate_output_path(&args.output)?;

    let maps = args
        .snapshots
        .iter()
        .map(|path| {
            read_snapshot(path)
                .and_then(|snapshot| snapshot.into_timers())
                .with_context(|| format!("Failed to load snapshot {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    let merged = merge_all(maps);
    let snapshot = Snapshot::from_timers(args.contributor.clone(), &merged);
    write_snapshot(&snapshot, &args.output).context("Failed to write merged snapshot")?;

    info!(
        "✓ Merged {} snapshots ({} timers, {:?} recorded) into {}",
        args.snapshots.len(),
        snapshot.entries.len(),
        total_recorded(&merged),
        args.output.display()
    );
    Ok(snapshot)
}
