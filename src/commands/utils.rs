use crate::output::read_snapshot;
use crate::utils::config::SCHEMA_VERSION;
use anyhow::Result;
use std::path::PathBuf;

/// Validate a snapshot JSON file
pub fn validate_snapshot_file(file_path: PathBuf) -> Result<()> {
    println!("Validating snapshot: {}", file_path.display());

    let snapshot = read_snapshot(&file_path)?;
    let contributor = snapshot.contributor.clone();
    let version = snapshot.version.clone();
    let timers = snapshot.into_timers()?;

    let distributed = timers.keys().filter(|p| p.is_distributed_operation()).count();
    let roots = timers.keys().filter(|p| p.is_root()).count();
    let max_depth = timers.keys().map(|p| p.depth()).max().unwrap_or(0);

    println!("✓ Valid snapshot JSON");
    println!("  Version: {}", version);
    println!("  Contributor: {}", contributor);
    println!("  Timers: {}", timers.len());
    println!("  Roots: {}", roots);
    println!("  Distributed Operations: {}", distributed);
    println!("  Max Depth: {}", max_depth);

    Ok(())
}

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("Timing Tree Snapshot Schema");
    println!("Current Version: {}", SCHEMA_VERSION);
    println!();

    if show_details {
        println!("Schema Structure:");
        println!("  version: string          - Schema version (e.g., '1.0.0')");
        println!("  contributor: string      - Driver or worker that recorded the timers");
        println!("  generated_at: string     - RFC 3339 timestamp");
        println!("  entries: array           - Recorded timers");
        println!("    path: array            - Root-first path segments");
        println!("      name: string         - Operation label");
        println!("      sequence_id: number  - Recording order id");
        println!("      distributed: bool    - Operation may run later/elsewhere");
        println!("    timer: object          - Accumulated statistics");
        println!("      total_ns: number     - Sum of all invocations");
        println!("      count: number        - Number of invocations");
        println!("      min_ns: number       - Shortest invocation");
        println!("      max_ns: number       - Longest invocation");
        println!();
        println!("Stage file: array of {{ stage_name?: string, stage_id: string, duration_ns: number }}");
    } else {
        println!("Use --show for detailed schema information");
    }
}

/// Display version information
pub fn display_version() {
    println!("Timing Tree v{}", env!("CARGO_PKG_VERSION"));
    println!("Snapshot Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Hierarchical timing aggregation for driver/worker computations.");
}
