//! Report assembly: ordering, tree rendering and stage correlation.
//!
//! The report is built from a merged snapshot, never from a live
//! recorder. Derived structures (forest, rows) are discarded once the
//! report value exists.

pub mod distributed;
pub mod ordering;
pub mod stage;
pub mod table;
pub mod timings;

use crate::aggregator::build_forest;
use crate::timing::{RecordingSession, TimerMap};
use crate::utils::config::{ReportConfig, SCHEMA_VERSION};
use crate::utils::error::ReportError;
use chrono::Utc;
use log::{debug, info};
use serde::{Deserialize, Serialize};

// Re-export main types
pub use distributed::{build_distributed_rows, distributed_columns, DistributedRow};
pub use ordering::{compare_siblings, sort_siblings};
pub use stage::StageTiming;
pub use table::{format_nanos, Cell, Column, Table, TableRenderer, TextRenderer};
pub use timings::{build_timing_rows, timing_columns, Tag, TaggedTimes, TimingRow};

/// Both report tables for one recording session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Schema version for compatibility checking
    pub version: String,

    /// Session (or merged snapshot) the report was built from
    pub session: String,

    /// Timestamp when the report was generated
    pub generated_at: String,

    /// One row per tree node, in rendered order
    pub timings: Vec<TimingRow>,

    /// One row per distributed operation, in sequence order
    pub distributed_operations: Vec<DistributedRow>,

    /// Paths left out because their parent was never recorded
    pub dropped_paths: usize,
}

impl Report {
    pub fn timings_table(&self, title: &str) -> Result<Table, ReportError> {
        Table::build(title, &timing_columns(), &self.timings)
    }

    pub fn distributed_table(&self, title: &str) -> Result<Table, ReportError> {
        Table::build(title, &distributed_columns(), &self.distributed_operations)
    }

    /// Build every table first, then hand them to `renderer`
    ///
    /// Nothing is rendered if any table fails to build.
    pub fn render<R: TableRenderer>(&self, renderer: &mut R, config: &ReportConfig) -> Result<(), ReportError> {
        let mut tables = vec![self.timings_table(&config.timings_title)?];
        if config.show_distributed_table {
            tables.push(self.distributed_table(&config.distributed_title)?);
        }
        for table in &tables {
            renderer.render(table)?;
        }
        Ok(())
    }
}

/// Build the report for the session active in the calling context
///
/// # Errors
/// * `ReportError::UninitializedRecorder` - `session` is `None`
/// * `ReportError::MissingCorrelatedMonitor` - inconsistent row
pub fn generate_report(
    session: Option<&RecordingSession>,
    stages: Option<&[StageTiming]>,
) -> Result<Report, ReportError> {
    let session = session.ok_or(ReportError::UninitializedRecorder)?;
    let timers = session.snapshot();
    info!(
        "Generating report for session '{}' ({} contributions, {} timers)",
        session.name(),
        session.contributions(),
        timers.len()
    );
    build_report(session.name(), &timers, stages)
}

/// Build a report from an already merged map
pub fn build_report(
    session: &str,
    timers: &TimerMap,
    stages: Option<&[StageTiming]>,
) -> Result<Report, ReportError> {
    let forest = build_forest(timers);
    debug!(
        "Forest built: {} nodes, {} roots, {} dropped",
        forest.len(),
        forest.roots().len(),
        forest.dropped().len()
    );

    let timings = build_timing_rows(&forest);
    let distributed_operations = build_distributed_rows(timers, stages);

    Ok(Report {
        version: SCHEMA_VERSION.to_string(),
        session: session.to_string(),
        generated_at: Utc::now().to_rfc3339(),
        timings,
        distributed_operations,
        dropped_paths: forest.dropped().len(),
    })
}

/// Generate and render in one step
///
/// Fails before writing anything when no session is active.
pub fn print_report<R: TableRenderer>(
    session: Option<&RecordingSession>,
    stages: Option<&[StageTiming]>,
    renderer: &mut R,
    config: &ReportConfig,
) -> Result<Report, ReportError> {
    let report = generate_report(session, stages)?;
    report.render(renderer, config)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::{SequenceAllocator, Timer, TimingPath};
    use crate::utils::config::DurationUnit;
    use std::time::Duration;

    static SEQ: SequenceAllocator = SequenceAllocator::new();

    #[test]
    fn test_uninitialized_recorder() {
        let mut renderer = TextRenderer::new(Vec::new(), DurationUnit::Ns);
        let result = print_report(None, None, &mut renderer, &ReportConfig::default());

        assert!(matches!(result, Err(ReportError::UninitializedRecorder)));
        assert!(renderer.into_inner().is_empty());
    }

    #[test]
    fn test_report_from_session() {
        let session = RecordingSession::with_sequence("job", &SEQ);
        let mut driver = session.recorder();
        let root = driver.root("job");
        let task = driver.distributed(&root, "task");
        driver.record(&root, Duration::from_nanos(100));
        session.submit_recorder(driver);

        let mut worker = session.recorder();
        worker.record(&task, Duration::from_nanos(40));
        session.submit_recorder(worker);

        let report = generate_report(Some(&session), None).unwrap();
        assert_eq!(report.session, "job");
        assert_eq!(report.timings.len(), 2);
        assert_eq!(report.timings[0].times.get(Tag::DriverOnly), Some(60));
        assert_eq!(report.distributed_operations.len(), 1);
        assert_eq!(report.dropped_paths, 0);
    }

    #[test]
    fn test_render_respects_config() {
        let mut map = TimerMap::new();
        let root = TimingPath::root("job", 1);
        map.insert(root.clone(), Timer::from_sample(Duration::from_nanos(10)));
        let report = build_report("s", &map, None).unwrap();

        let config = ReportConfig {
            show_distributed_table: false,
            ..ReportConfig::default()
        };
        let mut renderer = TextRenderer::new(Vec::new(), DurationUnit::Ns);
        report.render(&mut renderer, &config).unwrap();
        let text = String::from_utf8(renderer.into_inner()).unwrap();

        assert!(text.contains("Timings"));
        assert!(!text.contains("Distributed Operations"));
        assert!(text.contains("10ns"));
    }
}
