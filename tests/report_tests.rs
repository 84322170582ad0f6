use pretty_assertions::assert_eq;
use std::time::Duration;
use timing_tree::output::{read_report, read_snapshot, read_stages, write_report, write_snapshot, Snapshot};
use timing_tree::report::{
    build_report, print_report, StageTiming, Table, TableRenderer, Tag, TextRenderer,
};
use timing_tree::timing::{RecordingSession, SequenceAllocator, Timer, TimerMap, TimingPath};
use timing_tree::utils::config::{DurationUnit, ReportConfig};
use timing_tree::utils::ReportError;

fn ns(n: u64) -> Duration {
    Duration::from_nanos(n)
}

/// Renderer that only remembers what it was given
#[derive(Default)]
struct Capture {
    tables: Vec<Table>,
}

impl TableRenderer for Capture {
    fn render(&mut self, table: &Table) -> Result<(), ReportError> {
        self.tables.push(table.clone());
        Ok(())
    }
}

fn distributed_job() -> TimerMap {
    let root = TimingPath::root("root", 1);
    let child = root.distributed_child("child-distributed", 2);
    let mut timers = TimerMap::new();
    timers.insert(root, Timer::from_sample(ns(100)));
    timers.insert(child, Timer::from_sample(ns(40)));
    timers
}

#[test]
fn test_distributed_child_adjusts_root_and_matches_stage() {
    let stages = vec![StageTiming::new(Some("child-distributed"), "s1", ns(40))];
    let report = build_report("job", &distributed_job(), Some(&stages)).unwrap();

    let root = &report.timings[0];
    assert_eq!(root.name, "root");
    assert_eq!(root.times.get(Tag::DriverOnly), Some(60));
    assert_eq!(root.times.get(Tag::DriverTotal), Some(100));

    let child = &report.timings[1];
    assert!(child.in_worker_context);
    assert_eq!(child.times.get(Tag::WorkerTotal), Some(40));
    assert_eq!(child.times.get(Tag::DriverOnly), None);

    assert_eq!(report.distributed_operations.len(), 1);
    let row = &report.distributed_operations[0];
    assert_eq!(row.sequence, 1);
    assert!(row.is_new_stage);
    assert_eq!(row.stage_id.as_deref(), Some("s1"));
    assert_eq!(row.times.get(Tag::StageDuration), Some(40));
}

#[test]
fn test_unmatched_operation_is_not_new_stage() {
    let stages = vec![StageTiming::new(Some("other"), "s9", ns(5))];
    let report = build_report("job", &distributed_job(), Some(&stages)).unwrap();

    let row = &report.distributed_operations[0];
    assert!(!row.is_new_stage);
    assert_eq!(row.stage_id, None);
    assert_eq!(row.times.get(Tag::StageDuration), None);
}

#[test]
fn test_report_without_session_writes_nothing() {
    let mut renderer = TextRenderer::new(Vec::new(), DurationUnit::Ns);
    let result = print_report(None, None, &mut renderer, &ReportConfig::default());

    assert!(matches!(result, Err(ReportError::UninitializedRecorder)));
    assert!(renderer.into_inner().is_empty());
}

#[test]
fn test_print_report_renders_both_tables() {
    static SEQUENCE: SequenceAllocator = SequenceAllocator::new();
    let session = RecordingSession::with_sequence("job", &SEQUENCE);
    session.submit(distributed_job());

    let mut capture = Capture::default();
    let config = ReportConfig::default();
    print_report(Some(&session), None, &mut capture, &config).unwrap();

    assert_eq!(capture.tables.len(), 2);
    assert_eq!(capture.tables[0].title, config.timings_title);
    assert_eq!(capture.tables[0].rows.len(), 2);
    assert_eq!(capture.tables[1].title, config.distributed_title);
    assert_eq!(capture.tables[1].rows.len(), 1);
}

#[test]
fn test_distributed_table_can_be_hidden() {
    let report = build_report("job", &distributed_job(), None).unwrap();
    let config = ReportConfig {
        show_distributed_table: false,
        ..Default::default()
    };

    let mut capture = Capture::default();
    report.render(&mut capture, &config).unwrap();
    assert_eq!(capture.tables.len(), 1);
}

#[test]
fn test_text_output_contains_tree_glyphs() {
    let root = TimingPath::root("job", 1);
    let mut timers = TimerMap::new();
    timers.insert(root.clone(), Timer::from_sample(ns(100)));
    timers.insert(root.child("load", 2), Timer::from_sample(ns(30)));
    timers.insert(root.child("save", 3), Timer::from_sample(ns(20)));

    let report = build_report("job", &timers, None).unwrap();
    let mut renderer = TextRenderer::new(Vec::new(), DurationUnit::Ns);
    report.render(&mut renderer, &ReportConfig::default()).unwrap();

    let text = String::from_utf8(renderer.into_inner()).unwrap();
    assert!(text.contains("+- load"));
    assert!(text.contains("\\- save"));
    assert!(text.find("load").unwrap() < text.find("save").unwrap());
}

#[test]
fn test_snapshot_and_report_files_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let timers = distributed_job();

    let snapshot_path = dir.path().join("driver.json");
    write_snapshot(&Snapshot::from_timers("driver", &timers), &snapshot_path).unwrap();
    let loaded = read_snapshot(&snapshot_path).unwrap().into_timers().unwrap();
    assert_eq!(loaded, timers);

    let report = build_report("job", &loaded, None).unwrap();
    let report_path = dir.path().join("report.json");
    write_report(&report, &report_path).unwrap();
    assert_eq!(read_report(&report_path).unwrap(), report);
}

#[test]
fn test_stage_file_with_unnamed_stage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stages.json");
    std::fs::write(
        &path,
        r#"[
            {"stage_id": "s0", "duration_ns": 7},
            {"stage_name": "child-distributed", "stage_id": "s1", "duration_ns": 40}
        ]"#,
    )
    .unwrap();

    let stages = read_stages(&path).unwrap();
    assert_eq!(stages.len(), 2);
    assert_eq!(stages[0].stage_name, None);

    let report = build_report("job", &distributed_job(), Some(&stages)).unwrap();
    assert_eq!(report.distributed_operations[0].stage_id.as_deref(), Some("s1"));
}
