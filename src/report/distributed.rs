//! Distributed operations correlated with external stage metadata.

use super::stage::{index_by_name, StageTiming};
use super::table::{Cell, Column};
use super::timings::{saturating_nanos, TaggedTimes, Tag};
use crate::timing::TimerMap;
use crate::utils::error::ReportError;
use serde::{Deserialize, Serialize};

/// One distributed operation and its matched stage, if any
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributedRow {
    /// 1-based display position
    pub sequence: usize,
    pub sequence_id: u64,
    pub operation: String,
    /// A stage with this operation's name was supplied
    pub is_new_stage: bool,
    pub stage_id: Option<String>,
    pub times: TaggedTimes,
}

/// Filter the merged map to distributed operations, order them by
/// sequence id and left-join each with the stage of the same name
pub fn build_distributed_rows(timers: &TimerMap, stages: Option<&[StageTiming]>) -> Vec<DistributedRow> {
    let index = index_by_name(stages.unwrap_or_default());

    let mut operations: Vec<_> = timers
        .iter()
        .filter(|(path, _)| path.is_distributed_operation())
        .collect();
    operations.sort_by(|(pa, ta), (pb, tb)| {
        pa.sequence_id()
            .cmp(&pb.sequence_id())
            .then_with(|| tb.total_time.cmp(&ta.total_time))
            .then_with(|| pa.name().cmp(pb.name()))
    });

    operations
        .into_iter()
        .enumerate()
        .map(|(i, (path, timer))| {
            let stage = index.get(path.name());
            let mut times = TaggedTimes::default();
            times.attach(
                Tag::DriverTotal,
                saturating_nanos(timer.total_time.as_nanos() as i128),
            );
            if let Some(stage) = stage {
                times.attach(
                    Tag::StageDuration,
                    saturating_nanos(stage.duration.as_nanos() as i128),
                );
            }

            DistributedRow {
                sequence: i + 1,
                sequence_id: path.sequence_id(),
                operation: path.name().to_string(),
                is_new_stage: stage.is_some(),
                stage_id: stage.map(|s| s.stage_id.clone()),
                times,
            }
        })
        .collect()
}

/// Columns of the distributed operations table
pub fn distributed_columns() -> Vec<Column<DistributedRow>> {
    vec![
        Column::new("seq", |r: &DistributedRow| Ok(Cell::Count(r.sequence as u64))),
        Column::new("operation", |r: &DistributedRow| Ok(Cell::Text(r.operation.clone()))),
        Column::new("new stage", |r: &DistributedRow| Ok(Cell::Flag(r.is_new_stage))),
        Column::new("stage duration", |r: &DistributedRow| Ok(r.times.cell(Tag::StageDuration))),
        Column::new("driver total", |r: &DistributedRow| {
            r.times
                .require(Tag::DriverTotal, &r.operation)
                .map(Cell::Nanos)
        }),
        Column::new("stage id", |r: &DistributedRow| {
            Ok(r.stage_id.clone().map_or(Cell::Empty, Cell::Text))
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::table::Table;
    use crate::timing::{Timer, TimingPath};
    use std::time::Duration;

    fn sample() -> TimerMap {
        let root = TimingPath::root("job", 1);
        let mut map = TimerMap::new();
        map.insert(root.clone(), Timer::from_sample(Duration::from_nanos(100)));
        map.insert(root.distributed_child("reduce", 8), Timer::from_sample(Duration::from_nanos(5)));
        map.insert(root.distributed_child("map", 3), Timer::from_sample(Duration::from_nanos(40)));
        map
    }

    #[test]
    fn test_rows_ordered_and_numbered() {
        let rows = build_distributed_rows(&sample(), None);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].operation, "map");
        assert_eq!(rows[0].sequence, 1);
        assert_eq!(rows[1].operation, "reduce");
        assert_eq!(rows[1].sequence, 2);
        assert!(rows.iter().all(|r| !r.is_new_stage && r.stage_id.is_none()));
    }

    #[test]
    fn test_left_join_with_stages() {
        let stages = vec![StageTiming::new(Some("map"), "s1", Duration::from_nanos(38))];
        let rows = build_distributed_rows(&sample(), Some(&stages));

        assert!(rows[0].is_new_stage);
        assert_eq!(rows[0].stage_id.as_deref(), Some("s1"));
        assert_eq!(rows[0].times.get(Tag::StageDuration), Some(38));
        assert!(!rows[1].is_new_stage);
        assert_eq!(rows[1].times.get(Tag::StageDuration), None);
    }

    #[test]
    fn test_missing_driver_total_is_fatal() {
        let mut rows = build_distributed_rows(&sample(), None);
        rows[0].times = TaggedTimes::default();
        let err = Table::build("t", &distributed_columns(), &rows).unwrap_err();
        assert!(matches!(err, ReportError::MissingCorrelatedMonitor { .. }));
    }

    #[test]
    fn test_unmatched_stage_cells_are_empty() {
        let rows = build_distributed_rows(&sample(), None);
        let table = Table::build("t", &distributed_columns(), &rows).unwrap();
        let stage_id = table.column_index("stage id").unwrap();
        let duration = table.column_index("stage duration").unwrap();
        assert_eq!(table.rows[0][stage_id], Cell::Empty);
        assert_eq!(table.rows[0][duration], Cell::Empty);
    }
}
