//! Tree-shaped timings table.
//!
//! Rows come out in depth-first pre-order with siblings sorted by
//! [`sort_siblings`]. Each row carries tagged totals: rows inside a
//! distributed subtree (the distributed node included) get a worker
//! total, all other rows get a driver total plus the adjusted driver-only
//! time.

use super::ordering::sort_siblings;
use super::table::{Cell, Column};
use crate::aggregator::{Forest, NodeId, TreeNode};
use crate::utils::config::{BRANCH_CONTINUE, BRANCH_LAST, PREFIX_BLANK, PREFIX_VERTICAL};
use crate::utils::error::ReportError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Kind of total attached to a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    WorkerTotal,
    DriverTotal,
    DriverOnly,
    StageDuration,
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tag::WorkerTotal => "worker-total",
            Tag::DriverTotal => "driver-total",
            Tag::DriverOnly => "driver-only",
            Tag::StageDuration => "stage-duration",
        };
        f.write_str(name)
    }
}

/// Tagged signed-nanosecond values of one row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedTimes(BTreeMap<Tag, i64>);

impl TaggedTimes {
    pub fn attach(&mut self, tag: Tag, nanos: i64) {
        self.0.insert(tag, nanos);
    }

    pub fn get(&self, tag: Tag) -> Option<i64> {
        self.0.get(&tag).copied()
    }

    /// Value that must be present for `operation`
    pub fn require(&self, tag: Tag, operation: &str) -> Result<i64, ReportError> {
        self.get(tag).ok_or_else(|| ReportError::MissingCorrelatedMonitor {
            tag: tag.to_string(),
            operation: operation.to_string(),
        })
    }

    /// Cell for an optional column (blank when absent)
    pub fn cell(&self, tag: Tag) -> Cell {
        self.get(tag).map_or(Cell::Empty, Cell::Nanos)
    }
}

/// One row of the timings table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingRow {
    /// Branch glyph prefix plus name
    pub tree_path: String,
    pub name: String,
    pub sequence_id: u64,
    pub depth: usize,
    pub distributed: bool,
    /// Inside (or at the root of) a distributed subtree
    pub in_worker_context: bool,
    pub times: TaggedTimes,
    pub count: u64,
    #[serde(rename = "mean_ns", with = "crate::utils::nanos")]
    pub mean: Duration,
    #[serde(rename = "min_ns", with = "crate::utils::nanos")]
    pub min: Duration,
    #[serde(rename = "max_ns", with = "crate::utils::nanos")]
    pub max: Duration,
}

struct Pending {
    id: NodeId,
    prefix: String,
    glyph: &'static str,
    in_worker: bool,
}

/// Flatten the forest into display rows
///
/// Traversal uses an explicit stack, so very deep trees do not recurse.
pub fn build_timing_rows(forest: &Forest<'_>) -> Vec<TimingRow> {
    let mut rows = Vec::with_capacity(forest.len());
    let mut stack: Vec<Pending> = sort_siblings(forest, forest.roots())
        .into_iter()
        .rev()
        .map(|id| Pending {
            id,
            prefix: String::new(),
            glyph: "",
            in_worker: false,
        })
        .collect();

    while let Some(item) = stack.pop() {
        let node = forest.node(item.id);
        let in_worker = item.in_worker || node.is_distributed_operation();
        let tree_path = format!("{}{}{}", item.prefix, item.glyph, node.path.name());
        rows.push(make_row(node, tree_path, in_worker));

        let child_prefix = if node.parent().is_none() {
            String::new()
        } else if item.glyph == BRANCH_LAST {
            format!("{}{}", item.prefix, PREFIX_BLANK)
        } else {
            format!("{}{}", item.prefix, PREFIX_VERTICAL)
        };

        let children = sort_siblings(forest, node.children());
        let last = children.len().saturating_sub(1);
        for (i, child) in children.into_iter().enumerate().rev() {
            stack.push(Pending {
                id: child,
                prefix: child_prefix.clone(),
                glyph: if i == last { BRANCH_LAST } else { BRANCH_CONTINUE },
                in_worker,
            });
        }
    }

    rows
}

fn make_row(node: &TreeNode<'_>, tree_path: String, in_worker: bool) -> TimingRow {
    let total = saturating_nanos(node.timer.total_time.as_nanos() as i128);
    let mut times = TaggedTimes::default();
    if in_worker {
        times.attach(Tag::WorkerTotal, total);
    } else {
        times.attach(Tag::DriverTotal, total);
        times.attach(Tag::DriverOnly, saturating_nanos(node.adjusted_driver_time()));
    }

    TimingRow {
        tree_path,
        name: node.path.name().to_string(),
        sequence_id: node.path.sequence_id(),
        depth: node.path.depth(),
        distributed: node.is_distributed_operation(),
        in_worker_context: in_worker,
        times,
        count: node.timer.count,
        mean: node.timer.mean(),
        min: node.timer.min,
        max: node.timer.max,
    }
}

pub(crate) fn saturating_nanos(nanos: i128) -> i64 {
    nanos.clamp(i64::MIN as i128, i64::MAX as i128) as i64
}

/// Value of `tag` when the row's context calls for it, blank otherwise
fn context_cell(row: &TimingRow, tag: Tag, in_worker: bool) -> Result<Cell, ReportError> {
    if row.in_worker_context == in_worker {
        row.times.require(tag, &row.name).map(Cell::Nanos)
    } else {
        Ok(Cell::Empty)
    }
}

/// Columns of the timings table
///
/// Worker rows must carry a worker total, driver rows a driver total and
/// driver-only time.
pub fn timing_columns() -> Vec<Column<TimingRow>> {
    vec![
        Column::new("path", |r: &TimingRow| Ok(Cell::Text(r.tree_path.clone()))),
        Column::new("worker total", |r: &TimingRow| context_cell(r, Tag::WorkerTotal, true)),
        Column::new("driver total", |r: &TimingRow| context_cell(r, Tag::DriverTotal, false)),
        Column::new("driver only", |r: &TimingRow| context_cell(r, Tag::DriverOnly, false)),
        Column::new("count", |r: &TimingRow| Ok(Cell::Count(r.count))),
        Column::new("mean", |r: &TimingRow| Ok(Cell::Nanos(saturating_nanos(r.mean.as_nanos() as i128)))),
        Column::new("min", |r: &TimingRow| Ok(Cell::Nanos(saturating_nanos(r.min.as_nanos() as i128)))),
        Column::new("max", |r: &TimingRow| Ok(Cell::Nanos(saturating_nanos(r.max.as_nanos() as i128)))),
    ]
}
