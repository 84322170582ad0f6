//! On-disk JSON schema for contributor snapshots.
//!
//! A snapshot is one contributor's (or an already merged) timer map.
//! Paths are stored root-first so the reader can rebuild them without
//! any shared state.

use crate::aggregator::merge::merge_entry;
use crate::timing::path::PathInterner;
use crate::timing::{PathSegment, Timer, TimerMap};
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::SnapshotError;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Top-level snapshot structure written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Schema version for compatibility checking
    pub version: String,

    /// Name of the contributor (driver, worker id, or "merged")
    pub contributor: String,

    /// Timestamp when the snapshot was taken
    pub generated_at: String,

    /// Recorded timers
    pub entries: Vec<SnapshotEntry>,
}

/// One timer with its full path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    pub path: Vec<PathSegment>,
    pub timer: Timer,
}

impl Snapshot {
    /// Capture `timers` under `contributor`
    ///
    /// Entries are ordered by depth, then sequence id, so files diff cleanly.
    pub fn from_timers(contributor: impl Into<String>, timers: &TimerMap) -> Self {
        let mut sorted: Vec<_> = timers.iter().collect();
        sorted.sort_by(|(a, _), (b, _)| {
            a.depth()
                .cmp(&b.depth())
                .then_with(|| a.sequence_id().cmp(&b.sequence_id()))
                .then_with(|| a.name().cmp(b.name()))
        });

        Self {
            version: SCHEMA_VERSION.to_string(),
            contributor: contributor.into(),
            generated_at: Utc::now().to_rfc3339(),
            entries: sorted
                .into_iter()
                .map(|(path, timer)| SnapshotEntry {
                    path: path.segments(),
                    timer: *timer,
                })
                .collect(),
        }
    }

    /// Rebuild the timer map
    ///
    /// Duplicate paths inside one snapshot are merged, not overwritten.
    /// Entries sharing a prefix share the rebuilt parent nodes.
    ///
    /// # Errors
    /// * `SnapshotError::UnsupportedVersion` - major version differs
    /// * `SnapshotError::InvalidEntry` - an entry has an empty path
    pub fn into_timers(self) -> Result<TimerMap, SnapshotError> {
        check_version(&self.version)?;

        let mut interner = PathInterner::default();
        let mut timers = TimerMap::with_capacity(self.entries.len());
        for (i, entry) in self.entries.into_iter().enumerate() {
            let path = interner
                .rebuild(&entry.path)
                .ok_or_else(|| SnapshotError::InvalidEntry(format!("entry {} has an empty path", i)))?;
            merge_entry(&mut timers, path, &entry.timer);
        }
        Ok(timers)
    }
}

/// Accept any version with the same major component
pub(crate) fn check_version(version: &str) -> Result<(), SnapshotError> {
    let major = |v: &str| v.split('.').next().map(str::to_string);
    if major(version) == major(SCHEMA_VERSION) {
        Ok(())
    } else {
        Err(SnapshotError::UnsupportedVersion(version.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timing::TimingPath;
    use std::time::Duration;

    #[test]
    fn test_snapshot_rebuilds_paths_and_flags() {
        let root = TimingPath::root("job", 1);
        let task = root.distributed_child("task", 2);
        let mut timers = TimerMap::new();
        timers.insert(root.clone(), Timer::from_sample(Duration::from_nanos(100)));
        timers.insert(task.clone(), Timer::from_sample(Duration::from_nanos(40)));

        let snapshot = Snapshot::from_timers("driver", &timers);
        assert_eq!(snapshot.entries[0].path.len(), 1);
        assert_eq!(snapshot.entries[1].path.len(), 2);

        let rebuilt = snapshot.into_timers().unwrap();
        assert_eq!(rebuilt, timers);
        let (path, _) = rebuilt.get_key_value(&task).unwrap();
        assert!(path.is_distributed_operation());
    }

    #[test]
    fn test_duplicate_entries_are_merged() {
        let segment = PathSegment {
            name: "x".to_string(),
            sequence_id: 5,
            distributed: false,
        };
        let snapshot = Snapshot {
            version: SCHEMA_VERSION.to_string(),
            contributor: "w".to_string(),
            generated_at: String::new(),
            entries: vec![
                SnapshotEntry {
                    path: vec![segment.clone()],
                    timer: Timer::from_sample(Duration::from_nanos(10)),
                },
                SnapshotEntry {
                    path: vec![segment],
                    timer: Timer::from_sample(Duration::from_nanos(20)),
                },
            ],
        };

        let timers = snapshot.into_timers().unwrap();
        assert_eq!(timers.len(), 1);
        assert_eq!(timers[&TimingPath::root("x", 5)].count, 2);
    }

    #[test]
    fn test_rejects_empty_path_and_bad_version() {
        let mut snapshot = Snapshot::from_timers("w", &TimerMap::new());
        snapshot.entries.push(SnapshotEntry {
            path: vec![],
            timer: Timer::new(),
        });
        assert!(matches!(snapshot.into_timers(), Err(SnapshotError::InvalidEntry(_))));

        assert!(check_version("1.4.0").is_ok());
        assert!(matches!(check_version("2.0.0"), Err(SnapshotError::UnsupportedVersion(_))));
    }
}
