//! Combination of partial timer maps from many contributors.
//!
//! Merging is pure, associative and commutative with the empty map as
//! identity, so contributions can be combined in any order or grouping
//! (e.g. pairwise in a reduction tree).

use crate::timing::{Timer, TimerMap, TimingPath};
use log::debug;

/// Merge two mappings into a new one
///
/// Keys present in both have their statistics combined, keys present in
/// only one are carried over unchanged. When equal paths disagree on the
/// distributed flag the merged key is distributed, whatever the order.
pub fn merge(a: &TimerMap, b: &TimerMap) -> TimerMap {
    let (larger, smaller) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    let mut merged = larger.clone();
    for (path, timer) in smaller {
        merge_entry(&mut merged, path.clone(), timer);
    }
    merged
}

/// Merge `other` into `target` in place, consuming `other`
pub fn merge_into(target: &mut TimerMap, other: TimerMap) {
    for (path, timer) in other {
        merge_entry(target, path, &timer);
    }
}

/// Fold one timer into `target`, keeping the distributed key if either side has it
pub(crate) fn merge_entry(target: &mut TimerMap, path: TimingPath, timer: &Timer) {
    let existing_flag = target
        .get_key_value(&path)
        .map(|(key, _)| key.is_distributed_operation());

    match existing_flag {
        None => {
            target.insert(path, *timer);
        }
        Some(false) if path.is_distributed_operation() => {
            // HashMap keeps the old key on insert, so swap it out
            if let Some(previous) = target.remove(&path) {
                target.insert(path, previous.merged(timer));
            }
        }
        Some(_) => {
            if let Some(existing) = target.get_mut(&path) {
                existing.merge(timer);
            }
        }
    }
}

/// Reduce any number of contributor mappings into one
pub fn merge_all<I>(maps: I) -> TimerMap
where
    I: IntoIterator<Item = TimerMap>,
{
    let mut merged = TimerMap::new();
    let mut contributors = 0usize;
    for map in maps {
        merge_into(&mut merged, map);
        contributors += 1;
    }
    debug!(
        "Merged {} contributor maps into {} timers",
        contributors,
        merged.len()
    );
    merged
}

/// Sum of `total_time` over every timer (diagnostic helper)
pub fn total_recorded(timers: &TimerMap) -> std::time::Duration {
    timers.values().map(|t: &Timer| t.total_time).sum()
}
