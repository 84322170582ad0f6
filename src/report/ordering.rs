//! Deterministic sibling order for presentation.
//!
//! Siblings are shown in recording order (ascending sequence id). Repeated
//! invocations of one call site share a sequence id; among those the
//! largest total comes first.

use crate::aggregator::{Forest, NodeId, TreeNode};
use std::cmp::Ordering;

/// Ascending sequence id, then descending total time
pub fn compare_siblings(a: &TreeNode<'_>, b: &TreeNode<'_>) -> Ordering {
    a.path
        .sequence_id()
        .cmp(&b.path.sequence_id())
        .then_with(|| b.timer.total_time.cmp(&a.timer.total_time))
}

/// Sorted copy of `ids` (stable, so full ties keep attach order)
pub fn sort_siblings(forest: &Forest<'_>, ids: &[NodeId]) -> Vec<NodeId> {
    let mut sorted = ids.to_vec();
    sorted.sort_by(|&a, &b| compare_siblings(forest.node(a), forest.node(b)));
    sorted
}
