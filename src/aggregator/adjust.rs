//! Remove double-counted distributed time from ancestor driver totals.
//!
//! A distributed operation's timer measures work that may overlap with, or
//! be deferred past, its logical parent's interval. Every strict ancestor
//! of such a node has the node's total subtracted from its adjusted driver
//! time, regardless of other distributed nodes on the way up. Subtraction
//! commutes, so the order in which nodes are processed does not matter.
//! Results are not clamped and can go negative.

use super::tree_builder::{duration_nanos, Forest, NodeId};

/// Subtract the total of distributed node `id` from all of its ancestors
pub(crate) fn subtract_from_ancestors(forest: &mut Forest<'_>, id: NodeId) {
    let amount = duration_nanos(forest.nodes[id].timer.total_time);
    let mut current = forest.nodes[id].parent;
    while let Some(ancestor) = current {
        let node = &mut forest.nodes[ancestor];
        node.adjusted_driver_nanos -= amount;
        current = node.parent;
    }
}

/// Recompute every node's adjusted driver time from scratch
///
/// [`build_forest`](super::build_forest) already applies the adjustment;
/// this pass is for forests whose adjusted values must be re-derived.
pub fn adjust(forest: &mut Forest<'_>) {
    for node in &mut forest.nodes {
        node.adjusted_driver_nanos = duration_nanos(node.timer.total_time);
    }
    let distributed: Vec<NodeId> = forest
        .nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| node.is_distributed_operation())
        .map(|(id, _)| id)
        .collect();
    for id in distributed {
        subtract_from_ancestors(forest, id);
    }
}
