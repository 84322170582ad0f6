//! Aggregation of contributor timer maps into an adjusted call forest.
//!
//! This module transforms recorded timers into:
//! - One merged map (commutative, associative merge)
//! - An arena-backed forest of tree nodes
//! - Driver times corrected for nested distributed operations

pub mod adjust;
pub mod merge;
pub mod tree_builder;

// Re-export main types and functions
pub use adjust::adjust;
pub use merge::{merge, merge_all, merge_into, total_recorded};
pub use tree_builder::{build_forest, Forest, NodeId, TreeNode};
