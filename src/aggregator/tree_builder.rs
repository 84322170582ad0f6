//! Reconstruct the call tree from a flat, path-keyed timer map.
//!
//! Nodes live in a flat arena and refer to each other by index, so parent
//! links are plain integers and ancestor walks are O(depth).
//!
//! # Algorithm
//! 1. Partition paths by depth
//! 2. Depth 0 paths become roots
//! 3. For each following depth, look each path's parent up in the
//!    previous level only; attach when found, drop when not
//! 4. Stop at the first level that yields no node
//!
//! Children always have their parent exactly one level up, so a single
//! forward pass per level is enough and no recursion is involved.

use super::adjust::subtract_from_ancestors;
use crate::timing::{Timer, TimerMap, TimingPath};
use log::{debug, warn};
use std::collections::HashMap;
use std::time::Duration;

/// Index of a node in its [`Forest`]
pub type NodeId = usize;

/// One reconstructed operation
#[derive(Debug, Clone)]
pub struct TreeNode<'a> {
    pub path: &'a TimingPath,
    pub timer: &'a Timer,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) adjusted_driver_nanos: i128,
}

impl<'a> TreeNode<'a> {
    fn new(path: &'a TimingPath, timer: &'a Timer, parent: Option<NodeId>) -> Self {
        Self {
            path,
            timer,
            parent,
            children: Vec::new(),
            adjusted_driver_nanos: duration_nanos(timer.total_time),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in attach order (not sorted for display)
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Total time minus every nested distributed operation, in nanoseconds
    ///
    /// May be negative when concurrent distributed work exceeds the
    /// operation's own measured interval.
    pub fn adjusted_driver_time(&self) -> i128 {
        self.adjusted_driver_nanos
    }

    pub fn is_distributed_operation(&self) -> bool {
        self.path.is_distributed_operation()
    }
}

/// All trees rebuilt from one merged map
#[derive(Debug, Clone, Default)]
pub struct Forest<'a> {
    pub(crate) nodes: Vec<TreeNode<'a>>,
    pub(crate) roots: Vec<NodeId>,
    dropped: Vec<&'a TimingPath>,
}

impl<'a> Forest<'a> {
    pub fn node(&self, id: NodeId) -> &TreeNode<'a> {
        &self.nodes[id]
    }

    /// Roots in registration order
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn nodes(&self) -> &[TreeNode<'a>] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Paths left out because their parent was never recorded
    /// (directly, or through a dropped ancestor)
    pub fn dropped(&self) -> &[&'a TimingPath] {
        &self.dropped
    }

    pub fn find(&self, path: &TimingPath) -> Option<NodeId> {
        self.nodes.iter().position(|node| node.path == path)
    }

    /// Strict ancestors of `id`, nearest first
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.nodes[id].parent, move |&p| self.nodes[p].parent)
    }

    fn push(&mut self, path: &'a TimingPath, timer: &'a Timer, parent: Option<NodeId>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(TreeNode::new(path, timer, parent));
        match parent {
            Some(p) => self.nodes[p].children.push(id),
            None => self.roots.push(id),
        }
        id
    }
}

/// Build the forest for `timers` and apply the distributed-time adjustment
///
/// Paths whose parent is absent are dropped and reported through
/// [`Forest::dropped`]; they never cause other nodes to be dropped.
pub fn build_forest(timers: &TimerMap) -> Forest<'_> {
    let levels = partition_by_depth(timers);
    let mut forest = Forest::default();
    let mut previous: HashMap<&TimingPath, NodeId> = HashMap::new();
    let mut levels = levels.into_iter();

    for (depth, level) in levels.by_ref().enumerate() {
        let mut current: HashMap<&TimingPath, NodeId> = HashMap::with_capacity(level.len());

        for (path, timer) in level {
            let parent = match path.parent() {
                None => None,
                Some(parent_path) => match previous.get(parent_path) {
                    Some(&id) => Some(id),
                    None => {
                        debug!("Dropping {}: parent {} was not recorded", path, parent_path);
                        forest.dropped.push(path);
                        continue;
                    }
                },
            };

            let id = forest.push(path, timer, parent);
            if path.is_distributed_operation() {
                subtract_from_ancestors(&mut forest, id);
            }
            current.insert(path, id);
        }

        debug!("Depth {}: {} nodes attached", depth, current.len());
        if current.is_empty() {
            break;
        }
        previous = current;
    }

    // Everything below the first empty level is unreachable
    for level in levels {
        forest.dropped.extend(level.into_iter().map(|(path, _)| path));
    }

    if !forest.dropped.is_empty() {
        warn!(
            "{} timing paths dropped from the report: their parent operations were never recorded",
            forest.dropped.len()
        );
    }

    forest
}

/// Group paths by depth, each level ordered by (sequence id, name)
fn partition_by_depth(timers: &TimerMap) -> Vec<Vec<(&TimingPath, &Timer)>> {
    let mut levels: Vec<Vec<(&TimingPath, &Timer)>> = Vec::new();
    for (path, timer) in timers {
        let depth = path.depth();
        if levels.len() <= depth {
            levels.resize_with(depth + 1, Vec::new);
        }
        levels[depth].push((path, timer));
    }
    for level in &mut levels {
        level.sort_by(|(a, _), (b, _)| {
            a.sequence_id()
                .cmp(&b.sequence_id())
                .then_with(|| a.name().cmp(b.name()))
        });
    }
    levels
}

pub(crate) fn duration_nanos(duration: Duration) -> i128 {
    duration.as_nanos() as i128
}
