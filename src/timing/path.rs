//! Identity of a recorded timer within the call hierarchy.
//!
//! A `TimingPath` is an immutable, cheaply clonable handle. Parents are
//! shared through `Arc`, so a child keeps its whole ancestry alive and
//! paths can be handed to other threads or serialized for workers.
//!
//! Equality and hashing use (name, sequence id, parent path) only. The
//! depth is derived from the chain and the distributed flag is a property
//! of the path, not part of its identity.
//!
//! Each node stores a fingerprint folded from its parent's fingerprint and
//! its own (name, sequence id), so hashing is constant time at any depth.

use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[derive(Debug)]
struct PathNode {
    name: String,
    sequence_id: u64,
    depth: usize,
    fingerprint: u64,
    distributed: bool,
    parent: Option<TimingPath>,
}

// Unlinks the parent chain iteratively so dropping a deep path does not
// recurse once per level.
impl Drop for PathNode {
    fn drop(&mut self) {
        let mut next = self.parent.take();
        while let Some(path) = next {
            match Arc::try_unwrap(path.0) {
                Ok(mut node) => next = node.parent.take(),
                Err(_) => break,
            }
        }
    }
}

/// Unique identity of one recorded timer
#[derive(Clone)]
pub struct TimingPath(Arc<PathNode>);

/// One level of a path in root-first order (serialized form)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSegment {
    pub name: String,
    pub sequence_id: u64,
    #[serde(default)]
    pub distributed: bool,
}

impl TimingPath {
    fn new(
        name: impl Into<String>,
        sequence_id: u64,
        parent: Option<&TimingPath>,
        distributed: bool,
    ) -> Self {
        let name = name.into();
        let depth = parent.map_or(0, |p| p.depth() + 1);
        let fingerprint = fingerprint(parent, &name, sequence_id);
        Self(Arc::new(PathNode {
            name,
            sequence_id,
            depth,
            fingerprint,
            distributed,
            parent: parent.cloned(),
        }))
    }

    /// Create a root path (depth 0)
    pub fn root(name: impl Into<String>, sequence_id: u64) -> Self {
        Self::new(name, sequence_id, None, false)
    }

    /// Create a root path for an operation that runs on workers
    pub fn distributed_root(name: impl Into<String>, sequence_id: u64) -> Self {
        Self::new(name, sequence_id, None, true)
    }

    /// Create a synchronous sub-operation of `self`
    pub fn child(&self, name: impl Into<String>, sequence_id: u64) -> Self {
        Self::new(name, sequence_id, Some(self), false)
    }

    /// Create a sub-operation of `self` whose body may run later, elsewhere
    pub fn distributed_child(&self, name: impl Into<String>, sequence_id: u64) -> Self {
        Self::new(name, sequence_id, Some(self), true)
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn sequence_id(&self) -> u64 {
        self.0.sequence_id
    }

    /// Distance from the root (roots are 0)
    pub fn depth(&self) -> usize {
        self.0.depth
    }

    pub fn parent(&self) -> Option<&TimingPath> {
        self.0.parent.as_ref()
    }

    pub fn is_root(&self) -> bool {
        self.0.parent.is_none()
    }

    pub fn is_distributed_operation(&self) -> bool {
        self.0.distributed
    }

    /// Strict ancestors, nearest first
    pub fn ancestors(&self) -> Ancestors<'_> {
        Ancestors {
            next: self.parent(),
        }
    }

    /// Serializable root-first representation
    pub fn segments(&self) -> Vec<PathSegment> {
        let mut segments: Vec<PathSegment> = std::iter::once(self)
            .chain(self.ancestors())
            .map(|p| PathSegment {
                name: p.name().to_string(),
                sequence_id: p.sequence_id(),
                distributed: p.is_distributed_operation(),
            })
            .collect();
        segments.reverse();
        segments
    }
}

/// Rebuilds serialized paths so equal prefixes share one node
///
/// Paths rebuilt through the same interner compare in constant time
/// against each other's parents.
#[derive(Debug, Default)]
pub(crate) struct PathInterner {
    known: HashSet<TimingPath>,
}

impl PathInterner {
    /// Returns `None` for an empty slice
    pub(crate) fn rebuild(&mut self, segments: &[PathSegment]) -> Option<TimingPath> {
        let mut current: Option<TimingPath> = None;
        for segment in segments {
            let candidate = TimingPath::new(
                segment.name.clone(),
                segment.sequence_id,
                current.as_ref(),
                segment.distributed,
            );
            let shared = match self.known.get(&candidate) {
                Some(existing) => existing.clone(),
                None => {
                    self.known.insert(candidate.clone());
                    candidate
                }
            };
            current = Some(shared);
        }
        current
    }
}

fn fingerprint(parent: Option<&TimingPath>, name: &str, sequence_id: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    parent.map(|p| p.0.fingerprint).hash(&mut hasher);
    sequence_id.hash(&mut hasher);
    name.hash(&mut hasher);
    hasher.finish()
}

/// Iterator over the strict ancestors of a path
pub struct Ancestors<'a> {
    next: Option<&'a TimingPath>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a TimingPath;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.parent();
        Some(current)
    }
}

// Rejects on depth or fingerprint first. Otherwise walks both chains in
// lock step until they meet at a shared node.
impl PartialEq for TimingPath {
    fn eq(&self, other: &Self) -> bool {
        if self.depth() != other.depth() || self.0.fingerprint != other.0.fingerprint {
            return false;
        }
        let mut left = Some(self);
        let mut right = Some(other);
        while let (Some(a), Some(b)) = (left, right) {
            if Arc::ptr_eq(&a.0, &b.0) {
                return true;
            }
            if a.sequence_id() != b.sequence_id() || a.name() != b.name() {
                return false;
            }
            left = a.parent();
            right = b.parent();
        }
        left.is_none() && right.is_none()
    }
}

impl Eq for TimingPath {}

impl Hash for TimingPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.0.fingerprint);
    }
}

impl fmt::Debug for TimingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimingPath({}", self)?;
        if self.is_distributed_operation() {
            write!(f, ", distributed")?;
        }
        write!(f, ")")
    }
}

/// Renders as `root#1/child#2`
impl fmt::Display for TimingPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let segments = self.segments();
        for (i, segment) in segments.iter().enumerate() {
            if i > 0 {
                write!(f, "/")?;
            }
            write!(f, "{}#{}", segment.name, segment.sequence_id)?;
        }
        Ok(())
    }
}
