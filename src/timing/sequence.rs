//! Process-wide sequence numbers for timing paths.
//!
//! The only shared mutable state on the recording path: one atomic counter.

use std::sync::atomic::{AtomicU64, Ordering};

/// Atomically incremented source of sequence ids
///
/// Every call to [`SequenceAllocator::next_id`] returns a value strictly
/// greater than any value previously returned by the same allocator.
#[derive(Debug)]
pub struct SequenceAllocator {
    counter: AtomicU64,
}

static GLOBAL: SequenceAllocator = SequenceAllocator::new();

impl SequenceAllocator {
    pub const fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
        }
    }

    /// The allocator shared by every recorder in the process
    pub fn global() -> &'static SequenceAllocator {
        &GLOBAL
    }

    /// Allocate the next id (first id is 1)
    pub fn next_id(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Last id handed out, 0 if none
    pub fn current(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }
}

impl Default for SequenceAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_ids_strictly_increase() {
        let alloc = SequenceAllocator::new();
        let first = alloc.next_id();
        let second = alloc.next_id();
        assert_eq!(first, 1);
        assert!(second > first);
        assert_eq!(alloc.current(), 2);
    }

    #[test]
    fn test_concurrent_allocation_is_unique() {
        let alloc = Arc::new(SequenceAllocator::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let alloc = Arc::clone(&alloc);
                thread::spawn(move || {
                    let mut ids = Vec::with_capacity(1000);
                    let mut last = 0;
                    for _ in 0..1000 {
                        let id = alloc.next_id();
                        assert!(id > last);
                        last = id;
                        ids.push(id);
                    }
                    ids
                })
            })
            .collect();

        let mut all = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(all.insert(id));
            }
        }
        assert_eq!(all.len(), 8000);
        assert_eq!(alloc.current(), 8000);
    }
}
