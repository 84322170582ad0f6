//! Per-context recording and the session that collects contributions.
//!
//! Each execution context (the driver thread, every worker) owns a
//! [`Recorder`] and writes to it without any locking. When a context is
//! done it hands its map to the [`RecordingSession`], which merges it into
//! the session aggregate under a single lock. Report generation reads a
//! copy of that aggregate and never touches a live recorder.

use super::path::TimingPath;
use super::sequence::SequenceAllocator;
use super::timer::Timer;
use super::TimerMap;
use crate::aggregator::merge_into;
use log::debug;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

/// Local timer mapping of one contributor
#[derive(Debug)]
pub struct Recorder {
    sequence: &'static SequenceAllocator,
    timers: TimerMap,
}

impl Recorder {
    /// Recorder drawing ids from the process-wide allocator
    pub fn new() -> Self {
        Self::with_sequence(SequenceAllocator::global())
    }

    pub fn with_sequence(sequence: &'static SequenceAllocator) -> Self {
        Self {
            sequence,
            timers: TimerMap::new(),
        }
    }

    /// New top-level operation
    pub fn root(&self, name: impl Into<String>) -> TimingPath {
        TimingPath::root(name, self.sequence.next_id())
    }

    /// New synchronous sub-operation of `parent`
    pub fn child(&self, parent: &TimingPath, name: impl Into<String>) -> TimingPath {
        parent.child(name, self.sequence.next_id())
    }

    /// New deferred/distributed sub-operation of `parent`
    pub fn distributed(&self, parent: &TimingPath, name: impl Into<String>) -> TimingPath {
        parent.distributed_child(name, self.sequence.next_id())
    }

    /// Append one sample for `path`, creating its timer on first use
    pub fn record(&mut self, path: &TimingPath, elapsed: Duration) {
        match self.timers.get_mut(path) {
            Some(timer) => timer.record(elapsed),
            None => {
                self.timers.insert(path.clone(), Timer::from_sample(elapsed));
            }
        }
    }

    /// Run `f` and record its wall-clock time under `path`
    pub fn time<T>(&mut self, path: &TimingPath, f: impl FnOnce() -> T) -> T {
        let start = Instant::now();
        let result = f();
        self.record(path, start.elapsed());
        result
    }

    pub fn timer(&self, path: &TimingPath) -> Option<&Timer> {
        self.timers.get(path)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Copy of the local mapping
    pub fn snapshot(&self) -> TimerMap {
        self.timers.clone()
    }

    pub fn into_timers(self) -> TimerMap {
        self.timers
    }
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}

/// Record into `recorder` if one is active, otherwise do nothing
pub fn record(recorder: Option<&mut Recorder>, path: &TimingPath, elapsed: Duration) {
    if let Some(recorder) = recorder {
        recorder.record(path, elapsed);
    }
}

/// Time `f` into `recorder` if one is active; `f` always runs
pub fn time<T>(recorder: Option<&mut Recorder>, path: &TimingPath, f: impl FnOnce() -> T) -> T {
    match recorder {
        Some(recorder) => recorder.time(path, f),
        None => f(),
    }
}

/// Aggregation point for one recording session
///
/// `submit` may be called from any thread, any number of times; the
/// merged result does not depend on the order of submissions.
#[derive(Debug)]
pub struct RecordingSession {
    name: String,
    sequence: &'static SequenceAllocator,
    state: Mutex<SessionState>,
}

#[derive(Debug, Default)]
struct SessionState {
    merged: TimerMap,
    contributions: usize,
}

impl RecordingSession {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_sequence(name, SequenceAllocator::global())
    }

    pub fn with_sequence(name: impl Into<String>, sequence: &'static SequenceAllocator) -> Self {
        Self {
            name: name.into(),
            sequence,
            state: Mutex::new(SessionState::default()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// A fresh local recorder for one contributor of this session
    pub fn recorder(&self) -> Recorder {
        Recorder::with_sequence(self.sequence)
    }

    /// Merge one contributor's mapping into the session aggregate
    pub fn submit(&self, timers: TimerMap) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        debug!(
            "Session '{}': merging contribution with {} timers",
            self.name,
            timers.len()
        );
        merge_into(&mut state.merged, timers);
        state.contributions += 1;
    }

    /// Convenience for `submit(recorder.into_timers())`
    pub fn submit_recorder(&self, recorder: Recorder) {
        self.submit(recorder.into_timers());
    }

    /// Copy of the merged mapping at this point in time
    pub fn snapshot(&self) -> TimerMap {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .merged
            .clone()
    }

    /// Number of submitted contributions
    pub fn contributions(&self) -> usize {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contributions
    }
}
