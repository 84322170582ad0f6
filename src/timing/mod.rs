//! Timer data model: paths, accumulated timers and local recording.
//!
//! This module provides:
//! - `TimingPath` identity with structural equality
//! - `Timer` statistics and their merge
//! - The process-wide sequence allocator
//! - Per-context `Recorder`s and the `RecordingSession` that collects them

pub mod path;
pub mod recorder;
pub mod sequence;
pub mod timer;

use std::collections::HashMap;

/// One contributor's (or the merged) mapping from path to timer
pub type TimerMap = HashMap<TimingPath, Timer>;

// Re-export main types
pub use path::{PathSegment, TimingPath};
pub use recorder::{record, time, Recorder, RecordingSession};
pub use sequence::SequenceAllocator;
pub use timer::Timer;
