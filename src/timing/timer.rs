//! Accumulated observations for a single `TimingPath`.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Cumulative statistics over every recorded invocation of one path
///
/// An empty timer (`count == 0`) is the identity for [`Timer::merge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Timer {
    /// Sum of all recorded durations
    #[serde(rename = "total_ns", with = "crate::utils::nanos")]
    pub total_time: Duration,

    /// Number of recorded invocations
    pub count: u64,

    /// Shortest recorded invocation
    #[serde(rename = "min_ns", with = "crate::utils::nanos")]
    pub min: Duration,

    /// Longest recorded invocation
    #[serde(rename = "max_ns", with = "crate::utils::nanos")]
    pub max: Duration,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timer holding a single sample
    pub fn from_sample(elapsed: Duration) -> Self {
        Self {
            total_time: elapsed,
            count: 1,
            min: elapsed,
            max: elapsed,
        }
    }

    /// Append one invocation
    pub fn record(&mut self, elapsed: Duration) {
        self.merge(&Timer::from_sample(elapsed));
    }

    /// Fold another contributor's statistics into this one
    ///
    /// Sums total and count, keeps the smaller min and larger max.
    /// Empty timers are ignored so they never pull `min` down to zero.
    pub fn merge(&mut self, other: &Timer) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = *other;
            return;
        }
        self.total_time = self.total_time.saturating_add(other.total_time);
        self.count += other.count;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }

    /// Combined copy of two timers
    pub fn merged(mut self, other: &Timer) -> Timer {
        self.merge(other);
        self
    }

    /// Mean duration per invocation (zero for an empty timer)
    pub fn mean(&self) -> Duration {
        if self.count == 0 {
            return Duration::ZERO;
        }
        let nanos = self.total_time.as_nanos() / self.count as u128;
        Duration::from_nanos(nanos.min(u64::MAX as u128) as u64)
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
