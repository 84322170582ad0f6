//! Timing Tree
//!
//! Hierarchical timing aggregation for computations that run on a
//! driver and fan out to workers.
//!
//! Operations are recorded under a [`timing::TimingPath`], merged across
//! contributors, rebuilt into a forest, and rendered as a timings table
//! plus a table of distributed operations correlated with stage metadata.
//!
//! ## Getting Started
//!
//! ```bash
//! timing-tree report --snapshot driver.json --snapshot worker-1.json
//! timing-tree --help
//! ```

pub mod aggregator;
pub mod commands;
pub mod output;
pub mod report;
pub mod timing;
pub mod utils;
