#![warn(missing_docs)]
//! occstat Statistics
//!
//! Pure reductions over collected occupancy stats:
//! - Per-benchmark average occupancy
//! - Kernel-weighted grand average per run

mod summary;

pub use summary::{BenchmarkAverage, RunSummary, average, summarize, summarize_run};
