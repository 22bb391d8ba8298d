#![warn(missing_docs)]
//! occstat Core - Occupancy Collection
//!
//! This crate scans benchmark run folders and collects occupancy samples:
//! - [`build_plan`] lists run folders and splits `<run-name>-<run-number>`
//! - [`Collector`] reads `<folder>/<bench>/<bench>.log` and folds samples
//!   into [`BenchStats`], merging trials that share a run name
//! - [`SampleRule`] parses one log line; [`OccupancyPattern`] is the default

mod collector;
mod plan;
mod sample;
mod stats;

pub use collector::{CollectError, Collection, Collector, CollectorConfig, MissingLog};
pub use plan::{RunFolder, ScanPlan, build_plan};
pub use sample::{DEFAULT_PATTERN, OccupancyPattern, OccupancySample, PatternError, SampleRule};
pub use stats::{BenchStats, BenchmarkStats, RunStats, Stats};

/// Benchmarks reported on, in report order
pub const BENCHMARKS: &[&str] = &[
    "densenet121",
    "densenet169",
    "densenet201",
    "inception_resnet_v2",
    "inception_v3",
    "mobilenet",
    "nasnet_large",
    "nasnet_mobile",
    "resnet50",
    "vgg16",
    "vgg19",
    "xception",
    "imdb_lstm",
];

/// Kernels printed before scheduling runs; their occupancy is not counted
pub const IGNORED_KERNELS: &[&str] = &[
    "copyBufferRect",
    "copyBufferRectAligned",
    "copyBuffer",
    "copyBufferAligned",
    "fillBuffer",
    "copyBufferToImage",
    "copyImageToBuffer",
    "copyImage",
    "copyImage1DA",
    "fillImage",
    "scheduler",
];

/// Owned copy of [`BENCHMARKS`]
pub fn default_benchmarks() -> Vec<String> {
    BENCHMARKS.iter().map(|s| s.to_string()).collect()
}

/// Owned copy of [`IGNORED_KERNELS`]
pub fn default_ignored_kernels() -> Vec<String> {
    IGNORED_KERNELS.iter().map(|s| s.to_string()).collect()
}
