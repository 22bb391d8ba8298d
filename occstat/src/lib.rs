#![warn(missing_docs)]
//! # occstat
//!
//! Aggregates scheduler occupancy statistics from benchmark run logs.
//!
//! A run directory looks like:
//!
//! ```text
//! runs/
//! ├── optsched-01/
//! │   ├── densenet121/densenet121.log
//! │   └── vgg16/vgg16.log
//! ├── optsched-02/
//! └── amd-01/
//! ```
//!
//! Folders sharing a run name (`optsched-01`, `optsched-02`) are trials of
//! the same configuration and are merged. Every log line of the form
//! `Final occupancy for function <kernel>:<value>` contributes one sample.
//!
//! ## Library use
//!
//! ```ignore
//! use occstat::{Collector, CollectorConfig, summarize, format_console_report};
//!
//! let collection = Collector::new(CollectorConfig::default())
//!     .collect(std::path::Path::new("runs"), &[])?;
//! print!("{}", format_console_report(&summarize(&collection.stats)));
//! ```

// Re-export collection types
pub use occstat_core::{
    BENCHMARKS, BenchStats, CollectError, Collection, Collector, CollectorConfig,
    IGNORED_KERNELS, MissingLog, OccupancyPattern, OccupancySample, RunFolder, RunStats,
    SampleRule, ScanPlan, Stats, build_plan,
};

// Re-export stats
pub use occstat_stats::{BenchmarkAverage, RunSummary, summarize};

// Re-export reporting
pub use occstat_report::{
    Report, ReportError, build_report, column_label, format_console_report,
    generate_json_report, resolve_output_path, write_spreadsheet,
};

/// Run the occstat CLI.
///
/// ```ignore
/// fn main() -> anyhow::Result<()> {
///     occstat::run()
/// }
/// ```
pub use occstat_cli::run;
