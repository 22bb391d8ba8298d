//! Report Data Structures

use chrono::{DateTime, Utc};
use occstat_core::{Collection, MissingLog};
use occstat_stats::{RunSummary, summarize};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current JSON schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Complete occupancy report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report metadata
    pub meta: ReportMeta,
    /// Per-run summaries
    pub runs: Vec<RunSummary>,
    /// Logs that were not found
    pub missing_logs: Vec<MissingLogEntry>,
    /// Totals over the whole scan
    pub summary: ReportSummary,
}

/// Report metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Schema version for compatibility
    pub schema_version: u32,
    /// occstat version
    pub version: String,
    /// When the report was generated
    pub timestamp: DateTime<Utc>,
    /// Directory that was scanned
    pub input_dir: String,
    /// Benchmark list, in report order
    pub benchmarks: Vec<String>,
}

/// A log file the collector expected but did not find
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissingLogEntry {
    /// Run name of the folder
    pub run_name: String,
    /// Run number of the folder
    pub run_number: String,
    /// Benchmark whose log is missing
    pub benchmark: String,
    /// Path that was looked up
    pub path: String,
}

impl From<&MissingLog> for MissingLogEntry {
    fn from(missing: &MissingLog) -> Self {
        Self {
            run_name: missing.run_name.clone(),
            run_number: missing.run_number.clone(),
            benchmark: missing.benchmark.clone(),
            path: missing.path.display().to_string(),
        }
    }
}

/// Report summary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Distinct run names
    pub total_runs: usize,
    /// Run folders scanned
    pub folders_scanned: usize,
    /// Missing log count
    pub missing_logs: usize,
    /// Kernels counted across all runs
    pub total_kernels: u64,
    /// Runs that produced no kernels at all
    pub empty_runs: usize,
}

/// Build a report from a finished collection
pub fn build_report(collection: &Collection, input_dir: &Path) -> Report {
    let runs = summarize(&collection.stats);

    let summary = ReportSummary {
        total_runs: runs.len(),
        folders_scanned: collection.folders,
        missing_logs: collection.missing.len(),
        total_kernels: runs
            .iter()
            .fold(0u64, |acc, r| acc.saturating_add(r.num_kernel)),
        empty_runs: runs.iter().filter(|r| r.num_kernel == 0).count(),
    };

    Report {
        meta: ReportMeta {
            schema_version: SCHEMA_VERSION,
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            input_dir: input_dir.display().to_string(),
            benchmarks: collection.stats.benchmarks().to_vec(),
        },
        runs,
        missing_logs: collection.missing.iter().map(MissingLogEntry::from).collect(),
        summary,
    }
}
