//! Run Summaries
//!
//! Reduces [`BenchStats`] to what the reports print:
//! - Per-benchmark averages, in benchmark-list order
//! - One grand average per run, `sum(total) / sum(num_kernel)`
//!
//! The grand average is a kernel-weighted mean over all benchmarks, not the
//! mean of the per-benchmark averages.

use occstat_core::{BenchStats, RunStats};
use serde::{Deserialize, Serialize};

/// Average occupancy for one benchmark
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkAverage {
    /// Benchmark name
    pub benchmark: String,
    /// Sum of sample values
    pub total: u64,
    /// Number of samples
    pub num_kernel: u64,
    /// 0 when `num_kernel == 0`
    pub average: f64,
}

/// Summary of one run name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Run name
    pub name: String,
    /// One entry per benchmark, in report order
    pub benchmarks: Vec<BenchmarkAverage>,
    /// Sum of totals across benchmarks
    pub total: u64,
    /// Sum of kernel counts across benchmarks
    pub num_kernel: u64,
    /// `None` when the run has no kernels
    pub average: Option<f64>,
}

/// Summarize a single run
pub fn summarize_run(run: &RunStats, benchmarks: &[String]) -> RunSummary {
    let mut total = 0u64;
    let mut num_kernel = 0u64;

    let averages = benchmarks
        .iter()
        .map(|bench| {
            let stats = run.get(bench).copied().unwrap_or_default();
            total = total.saturating_add(stats.total);
            num_kernel = num_kernel.saturating_add(stats.num_kernel);
            BenchmarkAverage {
                benchmark: bench.clone(),
                total: stats.total,
                num_kernel: stats.num_kernel,
                average: average(stats.total, stats.num_kernel).unwrap_or(0.0),
            }
        })
        .collect();

    RunSummary {
        name: run.name.clone(),
        benchmarks: averages,
        total,
        num_kernel,
        average: average(total, num_kernel),
    }
}

/// Summarize every run, in collection order
pub fn summarize(stats: &BenchStats) -> Vec<RunSummary> {
    stats
        .runs()
        .iter()
        .map(|run| summarize_run(run, stats.benchmarks()))
        .collect()
}

/// `total / count`, or `None` for an empty set
pub fn average(total: u64, count: u64) -> Option<f64> {
    if count == 0 {
        None
    } else {
        Some(total as f64 / count as f64)
    }
}
