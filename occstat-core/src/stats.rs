//! Aggregate Data Structures
//!
//! [`BenchStats`] maps run name → benchmark → [`Stats`]. Runs keep the order
//! in which they were first seen during a scan; benchmarks keep the order of
//! the configured benchmark list.

use serde::{Deserialize, Serialize};

/// Occupancy totals for one (run, benchmark) pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    /// Sum of sample values
    pub total: u64,
    /// Number of samples
    pub num_kernel: u64,
    /// `total / num_kernel`, or 0 with no samples
    pub average: f64,
}

impl Stats {
    /// Fold one sample value into the totals.
    ///
    /// Returns `false` and leaves the bucket unchanged if the totals would
    /// overflow.
    pub fn record(&mut self, value: u32) -> bool {
        let (Some(total), Some(num_kernel)) = (
            self.total.checked_add(u64::from(value)),
            self.num_kernel.checked_add(1),
        ) else {
            return false;
        };
        self.total = total;
        self.num_kernel = num_kernel;
        self.refresh_average();
        true
    }

    /// Merge another bucket into this one (trial merging).
    ///
    /// Returns `false` and leaves the bucket unchanged on overflow.
    pub fn merge(&mut self, other: &Stats) -> bool {
        let (Some(total), Some(num_kernel)) = (
            self.total.checked_add(other.total),
            self.num_kernel.checked_add(other.num_kernel),
        ) else {
            return false;
        };
        self.total = total;
        self.num_kernel = num_kernel;
        self.refresh_average();
        true
    }

    fn refresh_average(&mut self) {
        self.average = if self.num_kernel == 0 {
            0.0
        } else {
            self.total as f64 / self.num_kernel as f64
        };
    }
}

/// Stats for one benchmark within a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkStats {
    /// Benchmark name
    pub benchmark: String,
    /// Totals for this benchmark
    pub stats: Stats,
}

/// All benchmark stats for one run name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    /// Run name shared by the run's trial folders
    pub name: String,
    /// One entry per configured benchmark, in report order
    pub benchmarks: Vec<BenchmarkStats>,
}

impl RunStats {
    /// Create a run with an empty bucket for every benchmark
    pub fn new(name: impl Into<String>, benchmarks: &[String]) -> Self {
        Self {
            name: name.into(),
            benchmarks: benchmarks
                .iter()
                .map(|b| BenchmarkStats {
                    benchmark: b.clone(),
                    stats: Stats::default(),
                })
                .collect(),
        }
    }

    /// Look up a benchmark's stats
    pub fn get(&self, benchmark: &str) -> Option<&Stats> {
        self.benchmarks
            .iter()
            .find(|b| b.benchmark == benchmark)
            .map(|b| &b.stats)
    }

    /// Mutable lookup of a benchmark's stats
    pub fn get_mut(&mut self, benchmark: &str) -> Option<&mut Stats> {
        self.benchmarks
            .iter_mut()
            .find(|b| b.benchmark == benchmark)
            .map(|b| &mut b.stats)
    }

    /// Sum of totals across all benchmarks, saturating at `u64::MAX`
    pub fn total(&self) -> u64 {
        self.benchmarks
            .iter()
            .fold(0u64, |acc, b| acc.saturating_add(b.stats.total))
    }

    /// Sum of kernel counts across all benchmarks, saturating at `u64::MAX`
    pub fn num_kernel(&self) -> u64 {
        self.benchmarks
            .iter()
            .fold(0u64, |acc, b| acc.saturating_add(b.stats.num_kernel))
    }
}

/// Occupancy stats for every run found in a scan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchStats {
    benchmarks: Vec<String>,
    runs: Vec<RunStats>,
}

impl BenchStats {
    /// Empty aggregate over the given benchmark list
    pub fn new(benchmarks: Vec<String>) -> Self {
        Self {
            benchmarks,
            runs: Vec::new(),
        }
    }

    /// Benchmark list, in report order
    pub fn benchmarks(&self) -> &[String] {
        &self.benchmarks
    }

    /// Runs in first-seen order
    pub fn runs(&self) -> &[RunStats] {
        &self.runs
    }

    /// Look up a run by name
    pub fn run(&self, name: &str) -> Option<&RunStats> {
        self.runs.iter().find(|r| r.name == name)
    }

    /// Stats for a (run, benchmark) pair
    pub fn get(&self, run: &str, benchmark: &str) -> Option<&Stats> {
        self.run(run)?.get(benchmark)
    }

    /// Get or insert the run, creating a bucket for every benchmark
    pub fn run_entry(&mut self, name: &str) -> &mut RunStats {
        let idx = match self.runs.iter().position(|r| r.name == name) {
            Some(idx) => idx,
            None => {
                self.runs.push(RunStats::new(name, &self.benchmarks));
                self.runs.len() - 1
            }
        };
        &mut self.runs[idx]
    }

    /// Number of runs
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    /// Whether no run was collected
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }
}
