//! Occupancy Collector
//!
//! Walks run folders and folds every occupancy sample into [`BenchStats`].
//!
//! ## Pipeline
//!
//! ```text
//! input dir
//!     │
//!     ▼
//! ┌─────────────┐
//! │    plan     │  List run folders, drop excluded ones
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │    scan     │  <folder>/<bench>/<bench>.log, one line at a time
//! └──────┬──────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │ accumulate  │  Merge into (run name, benchmark) buckets
//! └─────────────┘
//! ```

use crate::plan::{RunFolder, ScanPlan, build_plan};
use crate::sample::{OccupancyPattern, SampleRule};
use crate::stats::{BenchStats, Stats};
use crate::{default_benchmarks, default_ignored_kernels};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that abort a collection
#[derive(Debug, Error)]
pub enum CollectError {
    /// The input directory could not be stat'ed
    #[error("cannot read input directory {path}: {source}")]
    InputDir {
        /// Input directory
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The input path exists but is not a directory
    #[error("input path is not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Listing the run folders failed
    #[error("failed to list run folders: {0}")]
    Walk(#[from] walkdir::Error),

    /// A log file exists but could not be read
    #[error("failed to read log file {path}: {source}")]
    Log {
        /// Log file path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// A benchmark log that was expected but not found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingLog {
    /// Run name of the folder
    pub run_name: String,
    /// Run number of the folder
    pub run_number: String,
    /// Benchmark whose log is missing
    pub benchmark: String,
    /// Path that was looked up
    pub path: PathBuf,
}

impl std::fmt::Display for MissingLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cannot find log file for {} run {} benchmark {}.",
            self.run_name, self.run_number, self.benchmark
        )
    }
}

/// Result of a collection pass
#[derive(Debug, Clone)]
pub struct Collection {
    /// Aggregated stats per run and benchmark
    pub stats: BenchStats,
    /// Logs that were expected but absent, in scan order
    pub missing: Vec<MissingLog>,
    /// Number of folders scanned
    pub folders: usize,
}

/// Collector settings: the benchmark list and the kernels to discard
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Benchmarks looked up in every run folder, in report order
    pub benchmarks: Vec<String>,
    /// Kernel names whose samples are discarded
    pub ignored_kernels: Vec<String>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            benchmarks: default_benchmarks(),
            ignored_kernels: default_ignored_kernels(),
        }
    }
}

/// Scans run folders with a fixed configuration and line rule
pub struct Collector<R = OccupancyPattern> {
    config: CollectorConfig,
    rule: R,
}

impl Collector<OccupancyPattern> {
    /// Collector using the default occupancy pattern
    pub fn new(config: CollectorConfig) -> Self {
        Self::with_rule(config, OccupancyPattern::default())
    }
}

impl Default for Collector<OccupancyPattern> {
    fn default() -> Self {
        Self::new(CollectorConfig::default())
    }
}

impl<R: SampleRule> Collector<R> {
    /// Collector using a custom line rule
    pub fn with_rule(config: CollectorConfig, rule: R) -> Self {
        Self { config, rule }
    }

    /// Collector configuration
    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Plan and scan `input_dir`, skipping folders or run names in `exclude`
    pub fn collect(&self, input_dir: &Path, exclude: &[String]) -> Result<Collection, CollectError> {
        let plan = build_plan(input_dir, exclude)?;
        self.collect_plan(&plan)
    }

    /// Scan every folder of an existing plan
    pub fn collect_plan(&self, plan: &ScanPlan) -> Result<Collection, CollectError> {
        let mut stats = BenchStats::new(self.config.benchmarks.clone());
        let mut missing = Vec::new();

        for folder in &plan.folders {
            tracing::debug!(
                "scanning {} (run {} #{})",
                folder.path.display(),
                folder.run_name,
                folder.run_number
            );
            self.collect_folder(folder, &mut stats, &mut missing)?;
        }

        Ok(Collection {
            stats,
            missing,
            folders: plan.folders.len(),
        })
    }

    fn collect_folder(
        &self,
        folder: &RunFolder,
        stats: &mut BenchStats,
        missing: &mut Vec<MissingLog>,
    ) -> Result<(), CollectError> {
        // The run gets a bucket per benchmark even if every log is missing
        stats.run_entry(&folder.run_name);

        for bench in &self.config.benchmarks {
            let path = folder.log_path(bench);
            if !path.is_file() {
                let entry = MissingLog {
                    run_name: folder.run_name.clone(),
                    run_number: folder.run_number.clone(),
                    benchmark: bench.clone(),
                    path,
                };
                tracing::warn!("{}", entry);
                missing.push(entry);
                continue;
            }

            let found = self.scan_log(&path)?;
            tracing::debug!(
                "{}: {} kernels, total {}",
                path.display(),
                found.num_kernel,
                found.total
            );
            if let Some(bucket) = stats.run_entry(&folder.run_name).get_mut(bench) {
                if !bucket.merge(&found) {
                    tracing::warn!(
                        "dropping {}: totals for {} {} would overflow",
                        path.display(),
                        folder.run_name,
                        bench
                    );
                }
            }
        }

        Ok(())
    }

    /// Scan a single log file and return its stats
    pub fn scan_log(&self, path: &Path) -> Result<Stats, CollectError> {
        let file = File::open(path).map_err(|source| CollectError::Log {
            path: path.to_path_buf(),
            source,
        })?;
        self.scan_reader(BufReader::new(file))
            .map_err(|source| CollectError::Log {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Scan lines from any buffered reader
    pub fn scan_reader(&self, mut reader: impl BufRead) -> std::io::Result<Stats> {
        let mut stats = Stats::default();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            let line = line.trim_end_matches(['\n', '\r']);

            let Some(sample) = self.rule.parse(line) else {
                continue;
            };
            if self.is_ignored(&sample.kernel) {
                continue;
            }
            if !stats.record(sample.value) {
                tracing::debug!(
                    "skipping occupancy for {}: {} (total would overflow)",
                    sample.kernel,
                    sample.value
                );
            }
        }

        Ok(stats)
    }

    /// Whether a kernel is on the ignore list
    pub fn is_ignored(&self, kernel: &str) -> bool {
        self.config.ignored_kernels.iter().any(|k| k == kernel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::OccupancySample;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn write_log(root: &Path, folder: &str, bench: &str, contents: &str) {
        let dir = root.join(folder).join(bench);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(format!("{}.log", bench)), contents).unwrap();
    }

    fn small_config() -> CollectorConfig {
        CollectorConfig {
            benchmarks: vec!["densenet121".to_string(), "vgg16".to_string()],
            ignored_kernels: default_ignored_kernels(),
        }
    }

    #[test]
    fn test_scan_reader_skips_ignored_and_unmatched() {
        let collector = Collector::new(CollectorConfig::default());
        let log = "\
Compiling...
Final occupancy for function conv1:50
Final occupancy for function scheduler:99
Final occupancy for function fillBuffer:10
random noise
Final occupancy for function conv2:30
";
        let stats = collector.scan_reader(Cursor::new(log)).unwrap();
        assert_eq!(stats.total, 80);
        assert_eq!(stats.num_kernel, 2);
        assert!((stats.average - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_scan_reader_handles_crlf_and_invalid_utf8() {
        let collector = Collector::new(CollectorConfig::default());
        let mut log = b"Final occupancy for function conv1:8\r\n\xff\xfe garbage\n".to_vec();
        log.extend_from_slice(b"Final occupancy for function conv2:4");
        let stats = collector.scan_reader(Cursor::new(log)).unwrap();
        assert_eq!(stats.total, 12);
        assert_eq!(stats.num_kernel, 2);
    }

    #[test]
    fn test_huge_values_never_overflow() {
        let collector = Collector::new(CollectorConfig::default());
        let log = "\
Final occupancy for function a:18446744073709551615
Final occupancy for function b:1
Final occupancy for function c:4294967295
Final occupancy for function d:4294967295
";
        let stats = collector.scan_reader(Cursor::new(log)).unwrap();
        assert_eq!(stats.num_kernel, 3);
        assert_eq!(stats.total, 1 + 2 * u64::from(u32::MAX));
    }

    #[test]
    fn test_single_trial() {
        let dir = tempdir().unwrap();
        write_log(
            dir.path(),
            "optsched-01",
            "densenet121",
            "Final occupancy for function conv1:50\nFinal occupancy for function scheduler:99\n",
        );

        let collector = Collector::new(small_config());
        let collection = collector.collect(dir.path(), &[]).unwrap();

        let stats = collection.stats.get("optsched", "densenet121").unwrap();
        assert_eq!(stats.total, 50);
        assert_eq!(stats.num_kernel, 1);
        assert!((stats.average - 50.0).abs() < f64::EPSILON);
        assert_eq!(collection.folders, 1);
    }

    #[test]
    fn test_trials_merge() {
        let dir = tempdir().unwrap();
        write_log(
            dir.path(),
            "optsched-01",
            "densenet121",
            "Final occupancy for function conv1:50\n",
        );
        write_log(
            dir.path(),
            "optsched-02",
            "densenet121",
            "Final occupancy for function conv2:30\n",
        );

        let collector = Collector::new(small_config());
        let collection = collector.collect(dir.path(), &[]).unwrap();

        assert_eq!(collection.stats.len(), 1);
        let stats = collection.stats.get("optsched", "densenet121").unwrap();
        assert_eq!(stats.total, 80);
        assert_eq!(stats.num_kernel, 2);
        assert!((stats.average - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_log_is_recorded() {
        let dir = tempdir().unwrap();
        write_log(
            dir.path(),
            "amd-01",
            "densenet121",
            "Final occupancy for function conv1:10\n",
        );

        let collector = Collector::new(small_config());
        let collection = collector.collect(dir.path(), &[]).unwrap();

        let vgg = collection.stats.get("amd", "vgg16").unwrap();
        assert_eq!(*vgg, Stats::default());
        assert_eq!(collection.missing.len(), 1);
        let missing = &collection.missing[0];
        assert_eq!(missing.run_name, "amd");
        assert_eq!(missing.run_number, "01");
        assert_eq!(missing.benchmark, "vgg16");
        assert_eq!(
            missing.to_string(),
            "Cannot find log file for amd run 01 benchmark vgg16."
        );
    }

    #[test]
    fn test_run_with_no_logs_still_listed() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("empty-01")).unwrap();

        let collector = Collector::new(small_config());
        let collection = collector.collect(dir.path(), &[]).unwrap();

        let run = collection.stats.run("empty").unwrap();
        assert_eq!(run.benchmarks.len(), 2);
        assert_eq!(run.num_kernel(), 0);
        assert_eq!(collection.missing.len(), 2);
    }

    #[test]
    fn test_unknown_benchmark_is_ignored() {
        let dir = tempdir().unwrap();
        write_log(
            dir.path(),
            "amd-01",
            "bert",
            "Final occupancy for function attn:90\n",
        );

        let collector = Collector::new(small_config());
        let collection = collector.collect(dir.path(), &[]).unwrap();

        let run = collection.stats.run("amd").unwrap();
        assert_eq!(run.total(), 0);
        assert!(run.get("bert").is_none());
    }

    #[test]
    fn test_excluded_folders() {
        let dir = tempdir().unwrap();
        for folder in ["foo-01", "bar-01", "baz-01"] {
            write_log(
                dir.path(),
                folder,
                "densenet121",
                "Final occupancy for function conv1:10\n",
            );
        }

        let exclude = vec!["foo".to_string(), "bar-01".to_string()];
        let collector = Collector::new(small_config());
        let collection = collector.collect(dir.path(), &exclude).unwrap();

        let names: Vec<_> = collection.stats.runs().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["baz"]);
        assert_eq!(collection.folders, 1);
    }

    #[test]
    fn test_log_path_that_is_a_directory_counts_as_missing() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("amd-01/vgg16/vgg16.log")).unwrap();

        let collector = Collector::new(small_config());
        let collection = collector.collect(dir.path(), &[]).unwrap();
        assert!(collection.missing.iter().any(|m| m.benchmark == "vgg16"));
    }

    struct EqualsRule;

    impl SampleRule for EqualsRule {
        fn parse(&self, line: &str) -> Option<OccupancySample> {
            let (kernel, value) = line.split_once('=')?;
            Some(OccupancySample {
                kernel: kernel.to_string(),
                value: value.parse().ok()?,
            })
        }
    }

    #[test]
    fn test_custom_rule() {
        let collector = Collector::with_rule(small_config(), EqualsRule);
        let stats = collector
            .scan_reader(Cursor::new("gemm=6\nscheduler=100\nconv=2\n"))
            .unwrap();
        assert_eq!(stats.total, 8);
        assert_eq!(stats.num_kernel, 2);
    }
}
