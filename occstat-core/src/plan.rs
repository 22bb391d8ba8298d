//! Scan Planner
//!
//! Builds the scan plan by listing and filtering run folders.
//!
//! - Only immediate subdirectories of the input directory are considered
//! - A folder is skipped when the exclude list names either the folder
//!   itself (`foo-01`) or its run name (`foo`)
//! - Each folder name is split into run name and run number
//!
//! Ordering: folders are sorted by file name so repeated scans of the same
//! tree produce the same run order.

use crate::collector::CollectError;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One trial folder, `<run-name>-<run-number>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunFolder {
    /// Full path to the folder
    pub path: PathBuf,
    /// Folder base name
    pub folder: String,
    /// Everything before the last `-`
    pub run_name: String,
    /// Everything after the last `-`
    pub run_number: String,
}

impl RunFolder {
    /// Split a folder name on its last dash.
    ///
    /// A name without a dash has an empty run name and is entirely run number.
    pub fn new(path: impl Into<PathBuf>, folder: impl Into<String>) -> Self {
        let folder = folder.into();
        let (run_name, run_number) = match folder.rsplit_once('-') {
            Some((name, number)) => (name.to_string(), number.to_string()),
            None => (String::new(), folder.clone()),
        };
        Self {
            path: path.into(),
            folder,
            run_name,
            run_number,
        }
    }

    /// Expected log path for a benchmark: `<folder>/<bench>/<bench>.log`
    pub fn log_path(&self, benchmark: &str) -> PathBuf {
        self.path
            .join(benchmark)
            .join(format!("{}.log", benchmark))
    }
}

/// Ordered list of run folders to scan
#[derive(Debug, Clone, Default)]
pub struct ScanPlan {
    /// Folders to scan, sorted by name
    pub folders: Vec<RunFolder>,
    /// Folders skipped because they or their run name were excluded
    pub excluded: Vec<String>,
}

impl ScanPlan {
    /// Distinct run names in scan order
    pub fn run_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for folder in &self.folders {
            if !names.contains(&folder.run_name.as_str()) {
                names.push(&folder.run_name);
            }
        }
        names
    }
}

/// Build the scan plan for `input_dir`.
///
/// An `exclude` entry matches a folder by its full name or by its run name.
/// Empty entries match nothing.
pub fn build_plan(input_dir: &Path, exclude: &[String]) -> Result<ScanPlan, CollectError> {
    let meta = std::fs::metadata(input_dir).map_err(|source| CollectError::InputDir {
        path: input_dir.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(CollectError::NotADirectory(input_dir.to_path_buf()));
    }

    let walker = WalkDir::new(input_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    let mut plan = ScanPlan::default();
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            continue;
        }

        let folder = entry.file_name().to_string_lossy().into_owned();
        let run = RunFolder::new(entry.path(), folder);
        if is_excluded(&run, exclude) {
            tracing::debug!("excluding folder {}", run.folder);
            plan.excluded.push(run.folder);
            continue;
        }

        plan.folders.push(run);
    }

    Ok(plan)
}

fn is_excluded(run: &RunFolder, exclude: &[String]) -> bool {
    exclude
        .iter()
        .filter(|e| !e.is_empty())
        .any(|e| *e == run.folder || *e == run.run_name)
}
