//! Spreadsheet Output
//!
//! Lays runs out one per column:
//!
//! ```text
//!      A              B           C
//! 1    Benchmarks     optsched    amd
//! 2                   Occupancy   Occupancy
//! 3    densenet121    50          41.5
//! ...
//! 16   Average        47.2        40.1
//! ```
//!
//! The layout is computed as a list of [`Cell`]s first and only then written
//! with `rust_xlsxwriter`, so nothing touches disk when a run cannot be laid
//! out.

use crate::ReportError;
use occstat_stats::RunSummary;
use rust_xlsxwriter::{Format, Workbook};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Extension appended when the output name has none
pub const SPREADSHEET_EXTENSION: &str = ".xlsx";

/// Header cell over the benchmark names
pub const BENCHMARKS_LABEL: &str = "Benchmarks";
/// Row 2 label under every run name
pub const OCCUPANCY_LABEL: &str = "Occupancy";
/// Label of the grand average row
pub const AVERAGE_LABEL: &str = "Average";

/// First row holding a benchmark (0-based; row 3 in the sheet)
const FIRST_BENCH_ROW: u32 = 2;

/// Worksheet column limit
const MAX_COLUMNS: usize = 16_384;

/// Cell contents
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// String cell
    Text(String),
    /// Numeric cell
    Number(f64),
}

/// One populated cell (0-based row and column)
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    /// 0-based row
    pub row: u32,
    /// 0-based column
    pub col: u16,
    /// Contents
    pub value: CellValue,
    /// Written with a bold format
    pub bold: bool,
}

impl Cell {
    fn text(row: u32, col: u16, text: impl Into<String>) -> Self {
        Self {
            row,
            col,
            value: CellValue::Text(text.into()),
            bold: false,
        }
    }

    fn number(row: u32, col: u16, value: f64) -> Self {
        Self {
            row,
            col,
            value: CellValue::Number(value),
            bold: false,
        }
    }

    fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// A1-style address, e.g. `B3`
    pub fn address(&self) -> String {
        format!("{}{}", column_label(self.col as usize), self.row + 1)
    }
}

/// Spreadsheet column label for a 0-based column index.
///
/// `0 → A`, `25 → Z`, `26 → AA`, `701 → ZZ`, `702 → AAA`.
pub fn column_label(index: usize) -> String {
    let mut label = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        label.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    label.reverse();
    String::from_utf8_lossy(&label).into_owned()
}

/// Append `.xlsx` unless the last four characters of the name contain `xls`.
pub fn resolve_output_path(output: &Path) -> PathBuf {
    let name = output.to_string_lossy();
    let tail: String = {
        let mut chars: Vec<char> = name.chars().rev().take(4).collect();
        chars.reverse();
        chars.into_iter().collect()
    };

    if tail.contains("xls") {
        output.to_path_buf()
    } else {
        let mut resolved = OsString::from(output.as_os_str());
        resolved.push(SPREADSHEET_EXTENSION);
        PathBuf::from(resolved)
    }
}

/// Compute every cell of the report sheet.
///
/// Fails with [`ReportError::NoKernels`] if a run has no kernels, since its
/// grand average has no value to write.
pub fn layout_cells(runs: &[RunSummary], benchmarks: &[String]) -> Result<Vec<Cell>, ReportError> {
    if runs.len() >= MAX_COLUMNS {
        return Err(ReportError::TooManyRuns(runs.len()));
    }
    if let Some(run) = runs.iter().find(|r| r.average.is_none()) {
        return Err(ReportError::NoKernels {
            run: run.name.clone(),
        });
    }

    let average_row = FIRST_BENCH_ROW + benchmarks.len() as u32;
    let mut cells = Vec::with_capacity((runs.len() + 1) * (benchmarks.len() + 3));

    cells.push(Cell::text(0, 0, BENCHMARKS_LABEL).bold());
    for (i, bench) in benchmarks.iter().enumerate() {
        cells.push(Cell::text(FIRST_BENCH_ROW + i as u32, 0, bench.as_str()));
    }
    cells.push(Cell::text(average_row, 0, AVERAGE_LABEL).bold());

    for (i, run) in runs.iter().enumerate() {
        let col = (i + 1) as u16;
        tracing::debug!("run {} -> column {}", run.name, column_label(col as usize));

        cells.push(Cell::text(0, col, run.name.as_str()));
        cells.push(Cell::text(1, col, OCCUPANCY_LABEL));

        for (j, bench) in benchmarks.iter().enumerate() {
            let average = run
                .benchmarks
                .iter()
                .find(|b| b.benchmark == *bench)
                .map(|b| b.average)
                .unwrap_or(0.0);
            cells.push(Cell::number(FIRST_BENCH_ROW + j as u32, col, average));
        }

        if let Some(average) = run.average {
            cells.push(Cell::number(average_row, col, average));
        }
    }

    Ok(cells)
}

/// Build the workbook for a set of runs
pub fn build_workbook(runs: &[RunSummary], benchmarks: &[String]) -> Result<Workbook, ReportError> {
    let cells = layout_cells(runs, benchmarks)?;

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();

    for cell in &cells {
        match (&cell.value, cell.bold) {
            (CellValue::Text(text), true) => {
                worksheet.write_string_with_format(cell.row, cell.col, text, &bold)?;
            }
            (CellValue::Text(text), false) => {
                worksheet.write_string(cell.row, cell.col, text)?;
            }
            (CellValue::Number(value), true) => {
                worksheet.write_number_with_format(cell.row, cell.col, *value, &bold)?;
            }
            (CellValue::Number(value), false) => {
                worksheet.write_number(cell.row, cell.col, *value)?;
            }
        }
    }

    Ok(workbook)
}

/// Write the report sheet, overwriting any existing file.
///
/// Returns the resolved path actually written.
pub fn write_spreadsheet(
    runs: &[RunSummary],
    benchmarks: &[String],
    output: &Path,
) -> Result<PathBuf, ReportError> {
    let path = resolve_output_path(output);
    let mut workbook = build_workbook(runs, benchmarks)?;
    workbook.save(&path)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use occstat_stats::BenchmarkAverage;
    use tempfile::tempdir;

    fn benches() -> Vec<String> {
        vec!["densenet121".to_string(), "vgg16".to_string()]
    }

    fn run(name: &str, averages: &[(u64, u64)]) -> RunSummary {
        let benchmarks: Vec<_> = benches()
            .into_iter()
            .zip(averages)
            .map(|(benchmark, &(total, num_kernel))| BenchmarkAverage {
                benchmark,
                total,
                num_kernel,
                average: occstat_stats::average(total, num_kernel).unwrap_or(0.0),
            })
            .collect();
        let total = averages.iter().map(|a| a.0).sum();
        let num_kernel = averages.iter().map(|a| a.1).sum();
        RunSummary {
            name: name.to_string(),
            benchmarks,
            total,
            num_kernel,
            average: occstat_stats::average(total, num_kernel),
        }
    }

    fn find<'a>(cells: &'a [Cell], address: &str) -> &'a Cell {
        cells
            .iter()
            .find(|c| c.address() == address)
            .unwrap_or_else(|| panic!("no cell at {}", address))
    }

    #[test]
    fn test_column_label() {
        assert_eq!(column_label(0), "A");
        assert_eq!(column_label(1), "B");
        assert_eq!(column_label(25), "Z");
        assert_eq!(column_label(26), "AA");
        assert_eq!(column_label(27), "AB");
        assert_eq!(column_label(701), "ZZ");
        assert_eq!(column_label(702), "AAA");
        assert_eq!(column_label(16_383), "XFD");
    }

    #[test]
    fn test_resolve_output_path() {
        assert_eq!(resolve_output_path(Path::new("occupancy")), PathBuf::from("occupancy.xlsx"));
        assert_eq!(resolve_output_path(Path::new("report")), PathBuf::from("report.xlsx"));
        assert_eq!(resolve_output_path(Path::new("out.xlsx")), PathBuf::from("out.xlsx"));
        assert_eq!(resolve_output_path(Path::new("out.xls")), PathBuf::from("out.xls"));
        assert_eq!(resolve_output_path(Path::new("x.xlsm")), PathBuf::from("x.xlsm"));
        // "xls" earlier in the name does not count
        assert_eq!(resolve_output_path(Path::new("xls-runs")), PathBuf::from("xls-runs.xlsx"));
        assert_eq!(resolve_output_path(Path::new("ab")), PathBuf::from("ab.xlsx"));
    }

    #[test]
    fn test_layout() {
        let runs = vec![run("optsched", &[(80, 2), (10, 1)]), run("amd", &[(30, 1), (0, 0)])];
        let cells = layout_cells(&runs, &benches()).unwrap();

        let a1 = find(&cells, "A1");
        assert_eq!(a1.value, CellValue::Text("Benchmarks".to_string()));
        assert!(a1.bold);
        assert_eq!(find(&cells, "A3").value, CellValue::Text("densenet121".to_string()));
        assert_eq!(find(&cells, "A4").value, CellValue::Text("vgg16".to_string()));
        let a5 = find(&cells, "A5");
        assert_eq!(a5.value, CellValue::Text("Average".to_string()));
        assert!(a5.bold);

        assert_eq!(find(&cells, "B1").value, CellValue::Text("optsched".to_string()));
        assert_eq!(find(&cells, "B2").value, CellValue::Text("Occupancy".to_string()));
        assert_eq!(find(&cells, "B3").value, CellValue::Number(40.0));
        assert_eq!(find(&cells, "B4").value, CellValue::Number(10.0));
        assert_eq!(find(&cells, "B5").value, CellValue::Number(30.0));

        assert_eq!(find(&cells, "C1").value, CellValue::Text("amd".to_string()));
        assert_eq!(find(&cells, "C4").value, CellValue::Number(0.0));
        assert_eq!(find(&cells, "C5").value, CellValue::Number(30.0));
    }

    #[test]
    fn test_layout_past_column_z() {
        let runs: Vec<_> = (0..30)
            .map(|i| run(&format!("run{}", i), &[(i + 1, 1), (0, 0)]))
            .collect();
        let cells = layout_cells(&runs, &benches()).unwrap();

        // Run 25 lands in column AA
        assert_eq!(find(&cells, "AA1").value, CellValue::Text("run25".to_string()));
        assert_eq!(find(&cells, "AE1").value, CellValue::Text("run29".to_string()));
    }

    #[test]
    fn test_run_without_kernels_is_an_error() {
        let dir = tempdir().unwrap();
        let runs = vec![run("optsched", &[(80, 2), (0, 0)]), run("empty", &[(0, 0), (0, 0)])];

        let err = write_spreadsheet(&runs, &benches(), &dir.path().join("report")).unwrap_err();
        assert!(matches!(err, ReportError::NoKernels { run: ref name } if name == "empty"));
        assert!(!dir.path().join("report.xlsx").exists());
    }

    #[test]
    fn test_write_spreadsheet() {
        let dir = tempdir().unwrap();
        let runs = vec![run("optsched", &[(80, 2), (10, 1)])];

        let path = write_spreadsheet(&runs, &benches(), &dir.path().join("report")).unwrap();
        assert_eq!(path, dir.path().join("report.xlsx"));
        assert!(path.metadata().unwrap().len() > 0);

        // Overwrites unconditionally
        let again = write_spreadsheet(&runs, &benches(), &dir.path().join("report.xlsx")).unwrap();
        assert_eq!(again, path);
    }

    #[test]
    fn test_empty_runs_still_write_labels() {
        let cells = layout_cells(&[], &benches()).unwrap();
        assert_eq!(cells.len(), 4);
        assert_eq!(find(&cells, "A5").value, CellValue::Text("Average".to_string()));
    }
}
