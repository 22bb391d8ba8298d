#![warn(missing_docs)]
//! occstat Report - Output Formats
//!
//! Renders run summaries as:
//! - Console text (`--verbose`)
//! - An xlsx sheet with one column per run
//! - JSON (machine-readable)

mod console;
mod json;
mod report;
mod spreadsheet;

pub use console::format_console_report;
pub use json::{generate_json_report, write_json_report};
pub use report::{
    MissingLogEntry, Report, ReportMeta, ReportSummary, SCHEMA_VERSION, build_report,
};
pub use spreadsheet::{
    AVERAGE_LABEL, BENCHMARKS_LABEL, Cell, CellValue, OCCUPANCY_LABEL, SPREADSHEET_EXTENSION,
    build_workbook, column_label, layout_cells, resolve_output_path, write_spreadsheet,
};

use thiserror::Error;

/// Errors that can occur while writing a report
#[derive(Debug, Error)]
pub enum ReportError {
    /// A run has no kernels, so its spreadsheet average is undefined
    #[error("run `{run}` has no kernels; its average occupancy is undefined")]
    NoKernels {
        /// Offending run name
        run: String,
    },

    /// More runs than worksheet columns
    #[error("too many runs for one worksheet: {0}")]
    TooManyRuns(usize),

    /// Workbook could not be built or saved
    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
