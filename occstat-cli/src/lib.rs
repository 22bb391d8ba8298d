#![warn(missing_docs)]
//! occstat CLI Library
//!
//! Command-line driver: parse options, collect occupancy from the run
//! folders, then print and/or write the reports.
//!
//! # Example
//!
//! ```ignore
//! fn main() -> anyhow::Result<()> {
//!     occstat_cli::run()
//! }
//! ```

mod config;

pub use config::*;

use anyhow::Context;
use clap::Parser;
use occstat_core::{Collection, Collector, ScanPlan, build_plan};
use occstat_report::{build_report, format_console_report, write_json_report, write_spreadsheet};
use occstat_stats::{RunSummary, summarize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// occstat CLI arguments
#[derive(Parser, Debug)]
#[command(name = "occstat")]
#[command(
    author,
    version,
    about = "Extract occupancy stats from benchmark runs. Requires a compiler that prints occupancy."
)]
pub struct Cli {
    /// Print average occupancy to terminal
    #[arg(short, long)]
    pub verbose: bool,

    /// Output spreadsheet filepath [default: occupancy]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Disable spreadsheet output
    #[arg(short, long)]
    pub disable: bool,

    /// The path to scan for benchmark directories
    #[arg(short, long, default_value = ".")]
    pub input: PathBuf,

    /// List of folders or run names to ignore separated by commas
    #[arg(long, default_value = "")]
    pub ignore: String,

    /// Also write a JSON summary to this path
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Configuration file (default: discover occstat.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// List the run folders that would be scanned, then exit
    #[arg(long)]
    pub dry_run: bool,
}

/// What one invocation produced
#[derive(Debug)]
pub struct Outcome {
    /// Raw collection
    pub collection: Collection,
    /// Per-run summaries, in collection order
    pub runs: Vec<RunSummary>,
    /// Console report, when `--verbose`
    pub console: Option<String>,
    /// Spreadsheet written, unless `--disable`
    pub spreadsheet: Option<PathBuf>,
    /// JSON summary written, if requested
    pub json: Option<PathBuf>,
}

/// Run the occstat CLI with process arguments.
///
/// # Returns
/// Returns `Ok(())` on success, or an error if something goes wrong.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    run_with_cli(cli)
}

/// Run the occstat CLI with pre-parsed arguments.
pub fn run_with_cli(cli: Cli) -> anyhow::Result<()> {
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    if cli.dry_run {
        let plan = build_plan(&cli.input, &ignore_folders(&cli, &config))?;
        print!("{}", format_plan(&cli.input, &plan));
        return Ok(());
    }

    let outcome = execute_with(&cli, &config, &mut std::io::stdout().lock())?;

    if let Some(path) = &outcome.spreadsheet {
        tracing::info!("spreadsheet written to {}", path.display());
    }
    if let Some(path) = &outcome.json {
        tracing::info!("JSON summary written to {}", path.display());
    }

    Ok(())
}

/// Collect, summarize and write every requested output.
///
/// The console report is kept in [`Outcome::console`] but not printed.
pub fn execute(cli: &Cli, config: &OccConfig) -> anyhow::Result<Outcome> {
    execute_with(cli, config, &mut std::io::sink())
}

/// Like [`execute`], printing the console report to `out` before any file
/// output is attempted
pub fn execute_with(
    cli: &Cli,
    config: &OccConfig,
    out: &mut impl Write,
) -> anyhow::Result<Outcome> {
    let rule = config
        .collect
        .rule()
        .context("invalid [collect] pattern")?;
    let collector = Collector::with_rule(config.collect.collector_config(), rule);

    let collection = collector
        .collect(&cli.input, &ignore_folders(cli, config))
        .with_context(|| format!("failed to collect occupancy from {}", cli.input.display()))?;
    tracing::debug!(
        "collected {} runs from {} folders ({} logs missing)",
        collection.stats.len(),
        collection.folders,
        collection.missing.len()
    );

    let runs = summarize(&collection.stats);

    let console = cli.verbose.then(|| format_console_report(&runs));
    if let Some(console) = &console {
        out.write_all(console.as_bytes())
            .and_then(|()| out.flush())
            .context("failed to print console report")?;
    }

    let spreadsheet = if cli.disable {
        None
    } else {
        let output = cli
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.output.spreadsheet));
        let path = write_spreadsheet(&runs, collection.stats.benchmarks(), &output)
            .with_context(|| format!("failed to write spreadsheet {}", output.display()))?;
        Some(path)
    };

    let json = match cli
        .json
        .clone()
        .or_else(|| config.output.json.as_ref().map(PathBuf::from))
    {
        Some(path) => {
            let report = build_report(&collection, &cli.input);
            write_json_report(&report, &path)
                .with_context(|| format!("failed to write JSON summary {}", path.display()))?;
            Some(path)
        }
        None => None,
    };

    Ok(Outcome {
        collection,
        runs,
        console,
        spreadsheet,
        json,
    })
}

/// Split a comma-separated folder list, dropping empty entries
pub fn parse_ignore_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn ignore_folders(cli: &Cli, config: &OccConfig) -> Vec<String> {
    let mut folders = config.collect.ignore_folders.clone();
    folders.extend(parse_ignore_list(&cli.ignore));
    folders
}

fn load_config(path: Option<&Path>) -> anyhow::Result<OccConfig> {
    match path {
        Some(path) => OccConfig::load(path),
        None => Ok(OccConfig::discover().unwrap_or_default()),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose { "occstat=debug" } else { "occstat=info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Render a scan plan as a tree
pub fn format_plan(input: &Path, plan: &ScanPlan) -> String {
    let mut output = format!("occstat plan: {}\n", input.display());

    for name in plan.run_names() {
        output.push_str(&format!("├── run: {}\n", name));
        for folder in plan.folders.iter().filter(|f| f.run_name == name) {
            output.push_str(&format!("│   ├── {}\n", folder.folder));
        }
    }

    output.push_str(&format!(
        "{} folders found ({} excluded).\n",
        plan.folders.len(),
        plan.excluded.len()
    ));
    output
}
