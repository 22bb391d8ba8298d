//! Configuration loading from occstat.toml
//!
//! occstat configuration can be specified in an `occstat.toml` file. The file
//! is discovered by walking up from the current directory, or passed with
//! `--config`. Command-line flags override it.

use anyhow::Context;
use occstat_core::{
    CollectorConfig, OccupancyPattern, PatternError, default_benchmarks, default_ignored_kernels,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the discovered configuration file
pub const CONFIG_FILE: &str = "occstat.toml";

/// occstat configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OccConfig {
    /// Collection configuration
    #[serde(default)]
    pub collect: CollectConfig,
    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

/// What to collect and what to skip
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectConfig {
    /// Benchmarks to report on, in report order
    #[serde(default = "default_benchmarks")]
    pub benchmarks: Vec<String>,
    /// Kernel names whose occupancy is discarded
    #[serde(default = "default_ignored_kernels")]
    pub ignore_kernels: Vec<String>,
    /// Run folders or run names to skip, in addition to `--ignore`
    #[serde(default)]
    pub ignore_folders: Vec<String>,
    /// Custom line regex with named groups `kernel` and `value`
    #[serde(default)]
    pub pattern: Option<String>,
}

impl Default for CollectConfig {
    fn default() -> Self {
        Self {
            benchmarks: default_benchmarks(),
            ignore_kernels: default_ignored_kernels(),
            ignore_folders: Vec::new(),
            pattern: None,
        }
    }
}

impl CollectConfig {
    /// Collector settings for this configuration
    pub fn collector_config(&self) -> CollectorConfig {
        CollectorConfig {
            benchmarks: self.benchmarks.clone(),
            ignored_kernels: self.ignore_kernels.clone(),
        }
    }

    /// Line rule: the configured pattern, or the default one
    pub fn rule(&self) -> Result<OccupancyPattern, PatternError> {
        match &self.pattern {
            Some(pattern) => OccupancyPattern::new(pattern),
            None => Ok(OccupancyPattern::default()),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Spreadsheet path or basename
    #[serde(default = "default_spreadsheet")]
    pub spreadsheet: String,
    /// Also write a JSON summary here
    #[serde(default)]
    pub json: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            spreadsheet: default_spreadsheet(),
            json: None,
        }
    }
}

fn default_spreadsheet() -> String {
    "occupancy".to_string()
}

impl OccConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Try to discover and load configuration by walking up from current directory
    pub fn discover() -> Option<Self> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let config_path = dir.join(CONFIG_FILE);
            if config_path.exists() {
                return match Self::load(&config_path) {
                    Ok(config) => Some(config),
                    Err(e) => {
                        tracing::warn!("ignoring {}: {:#}", config_path.display(), e);
                        None
                    }
                };
            }
            if !dir.pop() {
                break;
            }
        }
        None
    }

    /// Generate a default configuration as TOML string
    pub fn default_toml() -> String {
        r#"# occstat configuration

[collect]
# Benchmarks reported on, in report order
benchmarks = [
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
]
# Kernels printed before scheduling; their occupancy is not counted
ignore_kernels = [
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
]
# Run folders (or whole runs, by run name) to always skip
ignore_folders = []
# Custom line pattern with named groups `kernel` and `value` (uncomment to enable)
# pattern = '^Final occupancy for function (?P<kernel>.*):(?P<value>\d+)'

[output]
# Spreadsheet path; ".xlsx" is appended unless the name ends in an xls extension
spreadsheet = "occupancy"
# JSON summary path (uncomment to enable)
# json = "occupancy.json"
"#
        .to_string()
    }
}
