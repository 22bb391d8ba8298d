//! Occupancy Line Parsing
//!
//! A [`SampleRule`] turns one log line into an optional [`OccupancySample`].
//! The default rule is [`OccupancyPattern`], an anchored regex matching
//! lines of the form:
//!
//! ```text
//! Final occupancy for function <kernel>:<value>
//! ```
//!
//! Most lines in a log do not match; those yield `None` and are skipped.

use regex::Regex;
use thiserror::Error;

/// Default occupancy line pattern
pub const DEFAULT_PATTERN: &str = r"^Final occupancy for function (?P<kernel>.*):(?P<value>\d+)";

/// A single occupancy value reported for one kernel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancySample {
    /// Kernel/function name
    pub kernel: String,
    /// Reported occupancy
    pub value: u32,
}

/// Errors building a custom line pattern
#[derive(Debug, Error)]
pub enum PatternError {
    /// The regex does not compile
    #[error("invalid occupancy pattern: {0}")]
    Regex(#[from] regex::Error),

    /// A required named group is absent
    #[error("occupancy pattern is missing the named group `{0}`")]
    MissingGroup(&'static str),
}

/// Extracts occupancy samples from log lines
pub trait SampleRule {
    /// Parse one line (without its line terminator)
    fn parse(&self, line: &str) -> Option<OccupancySample>;
}

/// Regex-backed [`SampleRule`]
///
/// The regex must define the named groups `kernel` and `value`.
#[derive(Debug, Clone)]
pub struct OccupancyPattern {
    regex: Regex,
}

impl OccupancyPattern {
    /// Build a rule from a custom regex
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let regex = Regex::new(pattern)?;
        let names: Vec<&str> = regex.capture_names().flatten().collect();
        for group in ["kernel", "value"] {
            if !names.contains(&group) {
                return Err(PatternError::MissingGroup(group));
            }
        }
        Ok(Self { regex })
    }

    /// The regex source this rule matches with
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

impl Default for OccupancyPattern {
    fn default() -> Self {
        Self {
            regex: Regex::new(DEFAULT_PATTERN).expect("default occupancy pattern is valid"),
        }
    }
}

impl SampleRule for OccupancyPattern {
    fn parse(&self, line: &str) -> Option<OccupancySample> {
        let caps = self.regex.captures(line)?;
        let kernel = caps.name("kernel")?.as_str();
        let raw = caps.name("value")?.as_str();

        let value = match raw.parse::<u32>() {
            Ok(v) => v,
            Err(e) => {
                tracing::debug!("skipping occupancy for {}: {} ({})", kernel, raw, e);
                return None;
            }
        };

        Some(OccupancySample {
            kernel: kernel.to_string(),
            value,
        })
    }
}
