//! Console Output
//!
//! ```text
//! optsched
//!     densenet121 : 50.00
//!     densenet169 : 0.00
//!   Average: 50.00
//! ```
//!
//! The `Average` line is left out for runs without kernels.

use occstat_stats::RunSummary;

/// Format run summaries for terminal display
pub fn format_console_report(runs: &[RunSummary]) -> String {
    let mut output = String::new();

    for run in runs {
        output.push_str(&format!("{}\n", run.name));
        for bench in &run.benchmarks {
            output.push_str(&format!("    {} : {:.2}\n", bench.benchmark, bench.average));
        }
        if let Some(average) = run.average {
            output.push_str(&format!("  Average: {:.2}\n", average));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use occstat_stats::BenchmarkAverage;

    fn bench(name: &str, total: u64, num_kernel: u64) -> BenchmarkAverage {
        BenchmarkAverage {
            benchmark: name.to_string(),
            total,
            num_kernel,
            average: if num_kernel == 0 {
                0.0
            } else {
                total as f64 / num_kernel as f64
            },
        }
    }

    #[test]
    fn test_format_run() {
        let runs = vec![RunSummary {
            name: "optsched".to_string(),
            benchmarks: vec![bench("densenet121", 80, 3), bench("vgg16", 0, 0)],
            total: 80,
            num_kernel: 3,
            average: Some(80.0 / 3.0),
        }];

        let output = format_console_report(&runs);
        assert_eq!(
            output,
            "optsched\n    densenet121 : 26.67\n    vgg16 : 0.00\n  Average: 26.67\n"
        );
    }

    #[test]
    fn test_no_average_line_without_kernels() {
        let runs = vec![RunSummary {
            name: "amd".to_string(),
            benchmarks: vec![bench("densenet121", 0, 0)],
            total: 0,
            num_kernel: 0,
            average: None,
        }];

        let output = format_console_report(&runs);
        assert_eq!(output, "amd\n    densenet121 : 0.00\n");
        assert!(!output.contains("Average"));
    }
}
