//! Shared output formatting for check results.

use anyhow::Result;
use doc_lint_core::{Aggregate, CoverageStats, Offense, Severity, Statistics};
use serde::Serialize;

use crate::OutputFormat;

/// Print an aggregate in the specified format.
pub fn print(aggregate: &Aggregate, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(aggregate),
        OutputFormat::Json => return print_json(aggregate),
        OutputFormat::Compact => print_compact(aggregate),
    }
    Ok(())
}

fn print_text(aggregate: &Aggregate) {
    let stats = aggregate.statistics();

    for offense in aggregate.offenses() {
        let severity_indicator = match offense.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Convention => "\x1b[34mconvention\x1b[0m",
        };

        println!(
            "{}:{}: {} [{}]",
            offense.location, offense.location_line, severity_indicator, offense.name
        );
        println!("  {}", offense.message);
        println!();
    }

    let summary_color = if stats.error > 0 {
        "\x1b[31m"
    } else if stats.warning > 0 {
        "\x1b[33m"
    } else if stats.convention > 0 {
        "\x1b[34m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} offense(s): {} error(s), {} warning(s), {} convention(s)\x1b[0m",
        summary_color,
        aggregate.count(),
        stats.error,
        stats.warning,
        stats.convention
    );

    if let Some(coverage) = aggregate.coverage() {
        println!("{}", coverage_line(&coverage, aggregate.min_coverage()));
    }
}

fn coverage_line(coverage: &CoverageStats, min: Option<f64>) -> String {
    let mut line = format!(
        "Documentation coverage: {:.2}% ({}/{})",
        coverage.percentage(),
        coverage.documented,
        coverage.total
    );
    if let Some(min) = min {
        line.push_str(&format!(", minimum {min:.2}%"));
    }
    line
}

/// JSON document written by `--format json`.
#[derive(Serialize)]
struct JsonReport<'a> {
    offenses: &'a [Offense],
    statistics: Statistics,
    count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    coverage: Option<JsonCoverage>,
    exit_code: i32,
}

#[derive(Serialize)]
struct JsonCoverage {
    total: usize,
    documented: usize,
    percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    minimum: Option<f64>,
}

impl<'a> From<&'a Aggregate> for JsonReport<'a> {
    fn from(aggregate: &'a Aggregate) -> Self {
        Self {
            offenses: aggregate.offenses(),
            statistics: aggregate.statistics(),
            count: aggregate.count(),
            coverage: aggregate.coverage().map(|c| JsonCoverage {
                total: c.total,
                documented: c.documented,
                percentage: c.percentage(),
                minimum: aggregate.min_coverage(),
            }),
            exit_code: aggregate.exit_code(),
        }
    }
}

fn print_json(aggregate: &Aggregate) -> Result<()> {
    let json = serde_json::to_string_pretty(&JsonReport::from(aggregate))?;
    println!("{json}");
    Ok(())
}

fn print_compact(aggregate: &Aggregate) {
    for offense in aggregate.offenses() {
        println!("{offense}");
    }
}
