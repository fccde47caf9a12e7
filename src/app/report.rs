//! Run report rendering: summary table, coloured status line, JSON export

use crate::pipeline::{RunReport, RunStatus};
use colored::Colorize;
use prettytable::{row, Table};
use std::path::Path;

/// Print the human-readable summary: status line, aggregate counts and a
/// per-participant breakdown table.
pub fn print_summary(report: &RunReport) {
    let status = match report.status {
        RunStatus::Ok => report.status.to_string().green().bold(),
        RunStatus::Partial => report.status.to_string().yellow().bold(),
        RunStatus::Timeout => report.status.to_string().red().bold(),
    };

    println!();
    println!("Run status: {}", status);
    println!(
        "Produced: {}   Consumed: {}   Errors: {}   Duration: {:.3}s",
        report.items_produced,
        report.items_consumed,
        report.total_errors(),
        report.duration.as_secs_f64()
    );
    if !report.stuck.is_empty() {
        println!(
            "{} {}",
            "Stuck participants:".red().bold(),
            report.stuck.join(", ")
        );
    }

    let mut table = Table::new();
    table.add_row(row![
        "PARTICIPANT",
        "ROLE",
        "ITEMS",
        "ERRORS",
        "DURATION",
        "CLEAN EXIT"
    ]);
    for metrics in &report.participants {
        table.add_row(row![
            metrics.name,
            metrics.role,
            metrics.items,
            metrics.errors,
            format!("{:.3}s", metrics.duration.as_secs_f64()),
            if metrics.clean_exit { "yes" } else { "no" }
        ]);
    }
    table.printstd();
}

/// Serialise the report as pretty-printed JSON.
pub fn to_json(report: &RunReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(report)
}

/// Write the report as JSON to `path`.
pub fn write_json(report: &RunReport, path: &Path) -> std::io::Result<()> {
    let json = to_json(report).map_err(std::io::Error::from)?;
    std::fs::write(path, json)
}
