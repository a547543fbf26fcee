//! Report rendering and persistence.
//!
//! The same text is written to the log stream and to the output object.

use anyhow::Result;
use std::fmt::Write;
use tracing::info;

use crate::analyzers::types::{IntervalSummary, OverallSummary};
use crate::storage::ObjectStore;

/// Renders the consolidated report.
///
/// Vehicle counts are truncated to integers and speeds printed with two
/// decimals. Every line, including the last, ends with `\n`.
pub fn render_report(overall: &OverallSummary, intervals: &[IntervalSummary]) -> String {
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "=== Overall Summary ===");
    let _ = writeln!(
        out,
        "Total Vehicles: Left = {}, Right = {}",
        overall.total_left, overall.total_right
    );
    let _ = writeln!(out, "Total Speed Violations: {}", overall.total_violations);
    let _ = writeln!(out);

    let _ = writeln!(out, "=== Per 5-minute Summary ===");
    for (i, s) in intervals.iter().enumerate() {
        let _ = writeln!(
            out,
            "Interval {}: Vehicles ➜ Left = {}, Right = {} | Avg Speed ➜ Left = {:.2}, Right = {:.2}",
            i + 1,
            s.vehicles_left.trunc() as u64,
            s.vehicles_right.trunc() as u64,
            s.avg_speed_left,
            s.avg_speed_right,
        );
    }

    out
}

/// Logs the report line by line.
pub fn log_report(report: &str) {
    for line in report.lines().filter(|l| !l.is_empty()) {
        info!("{}", line);
    }
}

/// Writes the report to `name` in the store, replacing any earlier version.
pub async fn persist_report(store: &dyn ObjectStore, name: &str, report: &str) -> Result<()> {
    store.write_text(name, report).await?;
    info!(object = name, bytes = report.len(), "Report uploaded");
    Ok(())
}
