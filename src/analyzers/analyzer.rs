use crate::analyzers::aggregate::{summarize_intervals, summarize_overall};
use crate::analyzers::gate::{count_segment_logs, is_ready};
use crate::analyzers::intervals::weight_anomalies;
use crate::analyzers::types::IntervalDefinition;
use crate::config::RollupConfig;
use crate::fetch::fetch_segments;
use crate::output::{log_report, persist_report, render_report};
use crate::storage::ObjectStore;
use crate::trigger::TriggerEvent;
use anyhow::Result;
use tracing::{info, warn};

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Too few segment logs were present; nothing was written.
    Waiting { found: usize },
    /// The report was rendered and written to storage.
    Completed { report: String },
}

/// Checks readiness, aggregates every segment log and writes the report.
///
/// The report is written once, after all computation has succeeded.
#[tracing::instrument(skip_all, fields(output = %config.output_name))]
pub async fn run(
    store: &dyn ObjectStore,
    config: &RollupConfig,
    intervals: &[IntervalDefinition],
) -> Result<RunOutcome> {
    let names = store.list_names().await?;
    if !is_ready(&names, config.min_segments) {
        return Ok(RunOutcome::Waiting {
            found: count_segment_logs(&names),
        });
    }

    log_weight_anomalies(intervals, config.segment_count);

    let logs = fetch_segments(store, config.segment_count).await?;
    info!(
        parsed = logs.len(),
        expected = config.segment_count,
        "Segment logs parsed"
    );

    let overall = summarize_overall(&logs);
    let summaries = summarize_intervals(&logs, intervals);
    let report = render_report(&overall, &summaries);

    log_report(&report);
    persist_report(store, &config.output_name, &report).await?;

    Ok(RunOutcome::Completed { report })
}

/// Runs the pipeline in response to a storage trigger.
pub async fn handle_trigger(
    store: &dyn ObjectStore,
    config: &RollupConfig,
    intervals: &[IntervalDefinition],
    event: &TriggerEvent,
) -> Result<RunOutcome> {
    info!(object = %event.path, name = %event.name, bytes = event.length, "Triggered by new log");
    run(store, config, intervals).await
}

/// Warns about every segment whose interval weights do not sum to 1.0.
pub fn log_weight_anomalies(intervals: &[IntervalDefinition], segment_count: usize) {
    for anomaly in weight_anomalies(intervals, segment_count) {
        warn!(
            segment = anomaly.index,
            total_weight = anomaly.total_weight,
            "Interval table weight for segment is not 1.0"
        );
    }
}
