//! Readiness check run before aggregation.

use tracing::info;

/// Returns `true` for names of the form `segment_*.log`.
pub fn is_segment_log(name: &str) -> bool {
    name.starts_with("segment_") && name.ends_with(".log")
}

/// Counts the segment logs among `names`.
pub fn count_segment_logs<S: AsRef<str>>(names: &[S]) -> usize {
    names.iter().filter(|n| is_segment_log(n.as_ref())).count()
}

/// Decides whether enough segment logs are present to aggregate.
pub fn is_ready<S: AsRef<str>>(names: &[S], min_segments: usize) -> bool {
    let count = count_segment_logs(names);

    if count < min_segments {
        info!(count, min_segments, "Not all segment logs present yet, waiting");
        false
    } else {
        info!(count, min_segments, "Segment logs complete, starting aggregation");
        true
    }
}
