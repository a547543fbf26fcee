use crate::analyzers::types::{IntervalDefinition, IntervalSummary, OverallSummary, ParsedLogSet};
use crate::analyzers::utility::safe_div;

/// Sums vehicle counts and violations over every parsed segment.
///
/// Interval weights play no part here: each segment counts exactly once.
/// Totals are widened to `u128` so any number of `u64` counts sums exactly.
pub fn summarize_overall(logs: &ParsedLogSet) -> OverallSummary {
    logs.values().fold(OverallSummary::default(), |mut acc, rec| {
        acc.total_left += u128::from(rec.left_count);
        acc.total_right += u128::from(rec.right_count);
        acc.total_violations += u128::from(rec.violations);
        acc
    })
}

/// Computes weighted vehicle counts and vehicle-weighted average speeds for
/// one interval.
///
/// References to segments missing from `logs` contribute nothing. An
/// interval without vehicles reports zero speeds on both sides.
pub fn summarize_interval(logs: &ParsedLogSet, interval: &IntervalDefinition) -> IntervalSummary {
    let mut left_sum = 0.0;
    let mut right_sum = 0.0;
    let mut left_speed_total = 0.0;
    let mut right_speed_total = 0.0;

    for seg in &interval.refs {
        let Some(rec) = logs.get(&seg.index()) else {
            continue;
        };

        let weight = seg.weight();
        let left = rec.left_count as f64 * weight;
        let right = rec.right_count as f64 * weight;

        left_sum += left;
        right_sum += right;
        left_speed_total += rec.avg_speed_left * left;
        right_speed_total += rec.avg_speed_right * right;
    }

    let (avg_speed_left, avg_speed_right) = if left_sum + right_sum > 0.0 {
        (
            safe_div(left_speed_total, left_sum),
            safe_div(right_speed_total, right_sum),
        )
    } else {
        (0.0, 0.0)
    };

    IntervalSummary {
        vehicles_left: left_sum,
        vehicles_right: right_sum,
        avg_speed_left,
        avg_speed_right,
    }
}

/// Summarizes every interval, preserving definition order.
pub fn summarize_intervals(
    logs: &ParsedLogSet,
    intervals: &[IntervalDefinition],
) -> Vec<IntervalSummary> {
    intervals
        .iter()
        .map(|interval| summarize_interval(logs, interval))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::intervals::default_intervals;
    use crate::analyzers::types::SegmentRecord;
    use crate::analyzers::types::SegmentRef::{Half, Whole};

    fn record(left: u64, right: u64, violations: u64, sl: f64, sr: f64) -> SegmentRecord {
        SegmentRecord {
            left_count: left,
            right_count: right,
            violations,
            avg_speed_left: sl,
            avg_speed_right: sr,
        }
    }

    fn scenario_logs() -> ParsedLogSet {
        let mut logs = ParsedLogSet::new();
        logs.insert(0, record(10, 5, 2, 40.0, 35.0));
        logs.insert(1, record(20, 10, 0, 50.0, 45.0));
        logs
    }

    #[test]
    fn test_first_interval_scenario() {
        let summaries = summarize_intervals(&scenario_logs(), &default_intervals());
        let first = summaries[0];

        assert_eq!(first.vehicles_left, 20.0);
        assert_eq!(first.vehicles_right, 10.0);
        assert_eq!(first.avg_speed_left, 45.0);
        assert_eq!(first.avg_speed_right, 40.0);
    }

    #[test]
    fn test_half_segment_halves_sum_to_whole() {
        let mut logs = ParsedLogSet::new();
        logs.insert(1, record(21, 7, 0, 50.0, 45.0));

        let summaries = summarize_intervals(&logs, &default_intervals());
        assert_eq!(summaries[0].vehicles_left + summaries[1].vehicles_left, 21.0);
        assert_eq!(summaries[0].vehicles_right + summaries[1].vehicles_right, 7.0);
    }

    #[test]
    fn test_half_segment_keeps_its_own_speed() {
        let mut logs = ParsedLogSet::new();
        logs.insert(1, record(20, 10, 0, 50.0, 45.0));

        let summary = summarize_interval(&logs, &IntervalDefinition::new(vec![Half(1)]));
        assert_eq!(summary.vehicles_left, 10.0);
        assert_eq!(summary.avg_speed_left, 50.0);
        assert_eq!(summary.avg_speed_right, 45.0);
    }

    #[test]
    fn test_one_side_without_vehicles_has_zero_speed() {
        let mut logs = ParsedLogSet::new();
        logs.insert(15, record(12, 0, 0, 60.0, 80.0));
        logs.insert(16, record(8, 0, 0, 55.0, 70.0));

        let summary =
            summarize_interval(&logs, &IntervalDefinition::new(vec![Whole(15), Whole(16)]));
        assert_eq!(summary.vehicles_right, 0.0);
        assert_eq!(summary.avg_speed_right, 0.0);
        assert!(!summary.avg_speed_right.is_nan());
        assert_eq!(summary.avg_speed_left, 58.0);
    }

    #[test]
    fn test_empty_interval_is_all_zero() {
        let summaries = summarize_intervals(&ParsedLogSet::new(), &default_intervals());
        assert_eq!(summaries.len(), 8);
        assert!(summaries.iter().all(|s| *s == IntervalSummary::default()));
    }

    #[test]
    fn test_missing_segments_are_skipped() {
        let mut logs = ParsedLogSet::new();
        logs.insert(4, record(6, 4, 1, 30.0, 20.0));

        let summary = summarize_interval(
            &logs,
            &IntervalDefinition::new(vec![Half(1), Whole(3), Whole(4)]),
        );
        assert_eq!(summary.vehicles_left, 6.0);
        assert_eq!(summary.vehicles_right, 4.0);
        assert_eq!(summary.avg_speed_left, 30.0);
        assert_eq!(summary.avg_speed_right, 20.0);
    }

    #[test]
    fn test_overall_totals_do_not_overflow() {
        let mut logs = ParsedLogSet::new();
        logs.insert(0, record(u64::MAX, 1, u64::MAX, 0.0, 0.0));
        logs.insert(1, record(u64::MAX, 1, 1, 0.0, 0.0));

        let overall = summarize_overall(&logs);
        assert_eq!(overall.total_left, 2 * u128::from(u64::MAX));
        assert_eq!(overall.total_right, 2);
        assert_eq!(overall.total_violations, u128::from(u64::MAX) + 1);
    }

    #[test]
    fn test_overall_totals_ignore_interval_weights() {
        let overall = summarize_overall(&scenario_logs());
        assert_eq!(
            overall,
            OverallSummary {
                total_left: 30,
                total_right: 15,
                total_violations: 2,
            }
        );
    }
}
