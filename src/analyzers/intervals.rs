use anyhow::{Context, Result};
use crate::analyzers::types::SegmentRef::{Half, Whole};
use crate::analyzers::types::{IntervalDefinition, SegmentRef, WeightAnomaly};
use std::collections::BTreeMap;

/// Reporting intervals, nominally five minutes of footage each.
///
/// Segments on a boundary are split 50/50 between the two neighbouring
/// intervals. The table is business data: it is reproduced as-is and
/// inconsistencies are surfaced through [`weight_anomalies`].
static DEFAULT_INTERVALS: &[&[SegmentRef]] = &[
    &[Whole(0), Half(1)],
    &[Half(1), Whole(3), Whole(4)],
    &[Whole(5), Whole(6), Half(3)],
    &[Half(3), Whole(8), Whole(9)],
    &[Whole(10), Whole(11), Half(6)],
    &[Half(6), Whole(13), Whole(14)],
    &[Whole(15), Whole(16)],
    &[Whole(17)],
];

/// Returns the built-in interval table.
pub fn default_intervals() -> Vec<IntervalDefinition> {
    DEFAULT_INTERVALS
        .iter()
        .map(|refs| IntervalDefinition::new(refs.to_vec()))
        .collect()
}

/// Loads an interval table from a JSON file.
///
/// The file holds an array of intervals, each an array of references:
/// ```json
/// [
///   [{ "whole": 0 }, { "half": 1 }],
///   [{ "half": 1 }, { "whole": 2 }]
/// ]
/// ```
pub fn load_intervals(path: &str) -> Result<Vec<IntervalDefinition>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read interval table '{path}'"))?;
    let intervals: Vec<IntervalDefinition> = serde_json::from_str(&content)
        .with_context(|| format!("invalid interval table '{path}'"))?;
    Ok(intervals)
}

/// Sums each segment's weight across all intervals and returns the segments
/// in `0..segment_count` (plus any referenced index outside that range)
/// whose total is not exactly 1.0.
pub fn weight_anomalies(
    intervals: &[IntervalDefinition],
    segment_count: usize,
) -> Vec<WeightAnomaly> {
    let mut totals: BTreeMap<usize, f64> = (0..segment_count).map(|i| (i, 0.0)).collect();

    for interval in intervals {
        for seg in &interval.refs {
            *totals.entry(seg.index()).or_default() += seg.weight();
        }
    }

    totals
        .into_iter()
        .filter(|(_, total_weight)| *total_weight != 1.0)
        .map(|(index, total_weight)| WeightAnomaly {
            index,
            total_weight,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_has_eight_intervals() {
        let intervals = default_intervals();
        assert_eq!(intervals.len(), 8);
        assert_eq!(intervals[0].refs, vec![Whole(0), Half(1)]);
        assert_eq!(intervals[7].refs, vec![Whole(17)]);
    }

    #[test]
    fn test_segment_one_split_across_first_two_intervals() {
        let intervals = default_intervals();
        assert!(intervals[0].refs.contains(&Half(1)));
        assert!(intervals[1].refs.contains(&Half(1)));
    }

    #[test]
    fn test_default_table_anomalies() {
        let anomalies = weight_anomalies(&default_intervals(), 18);
        let flagged: Vec<(usize, f64)> = anomalies
            .iter()
            .map(|a| (a.index, a.total_weight))
            .collect();

        assert_eq!(
            flagged,
            vec![(2, 0.0), (3, 2.0), (6, 2.0), (7, 0.0), (12, 0.0)]
        );
    }

    #[test]
    fn test_balanced_table_has_no_anomalies() {
        let intervals = vec![
            IntervalDefinition::new(vec![Whole(0), Half(1)]),
            IntervalDefinition::new(vec![Half(1), Whole(2)]),
        ];
        assert!(weight_anomalies(&intervals, 3).is_empty());
    }

    #[test]
    fn test_out_of_range_reference_is_flagged() {
        let intervals = vec![IntervalDefinition::new(vec![Whole(0), Whole(5)])];
        let anomalies = weight_anomalies(&intervals, 1);
        assert_eq!(anomalies.len(), 1);
        assert_eq!(anomalies[0].index, 5);
    }

    #[test]
    fn test_load_intervals_from_json() {
        let path = format!(
            "{}/segment_rollup_test_intervals.json",
            std::env::temp_dir().display()
        );
        std::fs::write(&path, r#"[[{"whole": 0}, {"half": 1}], [{"half": 1}]]"#).unwrap();

        let intervals = load_intervals(&path).unwrap();
        assert_eq!(intervals.len(), 2);
        assert_eq!(intervals[0].refs, vec![Whole(0), Half(1)]);
        assert_eq!(intervals[1].refs, vec![Half(1)]);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_intervals_rejects_unknown_tag() {
        let path = format!(
            "{}/segment_rollup_test_bad_intervals.json",
            std::env::temp_dir().display()
        );
        std::fs::write(&path, r#"[[{"quarter": 0}]]"#).unwrap();

        assert!(load_intervals(&path).is_err());

        std::fs::remove_file(&path).unwrap();
    }
}
