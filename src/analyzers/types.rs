//! Data types used by the aggregation pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metrics extracted from a single segment log.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SegmentRecord {
    pub left_count: u64,
    pub right_count: u64,
    pub violations: u64,
    pub avg_speed_left: f64,
    pub avg_speed_right: f64,
}

/// Parsed segment records keyed by segment index.
///
/// Only segments whose log was read successfully have an entry.
pub type ParsedLogSet = BTreeMap<usize, SegmentRecord>;

/// A reference from an interval to a segment, tagged with its contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentRef {
    /// The segment contributes all of its vehicles.
    Whole(usize),
    /// The segment contributes half of its vehicles; the other half belongs
    /// to a neighbouring interval.
    Half(usize),
}

impl SegmentRef {
    pub fn index(&self) -> usize {
        match *self {
            SegmentRef::Whole(index) | SegmentRef::Half(index) => index,
        }
    }

    pub fn weight(&self) -> f64 {
        match self {
            SegmentRef::Whole(_) => 1.0,
            SegmentRef::Half(_) => 0.5,
        }
    }
}

/// An ordered list of weighted segment references making up one interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntervalDefinition {
    pub refs: Vec<SegmentRef>,
}

impl IntervalDefinition {
    pub fn new(refs: Vec<SegmentRef>) -> Self {
        Self { refs }
    }
}

/// Weighted vehicle counts and average speeds for one interval.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct IntervalSummary {
    pub vehicles_left: f64,
    pub vehicles_right: f64,
    pub avg_speed_left: f64,
    pub avg_speed_right: f64,
}

/// Unweighted totals over every parsed segment.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OverallSummary {
    pub total_left: u128,
    pub total_right: u128,
    pub total_violations: u128,
}

/// A segment whose weights across the interval table do not add up to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightAnomaly {
    pub index: usize,
    pub total_weight: f64,
}
