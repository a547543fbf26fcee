//! Metric extraction from per-segment log text.
//!
//! Each metric is matched independently, so a log missing one line still
//! yields the others. Absent or unparseable values fall back to zero.

use crate::analyzers::types::SegmentRecord;
use regex::Regex;
use std::sync::LazyLock;

static VEHICLES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Total vehicles: Left = (\d+) \| Right = (\d+)")
        .unwrap_or_else(|_| panic!("Invalid Regex"))
});
static VIOLATIONS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Total speed violations: (\d+)").unwrap_or_else(|_| panic!("Invalid Regex"))
});
static SPEED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Average speed: Left = ([\d.]+) km/h \| Right = ([\d.]+) km/h")
        .unwrap_or_else(|_| panic!("Invalid Regex"))
});

/// Extracts `(left, right)` from the first `Total vehicles` line.
pub fn parse_vehicles(content: &str) -> Option<(u64, u64)> {
    let caps = VEHICLES_RE.captures(content)?;
    let left = caps[1].parse().ok()?;
    let right = caps[2].parse().ok()?;
    Some((left, right))
}

/// Extracts the count from the first `Total speed violations` line.
pub fn parse_violations(content: &str) -> Option<u64> {
    let caps = VIOLATIONS_RE.captures(content)?;
    caps[1].parse().ok()
}

/// Extracts `(left, right)` km/h from the first `Average speed` line.
pub fn parse_speeds(content: &str) -> Option<(f64, f64)> {
    let caps = SPEED_RE.captures(content)?;
    let left = caps[1].parse().ok()?;
    let right = caps[2].parse().ok()?;
    Some((left, right))
}

/// Builds a [`SegmentRecord`] from raw segment log text.
pub fn parse_segment(content: &str) -> SegmentRecord {
    let (left_count, right_count) = parse_vehicles(content).unwrap_or_default();
    let violations = parse_violations(content).unwrap_or_default();
    let (avg_speed_left, avg_speed_right) = parse_speeds(content).unwrap_or_default();

    SegmentRecord {
        left_count,
        right_count,
        violations,
        avg_speed_left,
        avg_speed_right,
    }
}
