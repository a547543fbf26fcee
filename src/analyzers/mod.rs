//! Segment log aggregation.
//!
//! This module checks that the segment logs are complete, sums their
//! metrics into overall totals and weighted reporting intervals, and drives
//! a full run from storage listing to the persisted report.

pub mod aggregate;
pub mod analyzer;
pub mod gate;
pub mod intervals;
pub mod types;
pub mod utility;
