//! Data types used by the aggregation pipeline.

use serde::Serialize;

/// Number of hour-of-day buckets kept per zone.
pub const HOURS_PER_DAY: usize = 24;

/// Per-zone trip counts indexed by hour of day.
pub type HourlyCounts = [u64; HOURS_PER_DAY];

/// Zone and hour extracted from a single accepted trip row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickupSlot {
    pub zone: String,
    pub hour: u8,
}

/// A pickup zone with its total trip count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneCount {
    pub zone: String,
    pub count: u64,
}

/// A (zone, hour) slot with its trip count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotCount {
    pub zone: String,
    pub hour: u8,
    pub count: u64,
}

/// Row tallies from the most recent load.
///
/// `rows_read` excludes the header. Empty lines are counted separately and
/// never reach the parser.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    pub rows_read: u64,
    pub rows_accepted: u64,
    pub rows_skipped: u64,
    pub empty_lines: u64,
}

impl LoadSummary {
    /// Lines consumed so far, counting the header and blank lines.
    pub fn lines_scanned(&self) -> u64 {
        1 + self.rows_read + self.empty_lines
    }
}
