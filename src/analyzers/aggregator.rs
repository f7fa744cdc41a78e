use crate::analyzers::ranking::{clamp_k, top_k};
use crate::analyzers::types::{HOURS_PER_DAY, HourlyCounts, LoadSummary, SlotCount, ZoneCount};
use crate::parser::parse_line;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

/// Accumulates trip counts per pickup zone and per (zone, hour) slot.
///
/// Every call to [`TripAggregator::load_file`] replaces the previous state.
/// After a load, each zone's total equals the sum of its hourly counts and
/// both maps hold the same set of zones.
#[derive(Debug, Default)]
pub struct TripAggregator {
    zone_counts: HashMap<String, u64>,
    slot_counts: HashMap<String, HourlyCounts>,
}

impl TripAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a trip CSV, replacing any previously loaded counts.
    ///
    /// The first line is always treated as a header. Empty lines and rows the
    /// parser rejects are skipped. A path that cannot be opened leaves the
    /// aggregator empty. No failure is returned; the [`LoadSummary`] only
    /// reports how many rows were seen.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> LoadSummary {
        self.load_path(path.as_ref())
    }

    #[tracing::instrument(skip(self, path), fields(path = %path.display()))]
    fn load_path(&mut self, path: &Path) -> LoadSummary {
        self.clear();

        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                warn!(error = %e, "Could not open trip file, state left empty");
                return LoadSummary::default();
            }
        };

        let summary = self.ingest(BufReader::new(file));

        info!(
            rows_read = summary.rows_read,
            rows_accepted = summary.rows_accepted,
            rows_skipped = summary.rows_skipped,
            empty_lines = summary.empty_lines,
            zones = self.zone_counts.len(),
            "Trip file loaded"
        );

        summary
    }

    /// Scans the header and data lines from `reader` into the current state.
    fn ingest<R: BufRead>(&mut self, mut reader: R) -> LoadSummary {
        let mut summary = LoadSummary::default();
        let mut buf = Vec::new();

        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => return summary,
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "Failed to read header line");
                return summary;
            }
        }

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) => {
                    warn!(
                        error = %e,
                        line = summary.lines_scanned() + 1,
                        "Read error, stopping scan"
                    );
                    break;
                }
            }

            if buf.last() == Some(&b'\n') {
                buf.pop();
            }

            if buf.is_empty() {
                summary.empty_lines += 1;
                continue;
            }

            summary.rows_read += 1;

            match parse_line(&buf) {
                Ok(slot) => {
                    self.record(slot.zone, slot.hour);
                    summary.rows_accepted += 1;
                }
                Err(e) => {
                    debug!(error = %e, row = summary.rows_read, "Skipping dirty row");
                    summary.rows_skipped += 1;
                }
            }
        }

        summary
    }

    fn record(&mut self, zone: String, hour: u8) {
        let hourly = self
            .slot_counts
            .entry(zone.clone())
            .or_insert([0; HOURS_PER_DAY]);
        hourly[usize::from(hour)] += 1;

        *self.zone_counts.entry(zone).or_default() += 1;
    }

    /// Drops all accumulated counts.
    pub fn clear(&mut self) {
        self.zone_counts.clear();
        self.slot_counts.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.zone_counts.is_empty()
    }

    /// Number of distinct pickup zones seen in the last load.
    pub fn zone_len(&self) -> usize {
        self.zone_counts.len()
    }

    /// Total trips for `zone`, zero if it never appeared.
    pub fn zone_count(&self, zone: &str) -> u64 {
        self.zone_counts.get(zone).copied().unwrap_or(0)
    }

    pub fn hourly_counts(&self, zone: &str) -> Option<&HourlyCounts> {
        self.slot_counts.get(zone)
    }

    /// The `k` busiest zones, by count descending then zone ascending.
    ///
    /// A negative `k` yields an empty list.
    pub fn top_zones(&self, k: i64) -> Vec<ZoneCount> {
        let zones = self
            .zone_counts
            .iter()
            .map(|(zone, &count)| ZoneCount {
                zone: zone.clone(),
                count,
            })
            .collect();

        top_k(zones, clamp_k(k), |a, b| {
            b.count.cmp(&a.count).then_with(|| a.zone.cmp(&b.zone))
        })
    }

    /// The `k` busiest (zone, hour) slots, by count descending, then zone
    /// ascending, then hour ascending. Slots with no trips are never listed.
    pub fn top_busy_slots(&self, k: i64) -> Vec<SlotCount> {
        let slots = self
            .slot_counts
            .iter()
            .flat_map(|(zone, hourly)| {
                hourly
                    .iter()
                    .enumerate()
                    .filter(|&(_, &count)| count > 0)
                    .map(move |(hour, &count)| SlotCount {
                        zone: zone.clone(),
                        hour: hour as u8,
                        count,
                    })
            })
            .collect();

        top_k(slots, clamp_k(k), |a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.zone.cmp(&b.zone))
                .then_with(|| a.hour.cmp(&b.hour))
        })
    }
}
