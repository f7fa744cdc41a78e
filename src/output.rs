//! Output formatting for hotspot reports.
//!
//! Supports pretty-printing through the log, a JSON document, and CSV rows.
//! Everything is written to a caller supplied writer; nothing is persisted.

use anyhow::Result;
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use std::io::Write;
use tracing::{debug, info};

use crate::analyzers::aggregator::TripAggregator;
use crate::analyzers::types::{LoadSummary, SlotCount, ZoneCount};

/// Both ranked reports for one loaded trip file.
#[derive(Debug, Serialize)]
pub struct HotspotReport {
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub summary: LoadSummary,
    pub top_zones: Vec<ZoneCount>,
    pub top_slots: Vec<SlotCount>,
}

impl HotspotReport {
    /// Snapshots the top `zones` zones and top `slots` slots from `aggregator`.
    pub fn build(
        source: &str,
        summary: LoadSummary,
        aggregator: &TripAggregator,
        zones: i64,
        slots: i64,
    ) -> Self {
        HotspotReport {
            generated_at: Utc::now(),
            source: source.to_string(),
            summary,
            top_zones: aggregator.top_zones(zones),
            top_slots: aggregator.top_busy_slots(slots),
        }
    }
}

/// Logs the report using Rust's debug pretty-print format.
pub fn print_pretty(report: &HotspotReport) {
    debug!("{:#?}", report);
}

/// Logs each ranked entry as a structured event.
pub fn print_table(report: &HotspotReport) {
    for (rank, z) in report.top_zones.iter().enumerate() {
        info!(rank = rank + 1, zone = %z.zone, count = z.count, "Busiest zone");
    }
    for (rank, s) in report.top_slots.iter().enumerate() {
        info!(
            rank = rank + 1,
            zone = %s.zone,
            hour = s.hour,
            count = s.count,
            "Busiest slot"
        );
    }
}

/// Writes the report as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write>(report: &HotspotReport, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, report)?;
    writeln!(writer)?;
    Ok(())
}

/// Writes `zone,count` rows with a header.
pub fn write_zones_csv<W: Write>(zones: &[ZoneCount], writer: W) -> Result<()> {
    write_rows(zones, writer)
}

/// Writes `zone,hour,count` rows with a header.
pub fn write_slots_csv<W: Write>(slots: &[SlotCount], writer: W) -> Result<()> {
    write_rows(slots, writer)
}

fn write_rows<T: Serialize, W: Write>(rows: &[T], writer: W) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(writer);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> HotspotReport {
        HotspotReport {
            generated_at: Utc::now(),
            source: "trips.csv".to_string(),
            summary: LoadSummary::default(),
            top_zones: vec![
                ZoneCount {
                    zone: "Z1".to_string(),
                    count: 2,
                },
                ZoneCount {
                    zone: "Z2".to_string(),
                    count: 1,
                },
            ],
            top_slots: vec![SlotCount {
                zone: "Z1".to_string(),
                hour: 8,
                count: 2,
            }],
        }
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&sample_report());
        print_table(&sample_report());
    }

    #[test]
    fn test_write_json_fields() {
        let mut buf = Vec::new();
        write_json(&sample_report(), &mut buf).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["source"], "trips.csv");
        assert_eq!(value["top_zones"][0]["zone"], "Z1");
        assert_eq!(value["top_zones"][1]["count"], 1);
        assert_eq!(value["top_slots"][0]["hour"], 8);
        assert_eq!(value["summary"]["rows_read"], 0);
    }

    #[test]
    fn test_write_zones_csv() {
        let mut buf = Vec::new();
        write_zones_csv(&sample_report().top_zones, &mut buf).unwrap();

        let content = String::from_utf8(buf).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines, vec!["zone,count", "Z1,2", "Z2,1"]);
    }

    #[test]
    fn test_write_slots_csv() {
        let mut buf = Vec::new();
        write_slots_csv(&sample_report().top_slots, &mut buf).unwrap();

        let content = String::from_utf8(buf).unwrap();
        assert_eq!(content, "zone,hour,count\nZ1,8,2\n");
    }

    #[test]
    fn test_empty_csv_has_no_rows() {
        let mut buf = Vec::new();
        write_zones_csv(&[], &mut buf).unwrap();
        assert!(buf.is_empty());
    }
}
