//! Trip aggregation and busy-slot ranking.
//!
//! This module owns the per-zone and per-(zone, hour) trip counts built from
//! a trip CSV and answers ranked top-k queries over them.

pub mod aggregator;
pub mod ranking;
pub mod types;
