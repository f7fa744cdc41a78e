//! Line parser for trip CSV records.
//!
//! Expected column order:
//! `TripID,PickupZoneID,DropoffZoneID,PickupDateTime[,...]`
//!
//! Only the first four fields are looked at. The hour is read straight out of
//! the datetime at fixed offsets, so `YYYY-MM-DD HH:MM[:SS]` is the only
//! supported layout.

use crate::analyzers::types::{HOURS_PER_DAY, PickupSlot};

/// Byte offset of the tens digit of the hour in `YYYY-MM-DD HH`.
const HOUR_OFFSET: usize = 11;

/// Shortest datetime that still contains both hour digits.
const MIN_DATETIME_LEN: usize = HOUR_OFFSET + 2;

/// Reason a row was rejected. Rows that fail are skipped by the caller.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    #[error("expected at least 4 comma separated fields, found {found}")]
    MissingFields { found: usize },
    #[error("pickup zone is empty")]
    EmptyZone,
    #[error("pickup datetime has {len} bytes, need at least 13")]
    DateTimeTooShort { len: usize },
    #[error("pickup datetime has no two digit hour at offset 11")]
    NonDigitHour,
    #[error("hour {hour} is outside 0-23")]
    HourOutOfRange { hour: u8 },
    #[error("pickup zone is not valid UTF-8")]
    InvalidUtf8,
}

/// Extracts the pickup zone and hour-of-day from one raw CSV line.
///
/// The line is split on raw bytes, so anything after the fourth field,
/// including further commas or bytes that are not UTF-8, is ignored. Only
/// the zone has to be valid UTF-8. It is taken verbatim: no trimming, no
/// case folding.
pub fn parse_line(line: &[u8]) -> Result<PickupSlot, RowError> {
    let mut fields = line.split(|&b| b == b',');
    let mut leading = [b"".as_slice(); 4];

    for (found, slot) in leading.iter_mut().enumerate() {
        *slot = fields.next().ok_or(RowError::MissingFields { found })?;
    }

    let [_trip_id, zone, _dropoff, datetime] = leading;

    if zone.is_empty() {
        return Err(RowError::EmptyZone);
    }

    let hour = parse_hour(datetime)?;
    let zone = std::str::from_utf8(zone).map_err(|_| RowError::InvalidUtf8)?;

    Ok(PickupSlot {
        zone: zone.to_string(),
        hour,
    })
}

/// Reads the hour from offsets 11 and 12. Bytes past offset 12 are not checked.
pub fn parse_hour(datetime: &[u8]) -> Result<u8, RowError> {
    if datetime.len() < MIN_DATETIME_LEN {
        return Err(RowError::DateTimeTooShort {
            len: datetime.len(),
        });
    }

    let (tens, ones) = (datetime[HOUR_OFFSET], datetime[HOUR_OFFSET + 1]);
    if !tens.is_ascii_digit() || !ones.is_ascii_digit() {
        return Err(RowError::NonDigitHour);
    }

    let hour = (tens - b'0') * 10 + (ones - b'0');
    if usize::from(hour) >= HOURS_PER_DAY {
        return Err(RowError::HourOutOfRange { hour });
    }

    Ok(hour)
}
