//! Date helpers for trips

use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, Utc};

use crate::models::Trip;

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC).
pub fn parse_date(s: &str) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(s, DEFAULT_DATE_FORMAT)
        .map_err(|_| anyhow!("Invalid date '{}'. Use YYYY-MM-DD.", s))?;
    date.and_hms_opt(0, 0, 0)
        .map(|naive| naive.and_utc())
        .ok_or_else(|| anyhow!("Invalid date '{}'", s))
}

pub fn format_date(dt: &DateTime<Utc>, pattern: &str) -> String {
    dt.format(pattern).to_string()
}

/// The trip still ahead of `now` (by end date) with the earliest start.
/// Ties keep the first in slice order.
pub fn upcoming_trip(trips: &[Trip], now: DateTime<Utc>) -> Option<&Trip> {
    trips
        .iter()
        .filter(|t| t.is_upcoming(now))
        .fold(None, |best: Option<&Trip>, t| match best {
            Some(b) if b.start_date <= t.start_date => Some(b),
            _ => Some(t),
        })
}
