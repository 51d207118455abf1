//! Timestamp normalization.
//!
//! Canonical records carry epoch seconds and an ISO-8601 string derived from
//! the same millisecond instant, so either one can be recovered from the other.

use crate::error::ModelError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, de::Error as _};

/// Truncates to millisecond precision, the finest unit the canonical shape keeps.
pub fn truncate_millis(dt: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(dt.timestamp_millis()).unwrap_or(dt)
}

/// Epoch seconds with a fractional millisecond part.
pub fn epoch_seconds(dt: &DateTime<Utc>) -> f64 {
    dt.timestamp_millis() as f64 / 1000.0
}

pub fn iso_date(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Both canonical time fields for one instant: `(epoch seconds, ISO date)`.
pub fn stamp(dt: DateTime<Utc>) -> (f64, String) {
    let dt = truncate_millis(dt);
    (epoch_seconds(&dt), iso_date(&dt))
}

pub fn parse_iso(s: &str) -> Result<DateTime<Utc>, ModelError> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ModelError::InvalidTimestamp(s.to_string()))
}

pub fn from_epoch_seconds(secs: i64) -> Result<DateTime<Utc>, ModelError> {
    DateTime::from_timestamp(secs, 0).ok_or(ModelError::TimestampOutOfRange(secs))
}

/// Epoch seconds recovered from an ISO date produced by [`iso_date`].
pub fn iso_to_epoch_seconds(s: &str) -> Result<f64, ModelError> {
    parse_iso(s).map(|dt| epoch_seconds(&dt))
}

/// `deserialize_with` helper for epoch seconds encoded as a string (`"1700000000"`).
pub fn de_epoch_seconds_str<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let secs = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| D::Error::custom(ModelError::InvalidTimestamp(raw.clone())))?;
    from_epoch_seconds(secs).map_err(D::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn iso_round_trips_to_the_same_seconds() {
        let dt = parse_iso("2024-03-01T10:15:30.123456Z").unwrap();
        let dt = truncate_millis(dt);
        let ts = epoch_seconds(&dt);
        let iso = iso_date(&dt);

        assert_eq!(iso, "2024-03-01T10:15:30.123Z");
        assert_eq!(iso_to_epoch_seconds(&iso).unwrap(), ts);
    }

    #[test]
    fn offsets_are_normalized_to_utc() {
        let dt = parse_iso("2024-03-01T12:00:00+02:00").unwrap();
        assert_eq!(iso_date(&dt), "2024-03-01T10:00:00.000Z");
    }

    #[test]
    fn whole_seconds_stay_whole() {
        let dt = from_epoch_seconds(1_700_000_000).unwrap();
        assert_eq!(epoch_seconds(&dt), 1_700_000_000.0);
    }
}
