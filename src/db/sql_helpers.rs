//! SQLite helper utilities for type conversion
//!
//! SQLite doesn't natively support UUIDs or timestamps. This module provides
//! utilities to convert between Rust types and SQLite-compatible formats.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Generate a fresh UUID v4 as a SQLite-compatible string
#[inline]
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Parse a SQLite string back to a UUID
#[inline]
pub fn str_to_uuid(s: &str) -> Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| anyhow!("Invalid UUID '{}': {}", s, e))
}

/// Get current UTC timestamp as ISO8601 string for SQLite
#[inline]
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339()
}

/// Convert a chrono DateTime to ISO8601 string
#[inline]
pub fn datetime_to_str(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

/// Parse an ISO8601 string to DateTime
#[inline]
pub fn str_to_datetime(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| anyhow!("Invalid timestamp '{}': {}", s, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_round_trip() {
        let id = new_id();
        let parsed = str_to_uuid(&id).unwrap();
        assert_eq!(parsed.to_string(), id);
    }

    #[test]
    fn test_invalid_uuid() {
        assert!(str_to_uuid("not-a-uuid").is_err());
    }

    #[test]
    fn test_timestamp_round_trip() {
        let now = now_iso8601();
        let dt = str_to_datetime(&now).unwrap();
        assert_eq!(datetime_to_str(dt), now);
    }
}
