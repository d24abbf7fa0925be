//! # Event Timestamps
//!
//! Defines `EventTimestamp`, the UTC instant at which a tracking event
//! occurred. Provider timestamps arrive in several shapes, and unlike
//! canonical timestamps these are *ingested*, so the parser is lenient:
//!
//! | Input | Interpretation |
//! |-------|----------------|
//! | `2024-01-01T10:00:00Z`, `2024-01-01T12:00:00+02:00` | RFC 3339, converted to UTC |
//! | `2024-01-01T10:00:00`, `2024-01-01T10:00:00.250` | no offset, read as UTC |
//! | `2024-01-01 10:00:00` | space separator, read as UTC |
//! | `2024-01-01` | midnight UTC |
//!
//! Sub-second precision is kept, so two events in the same second still
//! order correctly.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::TimestampError;

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// A tracking event instant, normalized to UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventTimestamp(DateTime<Utc>);

impl EventTimestamp {
    /// Create a timestamp from a `chrono::DateTime<Utc>`.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Parse a provider timestamp in any of the accepted shapes.
    ///
    /// # Errors
    ///
    /// Returns [`TimestampError::Empty`] for blank input and
    /// [`TimestampError::Unparsable`] when no shape matches.
    pub fn parse(s: &str) -> Result<Self, TimestampError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(TimestampError::Empty);
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self(dt.with_timezone(&Utc)));
        }

        for format in NAIVE_FORMATS {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
                return Ok(Self(Utc.from_utc_datetime(&naive)));
            }
        }

        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| Self(Utc.from_utc_datetime(&naive)))
            .ok_or_else(|| TimestampError::Unparsable(s.to_string()))
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Render as RFC 3339 with a `Z` suffix, keeping sub-seconds only when
    /// present.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }
}

impl std::fmt::Display for EventTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}
