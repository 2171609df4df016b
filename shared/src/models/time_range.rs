//! Caller-supplied read windows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while building a [`TimeRange`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeRangeError {
    /// A bound is not an ISO-8601 instant.
    #[error("{field} '{value}' is not an ISO-8601 instant: {reason}")]
    Unparseable {
        /// Name of the offending request field.
        field: &'static str,
        /// The raw input.
        value: String,
        /// Parser message.
        reason: String,
    },

    /// The start lies after the end.
    #[error("startDate {start} is after endDate {end}")]
    Inverted {
        /// Requested start.
        start: DateTime<Utc>,
        /// Requested end.
        end: DateTime<Utc>,
    },
}

/// A read window `[start, end)`.
///
/// # Example
///
/// ```
/// use shared::models::TimeRange;
///
/// let range = TimeRange::parse("2024-01-01T00:00:00Z", "2024-01-02T00:00:00+02:00").unwrap();
/// assert_eq!(range.end.to_rfc3339(), "2024-01-01T22:00:00+00:00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTimeRange")]
pub struct TimeRange {
    /// Inclusive start.
    pub start: DateTime<Utc>,
    /// Exclusive end.
    pub end: DateTime<Utc>,
}

/// Unchecked wire form; deserialization goes through [`TimeRange::new`].
#[derive(Deserialize)]
struct RawTimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<RawTimeRange> for TimeRange {
    type Error = TimeRangeError;

    fn try_from(raw: RawTimeRange) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl TimeRange {
    /// Creates a range from two instants.
    ///
    /// # Errors
    ///
    /// Returns [`TimeRangeError::Inverted`] if `start > end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, TimeRangeError> {
        if start > end {
            return Err(TimeRangeError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parses both bounds as RFC 3339 instants and normalizes them to UTC.
    ///
    /// # Errors
    ///
    /// Returns [`TimeRangeError::Unparseable`] naming the first bound that
    /// fails to parse, or [`TimeRangeError::Inverted`] for a backwards range.
    pub fn parse(start: &str, end: &str) -> Result<Self, TimeRangeError> {
        let start = parse_instant("startDate", start)?;
        let end = parse_instant("endDate", end)?;
        Self::new(start, end)
    }

    /// Returns true if `instant` falls inside `[start, end)`.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }

    /// Returns true if the window cannot contain any instant.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

fn parse_instant(field: &'static str, value: &str) -> Result<DateTime<Utc>, TimeRangeError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| TimeRangeError::Unparseable {
            field,
            value: value.to_string(),
            reason: e.to_string(),
        })
}
