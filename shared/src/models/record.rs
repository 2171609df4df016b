//! Provider-native health records.
//!
//! These mirror the shapes a platform health store hands back before any
//! normalization takes place.

use super::metric_type::RecordKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single point inside a heart-rate series record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeartRatePoint {
    /// When the beat rate was measured.
    pub time: DateTime<Utc>,
    /// Beats per minute.
    pub beats_per_minute: i64,
}

/// A native health record.
///
/// Fixture files use the same representation, tagged by `recordType`:
///
/// ```
/// use shared::models::{Record, RecordKind};
///
/// let record: Record = serde_json::from_str(r#"{
///     "recordType": "steps",
///     "start": "2024-01-01T08:00:00Z",
///     "end": "2024-01-01T09:00:00Z",
///     "count": 1200
/// }"#).unwrap();
///
/// assert_eq!(record.kind(), RecordKind::Steps);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "recordType", rename_all = "camelCase")]
pub enum Record {
    /// Steps taken over an interval.
    Steps {
        /// Interval start.
        start: DateTime<Utc>,
        /// Interval end.
        end: DateTime<Utc>,
        /// Number of steps.
        count: i64,
    },

    /// A series of heart-rate points.
    #[serde(rename_all = "camelCase")]
    HeartRate {
        /// Series start.
        start: DateTime<Utc>,
        /// Series end.
        end: DateTime<Utc>,
        /// Points in provider order.
        #[serde(default)]
        samples: Vec<HeartRatePoint>,
    },

    /// Daily resting heart rate.
    #[serde(rename_all = "camelCase")]
    RestingHeartRate {
        /// Measurement instant.
        time: DateTime<Utc>,
        /// Beats per minute.
        beats_per_minute: i64,
    },

    /// Heart-rate variability reading.
    #[serde(rename_all = "camelCase")]
    HeartRateVariabilityRmssd {
        /// Measurement instant.
        time: DateTime<Utc>,
        /// RMSSD in milliseconds.
        heart_rate_variability_millis: f64,
    },

    /// Blood oxygen reading.
    OxygenSaturation {
        /// Measurement instant.
        time: DateTime<Utc>,
        /// Saturation percentage (0-100).
        percentage: f64,
    },

    /// A sleep session.
    SleepSession {
        /// Session start.
        start: DateTime<Utc>,
        /// Session end.
        end: DateTime<Utc>,
        /// Provider stage label or code, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        stage: Option<String>,
    },
}

impl Record {
    /// Returns the record family.
    #[must_use]
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Steps { .. } => RecordKind::Steps,
            Self::HeartRate { .. } => RecordKind::HeartRate,
            Self::RestingHeartRate { .. } => RecordKind::RestingHeartRate,
            Self::HeartRateVariabilityRmssd { .. } => RecordKind::HeartRateVariabilityRmssd,
            Self::OxygenSaturation { .. } => RecordKind::OxygenSaturation,
            Self::SleepSession { .. } => RecordKind::SleepSession,
        }
    }

    /// Returns the instant used to place the record in a time window:
    /// the interval start, or the reading time for point-in-time records.
    #[must_use]
    pub fn anchor_time(&self) -> DateTime<Utc> {
        match self {
            Self::Steps { start, .. }
            | Self::HeartRate { start, .. }
            | Self::SleepSession { start, .. } => *start,
            Self::RestingHeartRate { time, .. }
            | Self::HeartRateVariabilityRmssd { time, .. }
            | Self::OxygenSaturation { time, .. } => *time,
        }
    }
}
