//! The uniform sample returned for every metric read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Sleep state attached to sleep samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SleepState {
    /// Awake during the session.
    Awake,
    /// Out of bed / in bed but not asleep.
    InBed,
    /// Asleep, stage unknown.
    Asleep,
    /// Deep sleep.
    Deep,
    /// REM sleep.
    Rem,
    /// Light or core sleep.
    Core,
}

impl SleepState {
    /// Maps a provider stage label (numeric code or name) to a sleep state.
    ///
    /// Labels are matched case-insensitively; anything unrecognized,
    /// including a missing label, is reported as [`SleepState::Asleep`].
    #[must_use]
    pub fn from_stage_label(label: Option<&str>) -> Self {
        let Some(label) = label else {
            return Self::Asleep;
        };
        match label.trim().to_ascii_lowercase().as_str() {
            "0" | "awake" => Self::Awake,
            "2" | "out_of_bed" | "outofbed" => Self::InBed,
            "4" | "deep" => Self::Deep,
            "5" | "rem" => Self::Rem,
            "1" | "3" | "light" | "sleeping" => Self::Core,
            _ => Self::Asleep,
        }
    }
}

/// Errors that can occur during sample validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SampleValidationError {
    /// The interval ends before it starts.
    #[error("Sample ends at {end} before it starts at {start}")]
    EndBeforeStart {
        /// Interval start.
        start: DateTime<Utc>,
        /// Interval end.
        end: DateTime<Utc>,
    },

    /// The value is NaN or infinite.
    #[error("Sample value must be finite, got {0}")]
    NonFiniteValue(f64),
}

/// A single normalized health measurement.
///
/// `end_date` equals `start_date` for point-in-time readings.
///
/// # Example
///
/// ```
/// use shared::models::Sample;
/// use chrono::{TimeZone, Utc};
///
/// let at = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
/// let sample = Sample::instant(62.0, at).unwrap();
///
/// assert_eq!(sample.start_date, sample.end_date);
/// let json = serde_json::to_value(&sample).unwrap();
/// assert_eq!(json["startDate"], "2024-01-01T08:00:00Z");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    /// Metric-specific magnitude.
    pub value: f64,

    /// Inclusive start of the measurement.
    pub start_date: DateTime<Utc>,

    /// End of the measurement.
    pub end_date: DateTime<Utc>,

    /// Sleep state, only set on sleep samples.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_state: Option<SleepState>,
}

impl Sample {
    /// Creates a point-in-time sample.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` is not finite.
    pub fn instant(value: f64, at: DateTime<Utc>) -> Result<Self, SampleValidationError> {
        Self::interval(value, at, at)
    }

    /// Creates a sample covering `[start, end]`.
    ///
    /// # Errors
    ///
    /// Returns an error if `end < start` or `value` is not finite.
    pub fn interval(
        value: f64,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Self, SampleValidationError> {
        let sample = Self {
            value,
            start_date: start,
            end_date: end,
            sleep_state: None,
        };
        sample.validate_sample()?;
        Ok(sample)
    }

    /// Attaches a sleep state.
    #[must_use]
    pub fn with_sleep_state(mut self, state: SleepState) -> Self {
        self.sleep_state = Some(state);
        self
    }

    /// Returns true for point-in-time samples.
    #[must_use]
    pub fn is_instant(&self) -> bool {
        self.start_date == self.end_date
    }

    /// Validates the sample invariants.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The end lies before the start
    /// - The value is NaN or infinite
    pub fn validate_sample(&self) -> Result<(), SampleValidationError> {
        if self.end_date < self.start_date {
            return Err(SampleValidationError::EndBeforeStart {
                start: self.start_date,
                end: self.end_date,
            });
        }
        if !self.value.is_finite() {
            return Err(SampleValidationError::NonFiniteValue(self.value));
        }
        Ok(())
    }
}
