//! Native record to [`Sample`] normalization.
//!
//! | metric             | value              | startDate      | endDate        |
//! |--------------------|--------------------|----------------|----------------|
//! | `steps`            | record count       | record start   | record end     |
//! | `heartRate`        | point bpm          | point time     | point time     |
//! | `restingHeartRate` | bpm                | record time    | record time    |
//! | `hrv`              | RMSSD milliseconds | record time    | record time    |
//! | `spo2`             | percentage         | record time    | record time    |
//! | `sleep`            | `0`                | session start  | session end    |
//!
//! A heart-rate record fans out into one sample per nested point; every other
//! family yields exactly one sample per record. Provider order is preserved.

use super::error::HealthError;
use crate::models::{MetricType, Record, Sample, SampleValidationError, SleepState};

/// Normalizes the records of one read into samples.
///
/// # Errors
///
/// Returns [`HealthError::Provider`] if a record belongs to a different
/// family than `metric` or violates the sample invariants. No samples are
/// returned in that case.
pub fn normalize(metric: MetricType, records: Vec<Record>) -> Result<Vec<Sample>, HealthError> {
    let mut samples = Vec::with_capacity(records.len());
    for record in records {
        normalize_record(metric, record, &mut samples)?;
    }
    Ok(samples)
}

#[allow(clippy::cast_precision_loss)]
fn normalize_record(
    metric: MetricType,
    record: Record,
    out: &mut Vec<Sample>,
) -> Result<(), HealthError> {
    if record.kind() != metric.record_kind() {
        return Err(HealthError::Provider(format!(
            "Provider returned {} while reading {metric}",
            record.kind()
        )));
    }

    match record {
        Record::Steps { start, end, count } => {
            out.push(Sample::interval(count as f64, start, end).map_err(malformed)?);
        }
        Record::HeartRate { samples, .. } => {
            for point in samples {
                let bpm = point.beats_per_minute as f64;
                out.push(Sample::instant(bpm, point.time).map_err(malformed)?);
            }
        }
        Record::RestingHeartRate {
            time,
            beats_per_minute,
        } => {
            out.push(Sample::instant(beats_per_minute as f64, time).map_err(malformed)?);
        }
        Record::HeartRateVariabilityRmssd {
            time,
            heart_rate_variability_millis,
        } => {
            out.push(Sample::instant(heart_rate_variability_millis, time).map_err(malformed)?);
        }
        Record::OxygenSaturation { time, percentage } => {
            out.push(Sample::instant(percentage, time).map_err(malformed)?);
        }
        Record::SleepSession { start, end, stage } => {
            let state = SleepState::from_stage_label(stage.as_deref());
            out.push(
                Sample::interval(0.0, start, end)
                    .map_err(malformed)?
                    .with_sleep_state(state),
            );
        }
    }
    Ok(())
}

fn malformed(error: SampleValidationError) -> HealthError {
    HealthError::Provider(format!("Malformed record: {error}"))
}
