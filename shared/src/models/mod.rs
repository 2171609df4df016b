//! Data models for the Healthbridge sample pipeline.
//!
//! This module contains the metric families, read windows, provider-native
//! records and the uniform [`Sample`] every read produces.

pub mod metric_type;
pub mod record;
pub mod sample;
pub mod time_range;

pub use metric_type::{MetricType, PermissionScope, RecordKind, UnknownMetricType};
pub use record::{HeartRatePoint, Record};
pub use sample::{Sample, SampleValidationError, SleepState};
pub use time_range::{TimeRange, TimeRangeError};
