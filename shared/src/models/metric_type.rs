//! Metric families, their native record kinds and read scopes.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// A health metric family that can be read through the bridge.
///
/// The set is closed: every variant maps to exactly one native record kind
/// and one normalization rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricType {
    /// Step counts over intervals.
    Steps,
    /// Heart rate series (beats per minute).
    HeartRate,
    /// Daily resting heart rate (beats per minute).
    RestingHeartRate,
    /// Heart-rate variability, RMSSD in milliseconds.
    #[serde(alias = "heartRateVariability")]
    Hrv,
    /// Blood oxygen saturation percentage.
    #[serde(alias = "oxygenSaturation")]
    Spo2,
    /// Sleep sessions.
    Sleep,
}

impl MetricType {
    /// Every metric family, in bridge declaration order.
    pub const ALL: [MetricType; 6] = [
        Self::Steps,
        Self::HeartRate,
        Self::RestingHeartRate,
        Self::Hrv,
        Self::Spo2,
        Self::Sleep,
    ];

    /// Returns the wire tag of this metric (e.g. `heartRate`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Steps => "steps",
            Self::HeartRate => "heartRate",
            Self::RestingHeartRate => "restingHeartRate",
            Self::Hrv => "hrv",
            Self::Spo2 => "spo2",
            Self::Sleep => "sleep",
        }
    }

    /// Returns the native record kind the provider stores this metric as.
    #[must_use]
    pub fn record_kind(self) -> RecordKind {
        match self {
            Self::Steps => RecordKind::Steps,
            Self::HeartRate => RecordKind::HeartRate,
            Self::RestingHeartRate => RecordKind::RestingHeartRate,
            Self::Hrv => RecordKind::HeartRateVariabilityRmssd,
            Self::Spo2 => RecordKind::OxygenSaturation,
            Self::Sleep => RecordKind::SleepSession,
        }
    }

    /// Returns the read scope required for this metric.
    #[must_use]
    pub fn scope(self) -> PermissionScope {
        PermissionScope::read(self)
    }

    /// Returns the name of the bridge method that reads this metric.
    #[must_use]
    pub fn bridge_method(self) -> &'static str {
        match self {
            Self::Steps => "readSteps",
            Self::HeartRate => "readHeartRate",
            Self::RestingHeartRate => "readRestingHeartRate",
            Self::Hrv => "readHRV",
            Self::Spo2 => "readSpO2",
            Self::Sleep => "readSleep",
        }
    }

    /// Looks up the metric read by a bridge method name.
    #[must_use]
    pub fn from_bridge_method(method: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.bridge_method() == method)
    }
}

impl std::fmt::Display for MetricType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a metric tag is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown metric type: '{0}'")]
pub struct UnknownMetricType(pub String);

impl FromStr for MetricType {
    type Err = UnknownMetricType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "steps" => Ok(Self::Steps),
            "heartRate" => Ok(Self::HeartRate),
            "restingHeartRate" => Ok(Self::RestingHeartRate),
            "hrv" | "heartRateVariability" => Ok(Self::Hrv),
            "spo2" | "oxygenSaturation" => Ok(Self::Spo2),
            "sleep" => Ok(Self::Sleep),
            other => Err(UnknownMetricType(other.to_string())),
        }
    }
}

/// Native record family stored by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordKind {
    /// Interval step counts.
    Steps,
    /// Series record holding nested heart-rate points.
    HeartRate,
    /// Point-in-time resting heart rate.
    RestingHeartRate,
    /// Point-in-time HRV (RMSSD).
    HeartRateVariabilityRmssd,
    /// Point-in-time oxygen saturation.
    OxygenSaturation,
    /// Interval sleep session.
    SleepSession,
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Steps => write!(f, "StepsRecord"),
            Self::HeartRate => write!(f, "HeartRateRecord"),
            Self::RestingHeartRate => write!(f, "RestingHeartRateRecord"),
            Self::HeartRateVariabilityRmssd => write!(f, "HeartRateVariabilityRmssdRecord"),
            Self::OxygenSaturation => write!(f, "OxygenSaturationRecord"),
            Self::SleepSession => write!(f, "SleepSessionRecord"),
        }
    }
}

/// A read permission for one metric family.
///
/// Serialized as `read:<metric>`, e.g. `read:heartRate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PermissionScope {
    metric: MetricType,
}

impl PermissionScope {
    const PREFIX: &'static str = "read:";

    /// Creates the read scope for a metric.
    #[must_use]
    pub fn read(metric: MetricType) -> Self {
        Self { metric }
    }

    /// Returns the metric this scope grants access to.
    #[must_use]
    pub fn metric(self) -> MetricType {
        self.metric
    }

    /// Returns the full scope set supported by the bridge.
    #[must_use]
    pub fn all() -> Vec<Self> {
        MetricType::ALL.into_iter().map(Self::read).collect()
    }
}

impl std::fmt::Display for PermissionScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", Self::PREFIX, self.metric)
    }
}

impl FromStr for PermissionScope {
    type Err = UnknownMetricType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let metric = s
            .strip_prefix(Self::PREFIX)
            .ok_or_else(|| UnknownMetricType(s.to_string()))?;
        Ok(Self::read(metric.parse()?))
    }
}

impl TryFrom<String> for PermissionScope {
    type Error = UnknownMetricType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PermissionScope> for String {
    fn from(scope: PermissionScope) -> Self {
        scope.to_string()
    }
}
