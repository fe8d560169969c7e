//! Telemetry domain models.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::error::{FolioError, Result};

/// The five synthetic metrics tracked during a load test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricValues {
    /// Milliseconds
    pub response_time: f64,
    /// Requests per second
    pub throughput: f64,
    /// Percent
    pub error_rate: f64,
    /// Percent
    pub cpu_usage: f64,
    /// Percent
    pub memory_usage: f64,
}

impl MetricValues {
    /// Field-by-field maximum of `self` and `other`.
    pub fn max(&self, other: &MetricValues) -> MetricValues {
        MetricValues {
            response_time: self.response_time.max(other.response_time),
            throughput: self.throughput.max(other.throughput),
            error_rate: self.error_rate.max(other.error_rate),
            cpu_usage: self.cpu_usage.max(other.cpu_usage),
            memory_usage: self.memory_usage.max(other.memory_usage),
        }
    }

    /// True when every field of `self` is at least the matching field of `other`.
    pub fn dominates(&self, other: &MetricValues) -> bool {
        self.response_time >= other.response_time
            && self.throughput >= other.throughput
            && self.error_rate >= other.error_rate
            && self.cpu_usage >= other.cpu_usage
            && self.memory_usage >= other.memory_usage
    }
}

/// One tick's worth of synthetic metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntheticMetricSample {
    /// Wall-clock label, `HH:MM:SS`
    pub time: String,
    #[serde(flatten)]
    pub values: MetricValues,
}

/// Validated load-test settings.
///
/// Bounds mirror the settings sliders: users 10..=500, duration 10..=120 s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadTestConfig {
    concurrent_users: u32,
    duration_secs: u32,
}

impl LoadTestConfig {
    pub const MIN_USERS: u32 = 10;
    pub const MAX_USERS: u32 = 500;
    pub const MIN_DURATION_SECS: u32 = 10;
    pub const MAX_DURATION_SECS: u32 = 120;

    pub fn new(concurrent_users: u32, duration_secs: u32) -> Result<Self> {
        if !(Self::MIN_USERS..=Self::MAX_USERS).contains(&concurrent_users) {
            return Err(FolioError::invalid_input(format!(
                "concurrent users must be between {} and {}, got {}",
                Self::MIN_USERS,
                Self::MAX_USERS,
                concurrent_users
            )));
        }
        if !(Self::MIN_DURATION_SECS..=Self::MAX_DURATION_SECS).contains(&duration_secs) {
            return Err(FolioError::invalid_input(format!(
                "duration must be between {} and {} seconds, got {}",
                Self::MIN_DURATION_SECS,
                Self::MAX_DURATION_SECS,
                duration_secs
            )));
        }
        Ok(Self {
            concurrent_users,
            duration_secs,
        })
    }

    pub fn concurrent_users(&self) -> u32 {
        self.concurrent_users
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }
}

impl Default for LoadTestConfig {
    fn default() -> Self {
        Self {
            concurrent_users: 50,
            duration_secs: 30,
        }
    }
}

/// Coarse expectation shown before a test starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
}

impl ImpactLevel {
    fn from_thresholds(users: u32, medium_from: u32, high_from: u32) -> Self {
        if users < medium_from {
            Self::Low
        } else if users < high_from {
            Self::Medium
        } else {
            Self::High
        }
    }
}

/// Expected impact of a user count on each headline metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedImpact {
    pub response_time: ImpactLevel,
    pub throughput: ImpactLevel,
    pub cpu_usage: ImpactLevel,
    pub error_rate: ImpactLevel,
}

impl ExpectedImpact {
    pub fn for_users(users: u32) -> Self {
        Self {
            response_time: ImpactLevel::from_thresholds(users, 100, 250),
            throughput: ImpactLevel::from_thresholds(users, 50, 200),
            cpu_usage: ImpactLevel::from_thresholds(users, 100, 300),
            error_rate: ImpactLevel::from_thresholds(users, 150, 350),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_bounds() {
        assert!(LoadTestConfig::new(10, 10).is_ok());
        assert!(LoadTestConfig::new(500, 120).is_ok());
        assert!(LoadTestConfig::new(9, 30).unwrap_err().is_invalid_input());
        assert!(LoadTestConfig::new(501, 30).is_err());
        assert!(LoadTestConfig::new(50, 121).is_err());
        assert_eq!(LoadTestConfig::default().concurrent_users(), 50);
    }

    #[test]
    fn test_expected_impact() {
        let low = ExpectedImpact::for_users(40);
        assert_eq!(low.throughput, ImpactLevel::Low);
        assert_eq!(low.error_rate, ImpactLevel::Low);

        let mid = ExpectedImpact::for_users(200);
        assert_eq!(mid.response_time, ImpactLevel::Medium);
        assert_eq!(mid.throughput, ImpactLevel::High);
        assert_eq!(mid.cpu_usage, ImpactLevel::Medium);
        assert_eq!(mid.error_rate, ImpactLevel::Medium);

        assert_eq!(ExpectedImpact::for_users(500).error_rate, ImpactLevel::High);
    }

    #[test]
    fn test_sample_serializes_flat() {
        let sample = SyntheticMetricSample {
            time: "12:00:01".to_string(),
            values: MetricValues {
                response_time: 31.0,
                ..MetricValues::default()
            },
        };
        let json = serde_json::to_value(&sample).unwrap();
        assert_eq!(json["time"], "12:00:01");
        assert_eq!(json["responseTime"], 31.0);
        assert_eq!(json["memoryUsage"], 0.0);
    }
}
