//! Events emitted while a simulation runs, for whatever view renders it.

use serde::Serialize;
use sysfolio_core::service::ServiceLog;
use sysfolio_core::telemetry::{LoadTestTarget, MetricValues, SyntheticMetricSample};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum SimulationEvent {
    /// The profile probe got a non-success status.
    ApiUnavailable { status: u16 },
    Started {
        target: LoadTestTarget,
        concurrent_users: u32,
        duration_secs: u32,
    },
    Sample {
        elapsed_secs: u32,
        sample: SyntheticMetricSample,
    },
    Completed {
        target: LoadTestTarget,
        duration_secs: u32,
        peaks: MetricValues,
    },
    Cancelled {
        elapsed_secs: u32,
        peaks: MetricValues,
    },
    LogEntry(ServiceLog),
}

impl SimulationEvent {
    /// One-line notice for the event, if it warrants one.
    pub fn notice(&self) -> Option<String> {
        match self {
            Self::ApiUnavailable { status } => Some(format!(
                "API Connection Error: Could not connect to API server. Status: {status}"
            )),
            Self::Started {
                target,
                concurrent_users,
                duration_secs,
            } => Some(format!(
                "Load test started: Testing {} with {} concurrent users for {} seconds.",
                target.service_name, concurrent_users, duration_secs
            )),
            Self::Completed {
                target,
                duration_secs,
                ..
            } => Some(format!(
                "Load test completed: Test on {} completed successfully after {} seconds.",
                target.service_name, duration_secs
            )),
            Self::Cancelled { .. } => Some(
                "Load test stopped: Test was manually interrupted before completion.".to_string(),
            ),
            Self::Sample { .. } | Self::LogEntry(_) => None,
        }
    }
}
