//! Load-test session state machine.
//!
//! `Idle -> Running -> (Completed | Cancelled) -> Idle`. The session only
//! generates samples while running; the caller drives it by calling
//! [`LoadTestSession::tick`] once per period.

use std::collections::VecDeque;

use chrono::{Local, NaiveTime};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use super::generator::generate_values;
use super::model::{LoadTestConfig, MetricValues, SyntheticMetricSample};
use crate::service::{Service, ServiceStatus};

/// Default number of samples kept in the rolling window.
pub const DEFAULT_WINDOW: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Idle,
    Running,
}

/// How the last run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StopReason {
    /// Elapsed time reached the configured duration.
    Completed,
    /// Stopped by the user.
    Cancelled,
}

/// Result of one tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The session was not running; nothing happened.
    Idle,
    /// A sample was generated and the session keeps running.
    Sample(SyntheticMetricSample),
    /// A final sample was generated and the session completed.
    Completed(SyntheticMetricSample),
}

/// Target of a load test: which service and with what canned status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadTestTarget {
    pub service_id: String,
    pub service_name: String,
    pub status: ServiceStatus,
}

impl From<&Service> for LoadTestTarget {
    fn from(service: &Service) -> Self {
        Self {
            service_id: service.id.clone(),
            service_name: service.name.clone(),
            status: service.status,
        }
    }
}

/// Ephemeral state of one simulated load test.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadTestSession {
    target: Option<LoadTestTarget>,
    config: LoadTestConfig,
    elapsed_secs: u32,
    phase: SessionPhase,
    last_stop: Option<StopReason>,
    window: usize,
    samples: VecDeque<SyntheticMetricSample>,
    peaks: MetricValues,
    total_samples: u64,
}

impl Default for LoadTestSession {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl LoadTestSession {
    /// Creates an idle session keeping at most `window` samples.
    pub fn new(window: usize) -> Self {
        let window = window.max(1);
        Self {
            target: None,
            config: LoadTestConfig::default(),
            elapsed_secs: 0,
            phase: SessionPhase::Idle,
            last_stop: None,
            window,
            samples: VecDeque::with_capacity(window),
            peaks: MetricValues::default(),
            total_samples: 0,
        }
    }

    /// Starts (or restarts) a run, clearing samples, peaks and elapsed time.
    pub fn start(&mut self, target: impl Into<LoadTestTarget>, config: LoadTestConfig) {
        let target = target.into();
        info!(
            service = %target.service_id,
            users = config.concurrent_users(),
            duration_secs = config.duration_secs(),
            "load test started"
        );
        self.target = Some(target);
        self.config = config;
        self.elapsed_secs = 0;
        self.samples.clear();
        self.peaks = MetricValues::default();
        self.total_samples = 0;
        self.last_stop = None;
        self.phase = SessionPhase::Running;
    }

    /// Stops a running session. Samples and peaks keep their last values.
    ///
    /// Returns false when the session was not running.
    pub fn cancel(&mut self) -> bool {
        if self.phase != SessionPhase::Running {
            return false;
        }
        info!(elapsed_secs = self.elapsed_secs, "load test cancelled");
        self.stop(StopReason::Cancelled);
        true
    }

    /// Applies one tick, labelling the sample with the current local time.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> TickOutcome {
        self.tick_at(rng, Local::now().time())
    }

    /// Applies one tick with an explicit sample time.
    pub fn tick_at<R: Rng + ?Sized>(&mut self, rng: &mut R, time: NaiveTime) -> TickOutcome {
        if self.phase != SessionPhase::Running {
            return TickOutcome::Idle;
        }
        let Some(status) = self.target.as_ref().map(|t| t.status) else {
            return TickOutcome::Idle;
        };

        self.elapsed_secs += 1;

        let sample = SyntheticMetricSample {
            time: time.format("%H:%M:%S").to_string(),
            values: generate_values(rng, status, self.config.concurrent_users()),
        };
        self.peaks = self.peaks.max(&sample.values);
        if self.samples.len() >= self.window {
            self.samples.pop_front();
        }
        self.samples.push_back(sample.clone());
        self.total_samples += 1;

        debug!(
            elapsed_secs = self.elapsed_secs,
            response_time = sample.values.response_time,
            error_rate = sample.values.error_rate,
            "load test sample"
        );

        if self.elapsed_secs >= self.config.duration_secs() {
            info!(total_samples = self.total_samples, "load test completed");
            self.stop(StopReason::Completed);
            TickOutcome::Completed(sample)
        } else {
            TickOutcome::Sample(sample)
        }
    }

    fn stop(&mut self, reason: StopReason) {
        self.phase = SessionPhase::Idle;
        self.elapsed_secs = 0;
        self.last_stop = Some(reason);
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    pub fn last_stop(&self) -> Option<StopReason> {
        self.last_stop
    }

    pub fn target(&self) -> Option<&LoadTestTarget> {
        self.target.as_ref()
    }

    pub fn config(&self) -> LoadTestConfig {
        self.config
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn samples(&self) -> &VecDeque<SyntheticMetricSample> {
        &self.samples
    }

    pub fn latest(&self) -> Option<&SyntheticMetricSample> {
        self.samples.back()
    }

    /// Running element-wise maximum over every sample of the current run.
    pub fn peaks(&self) -> MetricValues {
        self.peaks
    }

    /// Samples generated in the current run, including ones dropped from the window.
    pub fn total_samples(&self) -> u64 {
        self.total_samples
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn target(status: ServiceStatus) -> LoadTestTarget {
        LoadTestTarget {
            service_id: "api-gateway".to_string(),
            service_name: "API Gateway".to_string(),
            status,
        }
    }

    fn noon() -> NaiveTime {
        NaiveTime::from_hms_opt(12, 0, 0).unwrap()
    }

    #[test]
    fn test_idle_session_ignores_ticks() {
        let mut session = LoadTestSession::default();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(session.tick_at(&mut rng, noon()), TickOutcome::Idle);
        assert!(session.samples().is_empty());
        assert!(!session.cancel());
    }

    #[test]
    fn test_completes_after_duration_ticks() {
        let mut session = LoadTestSession::default();
        let mut rng = StdRng::seed_from_u64(2);
        session.start(target(ServiceStatus::Online), LoadTestConfig::new(50, 10).unwrap());

        for tick in 1..10 {
            assert!(matches!(session.tick_at(&mut rng, noon()), TickOutcome::Sample(_)));
            assert_eq!(session.elapsed_secs(), tick);
        }
        assert!(matches!(session.tick_at(&mut rng, noon()), TickOutcome::Completed(_)));
        assert!(!session.is_running());
        assert_eq!(session.elapsed_secs(), 0);
        assert_eq!(session.last_stop(), Some(StopReason::Completed));
        assert_eq!(session.samples().len(), 10);
        assert_eq!(session.tick_at(&mut rng, noon()), TickOutcome::Idle);
    }

    #[test]
    fn test_latest_is_the_final_sample() {
        let mut session = LoadTestSession::default();
        let mut rng = StdRng::seed_from_u64(6);
        assert!(session.latest().is_none());

        session.start(target(ServiceStatus::Online), LoadTestConfig::new(10, 10).unwrap());
        let mut last = None;
        for _ in 0..10 {
            last = match session.tick_at(&mut rng, noon()) {
                TickOutcome::Sample(sample) | TickOutcome::Completed(sample) => Some(sample),
                TickOutcome::Idle => None,
            };
        }
        assert_eq!(session.latest(), last.as_ref());
        assert_eq!(session.latest().map(|s| s.time.as_str()), Some("12:00:00"));
    }

    #[test]
    fn test_window_is_bounded_but_peaks_cover_all_samples() {
        let mut session = LoadTestSession::new(5);
        let mut rng = StdRng::seed_from_u64(3);
        session.start(target(ServiceStatus::Warning), LoadTestConfig::new(300, 60).unwrap());

        let mut expected = MetricValues::default();
        let mut previous = session.peaks();
        for _ in 0..40 {
            if let TickOutcome::Sample(sample) = session.tick_at(&mut rng, noon()) {
                expected = expected.max(&sample.values);
            }
            assert!(session.samples().len() <= 5);
            assert!(session.peaks().dominates(&previous));
            previous = session.peaks();
        }
        assert_eq!(session.samples().len(), 5);
        assert_eq!(session.total_samples(), 40);
        assert_eq!(session.peaks(), expected);
    }

    #[test]
    fn test_cancel_keeps_samples_and_restart_clears() {
        let mut session = LoadTestSession::default();
        let mut rng = StdRng::seed_from_u64(4);
        session.start(target(ServiceStatus::Online), LoadTestConfig::default());
        for _ in 0..3 {
            session.tick_at(&mut rng, noon());
        }
        assert!(session.cancel());
        assert_eq!(session.last_stop(), Some(StopReason::Cancelled));
        assert_eq!(session.elapsed_secs(), 0);
        assert_eq!(session.samples().len(), 3);
        let peaks = session.peaks();
        assert!(peaks.response_time > 0.0);

        session.start(target(ServiceStatus::Online), LoadTestConfig::default());
        assert!(session.samples().is_empty());
        assert_eq!(session.peaks(), MetricValues::default());
        assert_eq!(session.last_stop(), None);
    }

    #[test]
    fn test_sample_time_label() {
        let mut session = LoadTestSession::default();
        let mut rng = StdRng::seed_from_u64(5);
        session.start(target(ServiceStatus::Error), LoadTestConfig::default());
        let at = NaiveTime::from_hms_opt(9, 4, 7).unwrap();
        match session.tick_at(&mut rng, at) {
            TickOutcome::Sample(sample) => assert_eq!(sample.time, "09:04:07"),
            other => panic!("unexpected outcome {other:?}"),
        }
    }
}
