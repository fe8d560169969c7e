//! Timer-driven runners for the load-test session and the log stream.
//!
//! Each runner owns one `tokio::time::interval` and applies exactly one state
//! transition per tick. Cancellation goes through a [`CancellationToken`] and
//! takes effect before the next tick.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use rand::Rng;
use sysfolio_core::log_stream::LogStream;
use sysfolio_core::telemetry::{
    LoadTestConfig, LoadTestSession, LoadTestTarget, StopReason, TickOutcome,
};
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::event::SimulationEvent;
use crate::probe::{HealthProbe, ProbeOutcome};

/// Drives a [`LoadTestSession`] once per tick until it completes or is cancelled.
pub struct LoadTestRunner {
    tick: Duration,
    probe: Option<Arc<dyn HealthProbe>>,
}

impl LoadTestRunner {
    pub fn new(tick: Duration) -> Self {
        Self { tick, probe: None }
    }

    /// Checks the API with `probe` before each run.
    pub fn with_probe(mut self, probe: Arc<dyn HealthProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Starts `session` against `target` and ticks it until it stops.
    ///
    /// Samples and notices are sent on `events`; a dropped receiver does not
    /// stop the run.
    pub async fn run<R: Rng + Send + ?Sized>(
        &self,
        session: &mut LoadTestSession,
        target: LoadTestTarget,
        config: LoadTestConfig,
        rng: &mut R,
        events: &UnboundedSender<SimulationEvent>,
        cancel: CancellationToken,
    ) -> StopReason {
        if let Some(probe) = &self.probe {
            match probe.probe().await {
                Ok(ProbeOutcome::Reachable) => {}
                Ok(ProbeOutcome::Unavailable { status }) => {
                    warn!(status, "profile probe returned non-success status");
                    let _ = events.send(SimulationEvent::ApiUnavailable { status });
                }
                Err(e) => warn!(error = %e, "API test call failed, continuing simulation"),
            }
        }

        session.start(target.clone(), config);
        let _ = events.send(SimulationEvent::Started {
            target: target.clone(),
            concurrent_users: config.concurrent_users(),
            duration_secs: config.duration_secs(),
        });

        let mut ticker = interval(self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; samples start one period in.
        ticker.tick().await;

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    let elapsed_secs = session.elapsed_secs();
                    session.cancel();
                    let _ = events.send(SimulationEvent::Cancelled {
                        elapsed_secs,
                        peaks: session.peaks(),
                    });
                    return StopReason::Cancelled;
                }
                _ = ticker.tick() => {
                    let elapsed_secs = session.elapsed_secs() + 1;
                    match session.tick(rng) {
                        TickOutcome::Sample(sample) => {
                            let _ = events.send(SimulationEvent::Sample { elapsed_secs, sample });
                        }
                        TickOutcome::Completed(sample) => {
                            let _ = events.send(SimulationEvent::Sample { elapsed_secs, sample });
                            let _ = events.send(SimulationEvent::Completed {
                                target,
                                duration_secs: config.duration_secs(),
                                peaks: session.peaks(),
                            });
                            return StopReason::Completed;
                        }
                        TickOutcome::Idle => {
                            return session.last_stop().unwrap_or(StopReason::Cancelled);
                        }
                    }
                }
            }
        }
    }
}

/// Drives a [`LogStream`] once per tick.
pub struct LogStreamRunner {
    tick: Duration,
}

impl LogStreamRunner {
    pub fn new(tick: Duration) -> Self {
        Self { tick }
    }

    /// Ticks `stream` until cancelled or, when given, `max_ticks` have elapsed.
    /// Returns the number of entries emitted.
    pub async fn run<R: Rng + Send + ?Sized>(
        &self,
        stream: &mut LogStream,
        rng: &mut R,
        events: &UnboundedSender<SimulationEvent>,
        cancel: CancellationToken,
        max_ticks: Option<u64>,
    ) -> usize {
        let mut ticker = interval(self.tick);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        let mut ticks = 0u64;
        let mut emitted = 0usize;
        while max_ticks.is_none_or(|max| ticks < max) {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    ticks += 1;
                    if let Some(entry) = stream.tick(rng, Local::now()) {
                        emitted += 1;
                        let _ = events.send(SimulationEvent::LogEntry(entry.clone()));
                    }
                }
            }
        }
        info!(ticks, emitted, "log stream stopped");
        emitted
    }
}
