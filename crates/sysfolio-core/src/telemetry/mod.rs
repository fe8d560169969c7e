//! Synthetic telemetry: metric generation and the load-test session.

pub mod generator;
pub mod model;
pub mod session;

pub use generator::{generate_values, load_factor};
pub use model::{ExpectedImpact, ImpactLevel, LoadTestConfig, MetricValues, SyntheticMetricSample};
pub use session::{
    LoadTestSession, LoadTestTarget, SessionPhase, StopReason, TickOutcome, DEFAULT_WINDOW,
};
