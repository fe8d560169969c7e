//! Synthetic metric generation.
//!
//! Values come from a status-keyed base table scaled by the load factor
//! (`users / REFERENCE_USERS`) and independent multiplicative jitter, then
//! clamped to per-metric ceilings. The constants are tuned for plausible
//! charts, not derived from a queuing model.

use rand::Rng;

use super::model::MetricValues;
use crate::service::ServiceStatus;

/// User count at which the load factor is 1.
pub const REFERENCE_USERS: f64 = 50.0;
/// Above this load factor the error rate scales with load.
pub const ERROR_ESCALATION_THRESHOLD: f64 = 2.0;
/// Jitter is drawn uniformly from `[JITTER_MIN, JITTER_MAX)`.
pub const JITTER_MIN: f64 = 0.85;
pub const JITTER_MAX: f64 = 1.15;

pub const BASE_CPU_USAGE: f64 = 30.0;
pub const BASE_MEMORY_USAGE: f64 = 40.0;

/// Upper bound for each metric.
pub const CEILINGS: MetricValues = MetricValues {
    response_time: 500.0,
    throughput: 1000.0,
    error_rate: 100.0,
    cpu_usage: 100.0,
    memory_usage: 100.0,
};

/// Unscaled metric values for a service status.
pub fn base_values(status: ServiceStatus) -> MetricValues {
    let (response_time, throughput, error_rate) = match status {
        ServiceStatus::Online => (30.0, 100.0, 0.5),
        ServiceStatus::Warning => (80.0, 70.0, 5.0),
        ServiceStatus::Error => (200.0, 20.0, 25.0),
    };
    MetricValues {
        response_time,
        throughput,
        error_rate,
        cpu_usage: BASE_CPU_USAGE,
        memory_usage: BASE_MEMORY_USAGE,
    }
}

pub fn load_factor(concurrent_users: u32) -> f64 {
    f64::from(concurrent_users) / REFERENCE_USERS
}

/// Multiplier applied to the base error rate.
pub fn error_rate_multiplier(load_factor: f64) -> f64 {
    if load_factor > ERROR_ESCALATION_THRESHOLD {
        load_factor
    } else {
        1.0
    }
}

fn jitter<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(JITTER_MIN..JITTER_MAX)
}

/// Produces one set of metric values.
///
/// Latency and CPU scale linearly with the load factor, throughput and
/// memory with its square root. Each field draws its own jitter.
pub fn generate_values<R: Rng + ?Sized>(
    rng: &mut R,
    status: ServiceStatus,
    concurrent_users: u32,
) -> MetricValues {
    let base = base_values(status);
    let factor = load_factor(concurrent_users);
    let sqrt_factor = factor.sqrt();

    MetricValues {
        response_time: (base.response_time * factor * jitter(rng)).min(CEILINGS.response_time),
        throughput: (base.throughput * sqrt_factor * jitter(rng)).min(CEILINGS.throughput),
        error_rate: (base.error_rate * error_rate_multiplier(factor) * jitter(rng))
            .min(CEILINGS.error_rate),
        cpu_usage: (base.cpu_usage * factor * jitter(rng)).min(CEILINGS.cpu_usage),
        memory_usage: (base.memory_usage * sqrt_factor * jitter(rng)).min(CEILINGS.memory_usage),
    }
}
