use chrono::NaiveTime;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sysfolio_core::service::ServiceStatus;
use sysfolio_core::telemetry::generator::{base_values, CEILINGS, JITTER_MIN};
use sysfolio_core::telemetry::{
    load_factor, LoadTestConfig, LoadTestSession, LoadTestTarget, StopReason, TickOutcome,
};

fn target(status: ServiceStatus) -> LoadTestTarget {
    LoadTestTarget {
        service_id: "cache-service".to_string(),
        service_name: "Cache Service".to_string(),
        status,
    }
}

#[test]
fn test_heavy_load_scenario() {
    let mut session = LoadTestSession::default();
    let mut rng = StdRng::seed_from_u64(500);
    session.start(target(ServiceStatus::Online), LoadTestConfig::new(500, 10).unwrap());
    assert_eq!(load_factor(500), 10.0);

    let time = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
    let mut outcomes = Vec::new();
    for _ in 0..10 {
        outcomes.push(session.tick_at(&mut rng, time));
    }

    assert!(matches!(outcomes.last(), Some(TickOutcome::Completed(_))));
    assert!(!session.is_running());
    assert_eq!(session.elapsed_secs(), 0);
    assert_eq!(session.last_stop(), Some(StopReason::Completed));
    assert!(session.samples().len() <= 10);

    // 0.5% base escalated by the load factor of 10
    let escalated_floor = base_values(ServiceStatus::Online).error_rate * 10.0 * JITTER_MIN;
    assert!(session.peaks().error_rate >= escalated_floor);
    assert!(CEILINGS.dominates(&session.peaks()));
}

#[test]
fn test_buffer_never_exceeds_window() {
    let mut session = LoadTestSession::default();
    let mut rng = StdRng::seed_from_u64(1);
    session.start(target(ServiceStatus::Warning), LoadTestConfig::new(120, 120).unwrap());
    for _ in 0..119 {
        session.tick(&mut rng);
        assert!(session.samples().len() <= session.window());
    }
    assert_eq!(session.samples().len(), 30);
    assert!(session.is_running());
}

#[test]
fn test_restart_after_completion_starts_empty() {
    let mut session = LoadTestSession::default();
    let mut rng = StdRng::seed_from_u64(2);
    let config = LoadTestConfig::new(50, 10).unwrap();

    session.start(target(ServiceStatus::Error), config);
    while session.is_running() {
        session.tick(&mut rng);
    }
    assert_eq!(session.samples().len(), 10);

    session.start(target(ServiceStatus::Error), config);
    assert!(session.samples().is_empty());
    assert_eq!(session.peaks().throughput, 0.0);
    assert!(session.is_running());
}

#[test]
fn test_same_seed_same_samples() {
    let run = |seed| {
        let mut session = LoadTestSession::default();
        let mut rng = StdRng::seed_from_u64(seed);
        let time = NaiveTime::from_hms_opt(8, 30, 0).unwrap();
        session.start(target(ServiceStatus::Online), LoadTestConfig::default());
        (0..5)
            .map(|_| session.tick_at(&mut rng, time))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(77), run(77));
    assert_ne!(run(77), run(78));
}
