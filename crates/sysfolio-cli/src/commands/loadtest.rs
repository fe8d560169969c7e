use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use sysfolio_core::telemetry::{LoadTestConfig, LoadTestSession, LoadTestTarget};
use sysfolio_execution::{HttpProfileProbe, LoadTestRunner, SimulationEvent};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::{load_config, rng_for};

pub struct LoadTestArgs {
    pub service: String,
    pub users: Option<u32>,
    pub duration: Option<u32>,
    pub seed: Option<u64>,
    pub tick_millis: Option<u64>,
    pub json: bool,
}

pub async fn run(args: LoadTestArgs) -> Result<()> {
    let config = load_config()?;
    let directory = config.service_directory()?;
    let service = directory.get(&args.service)?;

    let settings = &config.load_test;
    let test_config = LoadTestConfig::new(
        args.users.unwrap_or(settings.concurrent_users),
        args.duration.unwrap_or(settings.duration_secs),
    )?;
    let tick = Duration::from_millis(args.tick_millis.unwrap_or(settings.tick_millis));

    let mut runner = LoadTestRunner::new(tick);
    if config.api.probe {
        match HttpProfileProbe::new(&config.api.base_url, Duration::from_secs(config.api.timeout_secs)) {
            Ok(probe) => runner = runner.with_probe(Arc::new(probe)),
            Err(e) => warn!(error = %e, "profile probe disabled"),
        }
    }

    let mut rng = rng_for(args.seed.or(settings.seed));
    let mut session = LoadTestSession::new(settings.window);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();

    let json = args.json;
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if json {
                match serde_json::to_string(&event) {
                    Ok(line) => println!("{line}"),
                    Err(e) => warn!(error = %e, "failed to serialize event"),
                }
                continue;
            }
            match &event {
                SimulationEvent::Sample { elapsed_secs, sample } => {
                    let v = &sample.values;
                    println!(
                        "[{:>3}s] {} rt={:.1}ms tp={:.1}req/s err={:.2}% cpu={:.1}% mem={:.1}%",
                        elapsed_secs,
                        sample.time,
                        v.response_time,
                        v.throughput,
                        v.error_rate,
                        v.cpu_usage,
                        v.memory_usage
                    );
                }
                other => {
                    if let Some(notice) = other.notice() {
                        println!("{notice}");
                    }
                }
            }
        }
    });

    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    runner
        .run(
            &mut session,
            LoadTestTarget::from(service),
            test_config,
            &mut rng,
            &tx,
            cancel,
        )
        .await;
    interrupt.abort();
    drop(tx);
    printer.await?;

    if !json {
        let peaks = session.peaks();
        println!(
            "Peaks: rt={:.1}ms tp={:.1}req/s err={:.2}% cpu={:.1}% mem={:.1}%",
            peaks.response_time,
            peaks.throughput,
            peaks.error_rate,
            peaks.cpu_usage,
            peaks.memory_usage
        );
    }
    Ok(())
}
