use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use sysfolio_core::log_stream::{self, LogFilter, LogStream};
use sysfolio_execution::{LogStreamRunner, SimulationEvent};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::{load_config, rng_for};

pub struct LogsArgs {
    pub service: String,
    pub filter: String,
    pub search: String,
    pub ticks: u64,
    pub seed: Option<u64>,
    pub export: Option<PathBuf>,
}

pub async fn run(args: LogsArgs) -> Result<()> {
    let config = load_config()?;
    let directory = config.service_directory()?;
    let service = directory.get(&args.service)?;
    let filter: LogFilter = args.filter.parse()?;

    // Canned logs are newest first; the stream appends at the back.
    let initial = service.logs.iter().rev().cloned();
    let mut stream = LogStream::new(initial, config.log_stream.capacity);

    let runner = LogStreamRunner::new(Duration::from_millis(config.log_stream.tick_millis));
    let mut rng = rng_for(args.seed);
    let (tx, mut rx) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();

    let search = args.search.clone();
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if let SimulationEvent::LogEntry(log) = event {
                if log_stream::matches(&log, filter, &search) {
                    println!("{}", log.render());
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

    println!("{}", log_stream::render(stream.filtered(filter, &args.search)));
    runner
        .run(&mut stream, &mut rng, &tx, cancel, Some(args.ticks))
        .await;
    interrupt.abort();
    drop(tx);
    printer.await?;

    let counts = stream.counts();
    println!(
        "-- {} entries: {} info, {} req, {} res, {} warn, {} error",
        counts.total(),
        counts.info,
        counts.req,
        counts.res,
        counts.warn,
        counts.error
    );

    if let Some(dir) = args.export {
        let path = dir.join(log_stream::export_file_name(
            &service.name,
            Local::now().date_naive(),
        ));
        fs::write(&path, log_stream::render(stream.filtered(filter, &args.search)))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Exported to {}", path.display());
    }
    Ok(())
}
