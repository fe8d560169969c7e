use std::sync::Arc;

use anyhow::Result;
use sysfolio_core::{Execution, Terminal};

use super::{load_config, rng_for};

/// Runs each line through a fresh terminal session.
pub fn run(lines: &[String], json: bool, seed: Option<u64>) -> Result<()> {
    let config = load_config()?;
    let directory = Arc::new(config.service_directory()?);
    let rng = rng_for(seed.or(config.load_test.seed));
    let mut terminal = Terminal::with_rng(directory, rng);

    for line in lines {
        match terminal.execute(line) {
            Execution::Recorded(record) if !json => println!("{}", record.output),
            _ => {}
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(terminal.records())?);
    }
    Ok(())
}
