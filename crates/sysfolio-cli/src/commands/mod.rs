pub mod config;
pub mod exec;
pub mod loadtest;
pub mod logs;

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use sysfolio_core::SysfolioConfig;

/// Loads the user configuration, defaults when no file exists.
pub fn load_config() -> Result<SysfolioConfig> {
    SysfolioConfig::load().context("Failed to load sysfolio configuration")
}

pub fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
