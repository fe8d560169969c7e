use anyhow::Result;
use sysfolio_core::SysfolioConfig;

use super::load_config;

pub fn show() -> Result<()> {
    let config = load_config()?;
    print!("{}", config.to_toml_string()?);
    Ok(())
}

pub fn path() -> Result<()> {
    println!("{}", SysfolioConfig::default_path()?.display());
    Ok(())
}
