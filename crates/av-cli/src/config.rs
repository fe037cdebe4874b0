use anyhow::{Context, Result};
use av_core::Config as CoreConfig;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
  pub metrics_config: CoreConfig,
  /// Directory holding one sub-directory of saved responses per symbol
  pub data_dir: PathBuf,
}

impl Config {
  pub fn from_env() -> Result<Self> {
    let metrics_config = CoreConfig::from_env().context("Invalid metrics configuration")?;

    let data_dir = env::var("AV_DATA_DIR").unwrap_or_else(|_| "./data".to_string()).into();

    Ok(Self { metrics_config, data_dir })
  }
}
