//! Configuration for metric derivation and display

use crate::error::{Error, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// Rounding, display and lookback settings shared by the metrics pipeline
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
  /// Decimal places for plain ratios (P/E, debt-to-equity, asset turnover)
  pub ratio_precision: u32,

  /// Decimal places for metrics expressed as a percentage (value x 100)
  pub percent_precision: u32,

  /// Decimal places for fractional yields (free cash flow yield)
  pub yield_precision: u32,

  /// Decimal places used by the magnitude formatter
  pub display_precision: u32,

  /// Number of trading observations back for price momentum
  pub momentum_lookback: usize,
}

impl Default for Config {
  fn default() -> Self {
    Config {
      ratio_precision: crate::DEFAULT_RATIO_PRECISION,
      percent_precision: crate::DEFAULT_PERCENT_PRECISION,
      yield_precision: crate::DEFAULT_YIELD_PRECISION,
      display_precision: crate::DEFAULT_DISPLAY_PRECISION,
      momentum_lookback: crate::DEFAULT_MOMENTUM_LOOKBACK,
    }
  }
}

impl Config {
  /// Load configuration from environment variables, falling back to defaults
  pub fn from_env() -> Result<Self> {
    dotenv().ok();
    Self::from_lookup(|key| env::var(key).ok())
  }

  /// Build a config from an arbitrary key lookup (environment, map, ...)
  pub fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let defaults = Config::default();

    let config = Config {
      ratio_precision: read_var(&lookup, "AV_RATIO_PRECISION", defaults.ratio_precision)?,
      percent_precision: read_var(&lookup, "AV_PERCENT_PRECISION", defaults.percent_precision)?,
      yield_precision: read_var(&lookup, "AV_YIELD_PRECISION", defaults.yield_precision)?,
      display_precision: read_var(&lookup, "AV_DISPLAY_PRECISION", defaults.display_precision)?,
      momentum_lookback: read_var(&lookup, "AV_MOMENTUM_LOOKBACK", defaults.momentum_lookback)?,
    };

    config.validate()?;
    Ok(config)
  }

  /// Override the momentum lookback
  pub fn with_momentum_lookback(mut self, lookback: usize) -> Result<Self> {
    self.momentum_lookback = lookback;
    self.validate()?;
    Ok(self)
  }

  fn validate(&self) -> Result<()> {
    if self.momentum_lookback == 0 {
      return Err(Error::Config("AV_MOMENTUM_LOOKBACK must be at least 1".to_string()));
    }

    // f64 carries ~15 significant digits, more places only adds noise
    for (name, places) in [
      ("AV_RATIO_PRECISION", self.ratio_precision),
      ("AV_PERCENT_PRECISION", self.percent_precision),
      ("AV_YIELD_PRECISION", self.yield_precision),
      ("AV_DISPLAY_PRECISION", self.display_precision),
    ] {
      if places > crate::MAX_PRECISION {
        return Err(Error::Config(format!(
          "{} must be at most {} (got {})",
          name,
          crate::MAX_PRECISION,
          places
        )));
      }
    }

    Ok(())
  }
}

fn read_var<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
  F: Fn(&str) -> Option<String>,
  T: FromStr,
{
  match lookup(key) {
    Some(raw) => raw.trim().parse().map_err(|_| Error::Config(format!("Invalid {}: {:?}", key, raw))),
    None => Ok(default),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> =
      pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |key: &str| map.get(key).cloned()
  }

  #[test]
  fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.ratio_precision, 2);
    assert_eq!(config.percent_precision, 2);
    assert_eq!(config.yield_precision, 4);
    assert_eq!(config.display_precision, 2);
    assert_eq!(config.momentum_lookback, 5);
  }

  #[test]
  fn test_config_from_lookup_overrides() {
    let config =
      Config::from_lookup(lookup_from(&[("AV_YIELD_PRECISION", "6"), ("AV_MOMENTUM_LOOKBACK", "20")]))
        .unwrap();
    assert_eq!(config.yield_precision, 6);
    assert_eq!(config.momentum_lookback, 20);
    assert_eq!(config.percent_precision, 2);
  }

  #[test]
  fn test_config_rejects_garbage() {
    let err = Config::from_lookup(lookup_from(&[("AV_PERCENT_PRECISION", "two")])).unwrap_err();
    assert!(matches!(err, Error::Config(_)));
  }

  #[test]
  fn test_config_rejects_zero_lookback() {
    let err = Config::from_lookup(lookup_from(&[("AV_MOMENTUM_LOOKBACK", "0")])).unwrap_err();
    assert!(err.to_string().contains("AV_MOMENTUM_LOOKBACK"));
    assert!(Config::default().with_momentum_lookback(0).is_err());
  }

  #[test]
  fn test_config_rejects_excessive_precision() {
    assert!(Config::from_lookup(lookup_from(&[("AV_RATIO_PRECISION", "40")])).is_err());
  }
}
