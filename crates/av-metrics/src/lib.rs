//! # av-metrics
//!
//! Derives an aligned table of financial metrics from already-fetched
//! AlphaVantage payloads.
//!
//! The pipeline has four stages:
//!
//! 1. [`normalizer`]: raw JSON payloads into typed records; a malformed field
//!    becomes absent instead of zero.
//! 2. [`calculator`]: valuation, profitability, growth, quality and momentum
//!    metrics per fiscal year, driven by a metric-definition table.
//! 3. [`timeframe`]: one window applied to both the metrics table (by period
//!    count) and the price series (by calendar span).
//! 4. [`format`]: K/M/B/T magnitude strings for display only.
//!
//! ## Usage
//!
//! ```ignore
//! use av_metrics::{MetricsPipeline, RawInput, Timeframe};
//!
//! let input = RawInput::from_json(overview, vec![income, balance, cash_flow], Some(daily))?;
//! let analysis = MetricsPipeline::new(config).run(&input, "5y".parse()?, today)?;
//! ```

#![warn(clippy::all)]

pub mod calculator;
pub mod format;
pub mod normalizer;
pub mod pipeline;
pub mod timeframe;

pub use calculator::{
  METRIC_DEFINITIONS, METRIC_TABLE_VERSION, MetricDefinition, MetricUnit, MetricsCalculator,
};
pub use format::{MagnitudeFormat, format_magnitude, format_value};
pub use normalizer::{NormalizedInput, normalize};
pub use pipeline::{Analysis, MetricsPipeline, RawInput};
pub use timeframe::{FiscalPeriod, Timeframe, TimeframeSpec};
