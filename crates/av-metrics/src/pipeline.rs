/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-at-]dwightjbrowne[-dot-]com
 *
 *
 * Permission is hereby granted, free of charge, to any person obtaining a copy
 * of this software and associated documentation files (the "Software"), to deal
 * in the Software without restriction, including without limitation the rights
 * to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
 * copies of the Software, and to permit persons to whom the Software is
 * furnished to do so, subject to the following conditions:
 *
 * The above copyright notice and this permission notice shall be included in all
 * copies or substantial portions of the Software.
 *
 * THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
 * IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
 * FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
 * AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
 * LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
 * OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
 * SOFTWARE.
 */

//! End-to-end run: normalize -> calculate -> filter.

use crate::calculator::{METRIC_TABLE_VERSION, MetricsCalculator};
use crate::format::display_cells;
use crate::normalizer::normalize;
use crate::timeframe::{Timeframe, TimeframeSpec};
use av_core::{Config, Result};
use av_models::{
  CompanyOverview, OverviewPayload, PeriodMetrics, PriceSeries, StatementPayload, TimeSeriesPayload,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

/// Already-fetched payloads for one symbol
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawInput {
  pub overview: OverviewPayload,

  /// Income statement first, then balance sheet and cash flow if available
  pub statements: Vec<StatementPayload>,

  pub time_series: Option<TimeSeriesPayload>,
}

impl RawInput {
  pub fn from_json(overview: Value, statements: Vec<Value>, time_series: Option<Value>) -> Result<Self> {
    Ok(RawInput {
      overview: serde_json::from_value(overview)?,
      statements: statements.into_iter().map(serde_json::from_value).collect::<std::result::Result<_, _>>()?,
      time_series: time_series.map(serde_json::from_value).transpose()?,
    })
  }

  /// Symbol from whichever payload names one
  pub fn symbol(&self) -> Option<String> {
    self
      .overview
      .symbol()
      .map(str::to_string)
      .or_else(|| self.statements.iter().find_map(|s| s.symbol.clone()))
      .or_else(|| self.time_series.as_ref().and_then(|t| t.symbol().map(str::to_string)))
  }
}

/// Result of one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
  pub symbol: Option<String>,

  /// Version of the metric-definition table the rows were derived with
  pub metric_table_version: u32,

  pub timeframe: TimeframeSpec,
  pub overview: CompanyOverview,

  /// Every period, most recent first
  pub periods: Vec<PeriodMetrics>,

  /// Periods inside the timeframe, most recent first
  pub filtered_periods: Vec<PeriodMetrics>,

  /// Price series clipped to the same timeframe, oldest first
  pub prices: PriceSeries,
}

impl Analysis {
  /// Filtered periods re-sorted oldest first, for charts
  pub fn chronological(&self) -> Vec<PeriodMetrics> {
    self.filtered_periods.iter().rev().cloned().collect()
  }

  /// Formatted cells of the filtered table
  pub fn display_rows(&self, config: &Config) -> Vec<Vec<String>> {
    self.filtered_periods.iter().map(|row| display_cells(row, config)).collect()
  }
}

/// Runs the full derivation for one symbol. Holds no state between runs, so
/// one pipeline can serve any number of symbols concurrently.
#[derive(Debug, Clone, Default)]
pub struct MetricsPipeline {
  calculator: MetricsCalculator,
}

impl MetricsPipeline {
  pub fn new(config: Config) -> Self {
    Self { calculator: MetricsCalculator::new(config) }
  }

  pub fn with_calculator(calculator: MetricsCalculator) -> Self {
    Self { calculator }
  }

  pub fn config(&self) -> &Config {
    self.calculator.config()
  }

  /// The timeframe is validated before anything is normalized or filtered
  pub fn run(&self, input: &RawInput, timeframe: Timeframe, as_of: NaiveDate) -> Result<Analysis> {
    let spec = timeframe.resolve(as_of)?;

    let statements: Vec<&StatementPayload> = input.statements.iter().collect();
    let normalized = normalize(&input.overview, &statements, input.time_series.as_ref())?;

    let periods =
      self.calculator.calculate(&normalized.overview, &normalized.reports, &normalized.prices)?;
    let filtered_periods = spec.filter_periods(&periods);
    let prices = spec.filter_prices(&normalized.prices);

    let symbol = input.symbol();
    info!(
      "{}: {} of {} periods and {} of {} prices in {}",
      symbol.as_deref().unwrap_or("<unknown>"),
      filtered_periods.len(),
      periods.len(),
      prices.len(),
      normalized.prices.len(),
      timeframe
    );

    Ok(Analysis {
      symbol,
      metric_table_version: METRIC_TABLE_VERSION,
      timeframe: spec,
      overview: normalized.overview,
      periods,
      filtered_periods,
      prices,
    })
  }
}
