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

//! Derived per-period metrics

use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Every metric the calculator can derive, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum MetricId {
  #[serde(rename = "P/E Ratio")]
  PeRatio,
  #[serde(rename = "P/B Ratio")]
  PbRatio,
  #[serde(rename = "EV/EBITDA")]
  EvToEbitda,
  #[serde(rename = "ROE")]
  ReturnOnEquity,
  #[serde(rename = "ROA")]
  ReturnOnAssets,
  #[serde(rename = "Dividend Per Share")]
  DividendPerShare,
  #[serde(rename = "Revenue Growth")]
  RevenueGrowth,
  #[serde(rename = "Net Income Growth")]
  NetIncomeGrowth,
  #[serde(rename = "Debt-to-Equity")]
  DebtToEquity,
  #[serde(rename = "Free Cash Flow")]
  FreeCashFlow,
  #[serde(rename = "Free Cash Flow Yield")]
  FreeCashFlowYield,
  #[serde(rename = "Asset Turnover")]
  AssetTurnover,
  #[serde(rename = "Momentum")]
  Momentum,
}

impl MetricId {
  pub fn label(&self) -> &'static str {
    match self {
      MetricId::PeRatio => "P/E Ratio",
      MetricId::PbRatio => "P/B Ratio",
      MetricId::EvToEbitda => "EV/EBITDA",
      MetricId::ReturnOnEquity => "ROE",
      MetricId::ReturnOnAssets => "ROA",
      MetricId::DividendPerShare => "Dividend Per Share",
      MetricId::RevenueGrowth => "Revenue Growth",
      MetricId::NetIncomeGrowth => "Net Income Growth",
      MetricId::DebtToEquity => "Debt-to-Equity",
      MetricId::FreeCashFlow => "Free Cash Flow",
      MetricId::FreeCashFlowYield => "Free Cash Flow Yield",
      MetricId::AssetTurnover => "Asset Turnover",
      MetricId::Momentum => "Momentum",
    }
  }
}

impl std::fmt::Display for MetricId {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.label())
  }
}

/// Why a cell carries no value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Absence {
  /// An input was missing or failed coercion
  MissingInput,
  /// The denominator was exactly zero
  ZeroDenominator,
  /// Not enough periods or observations (first year has no prior, short price window)
  InsufficientHistory,
}

/// A derived cell: a finite number or an explicit absent marker, never a silent zero
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
  Value(f64),
  Absent(Absence),
}

impl MetricValue {
  /// Wrap a computed number, turning NaN/inf into an absent cell
  pub fn from_f64(value: f64) -> Self {
    if value.is_finite() { MetricValue::Value(value) } else { MetricValue::Absent(Absence::MissingInput) }
  }

  /// Wrap an optional input
  pub fn from_option(value: Option<f64>) -> Self {
    value.map_or(MetricValue::Absent(Absence::MissingInput), MetricValue::from_f64)
  }

  pub fn value(&self) -> Option<f64> {
    match self {
      MetricValue::Value(v) => Some(*v),
      MetricValue::Absent(_) => None,
    }
  }

  pub fn is_absent(&self) -> bool {
    matches!(self, MetricValue::Absent(_))
  }

  pub fn absence(&self) -> Option<Absence> {
    match self {
      MetricValue::Value(_) => None,
      MetricValue::Absent(reason) => Some(*reason),
    }
  }

  pub fn map<F>(self, f: F) -> Self
  where
    F: FnOnce(f64) -> f64,
  {
    match self {
      MetricValue::Value(v) => MetricValue::from_f64(f(v)),
      absent => absent,
    }
  }
}

impl Serialize for MetricValue {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self {
      MetricValue::Value(v) => serializer.serialize_f64(*v),
      MetricValue::Absent(_) => serializer.serialize_none(),
    }
  }
}

/// One output row per fiscal year
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodMetrics {
  #[serde(rename = "Year")]
  pub year: String,

  #[serde(skip)]
  pub fiscal_year: i32,

  #[serde(rename = "Revenue")]
  pub revenue: Option<f64>,

  #[serde(rename = "Net Income")]
  pub net_income: Option<f64>,

  #[serde(flatten)]
  pub metrics: BTreeMap<MetricId, MetricValue>,
}

impl PeriodMetrics {
  pub fn new(fiscal_year: i32, revenue: Option<f64>, net_income: Option<f64>) -> Self {
    PeriodMetrics {
      year: fiscal_year.to_string(),
      fiscal_year,
      revenue,
      net_income,
      metrics: BTreeMap::new(),
    }
  }

  /// Value of a metric; metrics never computed read as missing input
  pub fn get(&self, id: MetricId) -> MetricValue {
    self.metrics.get(&id).copied().unwrap_or(MetricValue::Absent(Absence::MissingInput))
  }

  /// Shorthand for `get(id).value()`
  pub fn value(&self, id: MetricId) -> Option<f64> {
    self.get(id).value()
  }
}
