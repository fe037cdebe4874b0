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

//! Ratio, growth and momentum derivation.
//!
//! Every metric is one entry in [`METRIC_DEFINITIONS`]: an id, the unit that
//! decides how it is scaled and rounded, and a [`Formula`] over the overview
//! snapshot, the current and prior annual report, and the price series.
//! Adding a metric means adding an entry, not a new branch.
//!
//! Overview-derived values (P/E, P/B, EV/EBITDA, ROE, ROA, dividend) and price
//! momentum are current snapshots. The same value is attached to every period's
//! row; only revenue, net income, growth and the statement ratios vary by year.

use av_core::{Config, Error, MAX_PRECISION, Result};
use av_models::{
  Absence, AnnualReport, CompanyOverview, MetricId, MetricValue, OverviewField, PeriodMetrics,
  PriceSeries, ReportField,
};
use std::borrow::Cow;
use tracing::{debug, warn};

/// Bumped whenever a formula in [`METRIC_DEFINITIONS`] changes meaning
pub const METRIC_TABLE_VERSION: u32 = 1;

/// How a raw result is scaled and rounded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricUnit {
  /// Plain ratio, rounded to `ratio_precision`
  Ratio,
  /// Fraction shown as a percentage: x100, rounded to `percent_precision`
  Percent,
  /// Fractional yield, rounded to `yield_precision`
  Yield,
  /// Currency amount, left unrounded
  Amount,
}

impl MetricUnit {
  /// Scale and round a raw value; the single place rounding happens
  pub fn finish(&self, raw: f64, config: &Config) -> f64 {
    match self {
      MetricUnit::Ratio => round_to(raw, config.ratio_precision),
      MetricUnit::Percent => round_to(raw * 100.0, config.percent_precision),
      MetricUnit::Yield => round_to(raw, config.yield_precision),
      MetricUnit::Amount => raw,
    }
  }
}

/// A value a formula reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
  Overview(OverviewField),
  Report(ReportField),
  /// `minuend - subtrahend`, both from the current report
  Difference(ReportField, ReportField),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formula {
  Value(Operand),
  Quotient(Operand, Operand),
  /// `(current - prior) / prior` of a report field
  Growth(ReportField),
  /// Close-to-close change over `Config::momentum_lookback` observations
  Momentum,
}

/// Inputs a metric needs, listed for documentation and diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricInput {
  Overview(OverviewField),
  Report(ReportField),
  PriorReport(ReportField),
  Closes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricDefinition {
  pub id: MetricId,
  pub unit: MetricUnit,
  pub formula: Formula,
}

impl MetricDefinition {
  pub fn required_inputs(&self) -> Vec<MetricInput> {
    fn operand_inputs(operand: Operand, out: &mut Vec<MetricInput>) {
      match operand {
        Operand::Overview(field) => out.push(MetricInput::Overview(field)),
        Operand::Report(field) => out.push(MetricInput::Report(field)),
        Operand::Difference(a, b) => {
          out.push(MetricInput::Report(a));
          out.push(MetricInput::Report(b));
        }
      }
    }

    let mut inputs = Vec::new();
    match self.formula {
      Formula::Value(operand) => operand_inputs(operand, &mut inputs),
      Formula::Quotient(numerator, denominator) => {
        operand_inputs(numerator, &mut inputs);
        operand_inputs(denominator, &mut inputs);
      }
      Formula::Growth(field) => {
        inputs.push(MetricInput::Report(field));
        inputs.push(MetricInput::PriorReport(field));
      }
      Formula::Momentum => inputs.push(MetricInput::Closes),
    }
    inputs
  }

  /// True when the value comes from a current snapshot rather than a fiscal period
  pub fn is_snapshot(&self) -> bool {
    self.required_inputs().iter().all(|input| matches!(input, MetricInput::Overview(_) | MetricInput::Closes))
  }
}

const FREE_CASH_FLOW: Operand =
  Operand::Difference(ReportField::OperatingCashflow, ReportField::CapitalExpenditures);

/// The metric-definition table, in output order
pub const METRIC_DEFINITIONS: &[MetricDefinition] = &[
  // Valuation
  MetricDefinition {
    id: MetricId::PeRatio,
    unit: MetricUnit::Ratio,
    formula: Formula::Value(Operand::Overview(OverviewField::PeRatio)),
  },
  MetricDefinition {
    id: MetricId::PbRatio,
    unit: MetricUnit::Ratio,
    formula: Formula::Value(Operand::Overview(OverviewField::PriceToBookRatio)),
  },
  MetricDefinition {
    id: MetricId::EvToEbitda,
    unit: MetricUnit::Ratio,
    formula: Formula::Value(Operand::Overview(OverviewField::EvToEbitda)),
  },
  // Profitability
  MetricDefinition {
    id: MetricId::ReturnOnEquity,
    unit: MetricUnit::Percent,
    formula: Formula::Value(Operand::Overview(OverviewField::ReturnOnEquityTtm)),
  },
  MetricDefinition {
    id: MetricId::ReturnOnAssets,
    unit: MetricUnit::Percent,
    formula: Formula::Value(Operand::Overview(OverviewField::ReturnOnAssetsTtm)),
  },
  MetricDefinition {
    id: MetricId::DividendPerShare,
    unit: MetricUnit::Ratio,
    formula: Formula::Value(Operand::Overview(OverviewField::DividendPerShareTtm)),
  },
  // Growth
  MetricDefinition {
    id: MetricId::RevenueGrowth,
    unit: MetricUnit::Percent,
    formula: Formula::Growth(ReportField::TotalRevenue),
  },
  MetricDefinition {
    id: MetricId::NetIncomeGrowth,
    unit: MetricUnit::Percent,
    formula: Formula::Growth(ReportField::NetIncome),
  },
  // Quality
  MetricDefinition {
    id: MetricId::DebtToEquity,
    unit: MetricUnit::Ratio,
    formula: Formula::Quotient(
      Operand::Report(ReportField::TotalLiabilities),
      Operand::Report(ReportField::TotalShareholderEquity),
    ),
  },
  MetricDefinition { id: MetricId::FreeCashFlow, unit: MetricUnit::Amount, formula: Formula::Value(FREE_CASH_FLOW) },
  MetricDefinition {
    id: MetricId::FreeCashFlowYield,
    unit: MetricUnit::Yield,
    formula: Formula::Quotient(FREE_CASH_FLOW, Operand::Overview(OverviewField::MarketCapitalization)),
  },
  MetricDefinition {
    id: MetricId::AssetTurnover,
    unit: MetricUnit::Ratio,
    formula: Formula::Quotient(
      Operand::Report(ReportField::TotalRevenue),
      Operand::Report(ReportField::TotalAssets),
    ),
  },
  // Momentum
  MetricDefinition { id: MetricId::Momentum, unit: MetricUnit::Percent, formula: Formula::Momentum },
];

/// What a formula can see while computing one row
struct PeriodContext<'a> {
  overview: &'a CompanyOverview,
  current: &'a AnnualReport,
  prior: Option<&'a AnnualReport>,
  prices: &'a PriceSeries,
  momentum_lookback: usize,
}

impl PeriodContext<'_> {
  fn operand(&self, operand: Operand) -> MetricValue {
    match operand {
      Operand::Overview(field) => MetricValue::from_option(self.overview.get(field)),
      Operand::Report(field) => MetricValue::from_option(self.current.get(field)),
      Operand::Difference(a, b) => match (self.current.get(a), self.current.get(b)) {
        (Some(a), Some(b)) => MetricValue::from_f64(a - b),
        _ => MetricValue::Absent(Absence::MissingInput),
      },
    }
  }

  fn evaluate(&self, formula: Formula) -> MetricValue {
    match formula {
      Formula::Value(operand) => self.operand(operand),
      Formula::Quotient(numerator, denominator) => {
        divide(self.operand(numerator), self.operand(denominator))
      }
      Formula::Growth(field) => {
        let Some(prior) = self.prior else {
          return MetricValue::Absent(Absence::InsufficientHistory);
        };
        let current = MetricValue::from_option(self.current.get(field));
        let previous = MetricValue::from_option(prior.get(field));
        match (current, previous) {
          (MetricValue::Value(cur), MetricValue::Value(prev)) => {
            divide(MetricValue::Value(cur - prev), MetricValue::Value(prev))
          }
          _ => MetricValue::Absent(Absence::MissingInput),
        }
      }
      Formula::Momentum => momentum(self.prices, self.momentum_lookback),
    }
  }
}

/// `numerator / denominator`, absent on a missing operand or a zero denominator
pub fn divide(numerator: MetricValue, denominator: MetricValue) -> MetricValue {
  match (numerator, denominator) {
    (MetricValue::Absent(reason), _) | (_, MetricValue::Absent(reason)) => MetricValue::Absent(reason),
    (_, MetricValue::Value(d)) if d == 0.0 => MetricValue::Absent(Absence::ZeroDenominator),
    (MetricValue::Value(n), MetricValue::Value(d)) => MetricValue::from_f64(n / d),
  }
}

/// Fractional change between the latest close and the close `lookback`
/// observations earlier; needs at least `lookback + 1` observations
pub fn momentum(prices: &PriceSeries, lookback: usize) -> MetricValue {
  let closes: Vec<f64> = prices.closes().collect();
  if lookback == 0 || closes.len() < lookback + 1 {
    return MetricValue::Absent(Absence::InsufficientHistory);
  }
  let latest = closes[closes.len() - 1];
  let base = closes[closes.len() - 1 - lookback];
  divide(MetricValue::Value(latest - base), MetricValue::Value(base))
}

/// Round half away from zero to `places` decimals, at most `MAX_PRECISION`
pub fn round_to(value: f64, places: u32) -> f64 {
  let factor = 10f64.powi(places.min(MAX_PRECISION) as i32);
  (value * factor).round() / factor
}

/// Derives the [`PeriodMetrics`] table from normalized records
#[derive(Debug, Clone)]
pub struct MetricsCalculator {
  config: Config,
  definitions: &'static [MetricDefinition],
}

impl MetricsCalculator {
  pub fn new(config: Config) -> Self {
    Self { config, definitions: METRIC_DEFINITIONS }
  }

  /// Use a different definition table (subset, reordered, ...)
  pub fn with_definitions(mut self, definitions: &'static [MetricDefinition]) -> Self {
    self.definitions = definitions;
    self
  }

  pub fn config(&self) -> &Config {
    &self.config
  }

  pub fn definitions(&self) -> &[MetricDefinition] {
    self.definitions
  }

  /// One row per annual report, most recent first.
  ///
  /// Fails only when there are no reports at all; every other shortfall is an
  /// absent cell.
  pub fn calculate(
    &self,
    overview: &CompanyOverview,
    reports: &[AnnualReport],
    prices: &PriceSeries,
  ) -> Result<Vec<PeriodMetrics>> {
    if reports.is_empty() {
      return Err(Error::InsufficientData {
        metric: "annual reports".to_string(),
        required: 1,
        available: 0,
      });
    }

    let reports = descending(reports);

    if reports.len() < 2 {
      debug!(
        "{}",
        Error::InsufficientData { metric: "growth".to_string(), required: 2, available: reports.len() }
      );
    }
    if prices.len() < self.config.momentum_lookback + 1 {
      debug!(
        "{}",
        Error::InsufficientData {
          metric: "momentum".to_string(),
          required: self.config.momentum_lookback + 1,
          available: prices.len(),
        }
      );
    }

    let rows = reports
      .iter()
      .enumerate()
      .map(|(i, current)| {
        let context = PeriodContext {
          overview,
          current,
          prior: reports.get(i + 1),
          prices,
          momentum_lookback: self.config.momentum_lookback,
        };
        self.period_row(&context)
      })
      .collect();

    Ok(rows)
  }

  fn period_row(&self, context: &PeriodContext<'_>) -> PeriodMetrics {
    let current = context.current;
    let mut row =
      PeriodMetrics::new(current.fiscal_year, current.total_revenue, current.net_income);

    for definition in self.definitions {
      let value = context.evaluate(definition.formula).map(|raw| definition.unit.finish(raw, &self.config));
      row.metrics.insert(definition.id, value);
    }

    row
  }
}

impl Default for MetricsCalculator {
  fn default() -> Self {
    Self::new(Config::default())
  }
}

fn descending(reports: &[AnnualReport]) -> Cow<'_, [AnnualReport]> {
  if reports.windows(2).all(|w| w[0].fiscal_year > w[1].fiscal_year) {
    Cow::Borrowed(reports)
  } else {
    warn!("Annual reports passed to the calculator out of order, sorting descending");
    let mut sorted = reports.to_vec();
    sorted.sort_by(|a, b| b.fiscal_year.cmp(&a.fiscal_year));
    sorted.dedup_by_key(|r| r.fiscal_year);
    Cow::Owned(sorted)
  }
}
