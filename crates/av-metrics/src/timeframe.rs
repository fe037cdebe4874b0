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

//! Timeframe selection for the metrics table and the price series.
//!
//! A [`Timeframe`] is the caller's token; [`Timeframe::resolve`] validates it
//! and pins it to a calendar date, producing a [`TimeframeSpec`] that filters
//! both outputs the same way: a count of fiscal periods for the table and the
//! equivalent span of calendar years for prices.

use av_core::{Error, Result};
use av_models::{AnnualReport, PeriodMetrics, PriceSeries};
use chrono::{Datelike, Months, NaiveDate};
use serde::Serialize;
use std::str::FromStr;

/// Timeframe as requested by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timeframe {
  /// Only the current calendar year
  YearToDate,
  /// The most recent K periods
  Trailing(usize),
  /// User-supplied number of years
  Custom(usize),
  /// Everything available
  All,
}

/// A validated timeframe bound to a reference date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TimeframeSpec {
  LastPeriods(usize),
  CurrentYear(i32),
  LastYears(usize),
  All,
}

/// Anything that belongs to a single fiscal year
pub trait FiscalPeriod {
  fn fiscal_year(&self) -> i32;
}

impl FiscalPeriod for PeriodMetrics {
  fn fiscal_year(&self) -> i32 {
    self.fiscal_year
  }
}

impl FiscalPeriod for AnnualReport {
  fn fiscal_year(&self) -> i32 {
    self.fiscal_year
  }
}

impl Timeframe {
  /// Trailing window of `k` periods, `k >= 1`
  pub fn trailing(k: i64) -> Result<Self> {
    positive(k, "trailing window").map(Timeframe::Trailing)
  }

  /// Custom window of `years` years, `years >= 1`
  pub fn custom(years: i64) -> Result<Self> {
    positive(years, "custom length").map(Timeframe::Custom)
  }

  /// Validate and bind to `as_of`, the date that defines "current year"
  pub fn resolve(&self, as_of: NaiveDate) -> Result<TimeframeSpec> {
    match *self {
      Timeframe::YearToDate => Ok(TimeframeSpec::CurrentYear(as_of.year())),
      Timeframe::Trailing(0) | Timeframe::Custom(0) => {
        Err(Error::InvalidTimeframe(format!("{} has a zero-length window", self)))
      }
      Timeframe::Trailing(k) => Ok(TimeframeSpec::LastPeriods(k)),
      Timeframe::Custom(years) => Ok(TimeframeSpec::LastYears(years)),
      Timeframe::All => Ok(TimeframeSpec::All),
    }
  }
}

impl FromStr for Timeframe {
  type Err = Error;

  /// Accepts `ytd`, `all`/`max`, `<K>y` and `custom:<N>`, case-insensitive
  fn from_str(token: &str) -> Result<Self> {
    let normalized = token.trim().to_ascii_lowercase();

    match normalized.as_str() {
      "ytd" => return Ok(Timeframe::YearToDate),
      "all" | "max" => return Ok(Timeframe::All),
      _ => {}
    }

    if let Some(years) = normalized.strip_prefix("custom:") {
      return Timeframe::custom(parse_count(years, token)?);
    }

    if let Some(count) = normalized.strip_suffix('y') {
      return Timeframe::trailing(parse_count(count, token)?);
    }

    Err(Error::InvalidTimeframe(format!("unrecognized timeframe {:?}", token)))
  }
}

impl std::fmt::Display for Timeframe {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Timeframe::YearToDate => write!(f, "YTD"),
      Timeframe::Trailing(k) => write!(f, "{}Y", k),
      Timeframe::Custom(years) => write!(f, "custom:{}", years),
      Timeframe::All => write!(f, "All"),
    }
  }
}

impl TimeframeSpec {
  /// Number of periods retained from the front of a descending sequence
  pub fn period_limit(&self) -> Option<usize> {
    match self {
      TimeframeSpec::LastPeriods(k) | TimeframeSpec::LastYears(k) => Some(*k),
      TimeframeSpec::CurrentYear(_) | TimeframeSpec::All => None,
    }
  }

  /// Filter a descending (most recent first) sequence of fiscal periods.
  /// Windows longer than the history return the whole sequence.
  pub fn filter_periods<T>(&self, periods: &[T]) -> Vec<T>
  where
    T: FiscalPeriod + Clone,
  {
    if let TimeframeSpec::CurrentYear(year) = self {
      return periods.iter().filter(|p| p.fiscal_year() == *year).cloned().collect();
    }

    match self.period_limit() {
      Some(k) => periods[..k.min(periods.len())].to_vec(),
      None => periods.to_vec(),
    }
  }

  /// Filter prices by calendar span. Period windows become the same number of
  /// years, counted back from the latest observation.
  pub fn filter_prices(&self, series: &PriceSeries) -> PriceSeries {
    match self {
      TimeframeSpec::All => series.clone(),
      TimeframeSpec::CurrentYear(year) => series.in_year(*year),
      TimeframeSpec::LastPeriods(years) | TimeframeSpec::LastYears(years) => {
        match self.price_cutoff(series, *years) {
          Some(cutoff) => series.filtered(|p| p.timestamp.date() >= cutoff),
          None => series.clone(),
        }
      }
    }
  }

  /// First calendar date kept by a trailing window of `years`
  fn price_cutoff(&self, series: &PriceSeries, years: usize) -> Option<NaiveDate> {
    let latest = series.latest()?.timestamp.date();
    let months = u32::try_from(years).ok()?.checked_mul(12)?;
    latest.checked_sub_months(Months::new(months))
  }
}

fn parse_count(text: &str, token: &str) -> Result<i64> {
  text
    .trim()
    .parse::<i64>()
    .map_err(|_| Error::InvalidTimeframe(format!("unrecognized timeframe {:?}", token)))
}

fn positive(value: i64, what: &str) -> Result<usize> {
  if value < 1 {
    return Err(Error::InvalidTimeframe(format!("{} must be at least 1, got {}", what, value)));
  }
  usize::try_from(value).map_err(|_| Error::InvalidTimeframe(format!("{} is too large", what)))
}
