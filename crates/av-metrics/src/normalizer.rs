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

//! Raw payload normalization.
//!
//! Turns the loosely typed overview, statement and time-series payloads into
//! [`CompanyOverview`], a descending [`AnnualReport`] sequence and an ascending
//! [`PriceSeries`]. A field that fails coercion becomes absent; it never turns
//! into zero and never discards the record it belongs to. Only a payload with
//! no data at all is an error.

use av_core::{Error, Result};
use av_models::{
  AnnualReport, CompanyOverview, OverviewField, OverviewPayload, PricePoint, PriceSeries,
  ReportField, StatementPayload, TimeSeriesPayload, decode_row, raw_text,
};
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Strings the API uses in place of a number
const ABSENT_SENTINELS: [&str; 5] = ["", "None", "none", "-", "N/A"];

/// Everything the calculator needs, normalized
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedInput {
  pub overview: CompanyOverview,
  pub reports: Vec<AnnualReport>,
  pub prices: PriceSeries,
}

/// Normalize all three payloads. The first statement is the primary one
/// (income statement); the rest only fill in fields for the years it defines.
pub fn normalize(
  overview: &OverviewPayload,
  statements: &[&StatementPayload],
  time_series: Option<&TimeSeriesPayload>,
) -> Result<NormalizedInput> {
  let overview = normalize_overview(overview)?;
  let reports = normalize_reports(statements)?;
  let prices = time_series.map(normalize_prices).unwrap_or_default();

  debug!(
    "Normalized {} annual reports and {} price points for {}",
    reports.len(),
    prices.len(),
    overview.symbol.as_deref().unwrap_or("<unknown>")
  );

  Ok(NormalizedInput { overview, reports, prices })
}

/// Coerce a raw JSON scalar into a finite number.
///
/// Missing keys, JSON `null` and the API's placeholder strings are absent.
/// Anything else that does not parse is logged as malformed and also absent.
pub fn coerce_number(field: &str, value: Option<&Value>) -> Option<f64> {
  let value = value?;

  let parsed = match value {
    Value::Null => return None,
    Value::Number(n) => n.as_f64(),
    Value::String(s) => {
      let trimmed = s.trim();
      if ABSENT_SENTINELS.contains(&trimmed) {
        return None;
      }
      trimmed.parse::<f64>().ok()
    }
    _ => None,
  };

  match parsed {
    Some(v) if v.is_finite() => Some(v),
    _ => {
      let err = Error::MalformedField { field: field.to_string(), value: raw_text(value) };
      debug!("{}; treating as absent", err);
      None
    }
  }
}

/// Extract the fiscal year (first four characters) and, when possible, the full date
pub fn parse_fiscal_date(raw: &str) -> Option<(i32, Option<NaiveDate>)> {
  let raw = raw.trim();
  let year_text = raw.get(..4)?;
  if !year_text.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }
  let year = year_text.parse().ok()?;
  let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok();
  Some((year, date))
}

/// Parse a series key as `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DD` (stored at midnight)
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
  let raw = raw.trim();
  NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
    .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M"))
    .ok()
    .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?.and_hms_opt(0, 0, 0))
}

pub fn normalize_overview(payload: &OverviewPayload) -> Result<CompanyOverview> {
  if !payload.has_data() {
    let reason = payload.notices().message().unwrap_or("overview payload is empty").to_string();
    return Err(Error::MissingData(format!("overview: {}", reason)));
  }

  let overview = OverviewField::ALL.iter().fold(
    CompanyOverview { symbol: payload.symbol().map(str::to_string), ..Default::default() },
    |overview, field| {
      let value = coerce_number(field.api_name(), payload.fields.get(field.api_name()));
      overview.with(*field, value)
    },
  );

  Ok(overview)
}

/// Merge the statements' annual reports into one report per fiscal year, most recent first
pub fn normalize_reports(statements: &[&StatementPayload]) -> Result<Vec<AnnualReport>> {
  let primary = statements
    .first()
    .ok_or_else(|| Error::MissingData("annual reports: no statement supplied".to_string()))?;

  if primary.annual_reports.is_empty() {
    let reason = primary.notices.message().unwrap_or("annualReports is empty").to_string();
    return Err(Error::MissingData(format!("annual reports: {}", reason)));
  }

  let mut reports: Vec<AnnualReport> = Vec::with_capacity(primary.annual_reports.len());
  let mut by_year: BTreeMap<i32, usize> = BTreeMap::new();

  for (position, statement) in statements.iter().enumerate() {
    if let Some(notice) = statement.notices.message() {
      warn!("Statement {} carried a provider notice: {}", position, notice);
    }

    for raw in &statement.annual_reports {
      let date_text = raw.get("fiscalDateEnding").and_then(Value::as_str).unwrap_or_default();
      let Some((year, date)) = parse_fiscal_date(date_text) else {
        warn!("Skipping annual report with unusable fiscalDateEnding {:?}", date_text);
        continue;
      };

      let index = match by_year.get(&year) {
        Some(index) => *index,
        None if position == 0 => {
          reports.push(AnnualReport::new(year, date));
          by_year.insert(year, reports.len() - 1);
          reports.len() - 1
        }
        None => {
          debug!("Statement {} has fiscal year {} with no primary report, ignoring", position, year);
          continue;
        }
      };

      let report = &mut reports[index];
      for field in ReportField::ALL {
        if raw.contains_key(field.api_name()) {
          report.fill(field, coerce_number(field.api_name(), raw.get(field.api_name())));
        }
      }
    }
  }

  if reports.is_empty() {
    return Err(Error::MissingData(
      "annual reports: no report carried a parsable fiscal year".to_string(),
    ));
  }

  if !is_descending(&reports) {
    debug!("Annual reports not in descending fiscal-year order, re-sorting");
    reports.sort_by(|a, b| b.fiscal_year.cmp(&a.fiscal_year));
  }

  Ok(reports)
}

/// Normalize a time series into an ascending, de-duplicated series.
/// Rows without a usable timestamp or close price are dropped individually.
pub fn normalize_prices(payload: &TimeSeriesPayload) -> PriceSeries {
  let Some((granularity, rows)) = payload.series_entries() else {
    warn!(
      "Time series payload has no recognizable series: {}",
      payload.notices.message().unwrap_or("no namespaced series key")
    );
    return PriceSeries::empty();
  };

  let mut dropped = 0usize;
  let points: Vec<PricePoint> = rows
    .iter()
    .filter_map(|(key, row)| {
      let point = price_point(key, row);
      if point.is_none() {
        dropped += 1;
      }
      point
    })
    .collect();

  if dropped > 0 {
    warn!("Dropped {} malformed rows from {} series", dropped, granularity);
  }

  PriceSeries::new(Some(granularity), points)
}

fn price_point(key: &str, row: &Value) -> Option<PricePoint> {
  let timestamp = parse_timestamp(key).or_else(|| {
    debug!("Unparsable series timestamp {:?}", key);
    None
  })?;
  let ohlcv = decode_row(row)?;
  let close = coerce_number("4. close", ohlcv.close.as_ref())?;

  Some(PricePoint {
    timestamp,
    open: coerce_number("1. open", ohlcv.open.as_ref()),
    high: coerce_number("2. high", ohlcv.high.as_ref()),
    low: coerce_number("3. low", ohlcv.low.as_ref()),
    close,
    volume: coerce_number("5. volume", ohlcv.volume.as_ref()),
  })
}

fn is_descending(reports: &[AnnualReport]) -> bool {
  reports.windows(2).all(|w| w[0].fiscal_year > w[1].fiscal_year)
}

#[cfg(test)]
mod tests {
  use super::*;
  use av_core::types::{Granularity, Interval};
  use serde_json::json;

  fn statement(value: Value) -> StatementPayload {
    serde_json::from_value(value).unwrap()
  }

  #[test]
  fn test_coerce_number_variants() {
    assert_eq!(coerce_number("f", Some(&json!("15.2"))), Some(15.2));
    assert_eq!(coerce_number("f", Some(&json!(" 42 "))), Some(42.0));
    assert_eq!(coerce_number("f", Some(&json!(7))), Some(7.0));
    assert_eq!(coerce_number("f", Some(&json!("None"))), None);
    assert_eq!(coerce_number("f", Some(&json!("-"))), None);
    assert_eq!(coerce_number("f", Some(&json!(""))), None);
    assert_eq!(coerce_number("f", Some(&json!("abc"))), None);
    assert_eq!(coerce_number("f", Some(&json!("inf"))), None);
    assert_eq!(coerce_number("f", Some(&json!(["1"]))), None);
    assert_eq!(coerce_number("f", Some(&Value::Null)), None);
    assert_eq!(coerce_number("f", None), None);
  }

  #[test]
  fn test_zero_stays_zero() {
    assert_eq!(coerce_number("f", Some(&json!("0"))), Some(0.0));
  }

  #[test]
  fn test_parse_fiscal_date() {
    assert_eq!(
      parse_fiscal_date("2024-12-31"),
      Some((2024, NaiveDate::from_ymd_opt(2024, 12, 31)))
    );
    assert_eq!(parse_fiscal_date("2023"), Some((2023, None)));
    assert_eq!(parse_fiscal_date("FY23"), None);
    assert_eq!(parse_fiscal_date(""), None);
  }

  #[test]
  fn test_parse_timestamp() {
    let daily = parse_timestamp("2024-06-03").unwrap();
    assert_eq!(daily.to_string(), "2024-06-03 00:00:00");
    let intraday = parse_timestamp("2024-06-03 15:55:00").unwrap();
    assert_eq!(intraday.to_string(), "2024-06-03 15:55:00");
    assert!(parse_timestamp("06/03/2024").is_none());
  }

  #[test]
  fn test_overview_malformed_field_is_absent() {
    let payload: OverviewPayload = serde_json::from_value(json!({
      "Symbol": "IBM",
      "PERatio": "15.2",
      "PriceToBookRatio": "not-a-number",
      "MarketCapitalization": "2000000000"
    }))
    .unwrap();

    let overview = normalize_overview(&payload).unwrap();
    assert_eq!(overview.symbol.as_deref(), Some("IBM"));
    assert_eq!(overview.pe_ratio, Some(15.2));
    assert_eq!(overview.price_to_book_ratio, None);
    assert_eq!(overview.market_capitalization, Some(2.0e9));
    assert_eq!(overview.ev_to_ebitda, None);
  }

  #[test]
  fn test_empty_overview_is_missing_data() {
    let err = normalize_overview(&OverviewPayload::default()).unwrap_err();
    assert!(matches!(err, Error::MissingData(_)));

    let throttled: OverviewPayload =
      serde_json::from_value(json!({"Note": "API call frequency exceeded"})).unwrap();
    let err = normalize_overview(&throttled).unwrap_err();
    assert!(err.to_string().contains("API call frequency exceeded"));
  }

  #[test]
  fn test_reports_missing() {
    assert!(matches!(normalize_reports(&[]).unwrap_err(), Error::MissingData(_)));

    let empty = statement(json!({"symbol": "IBM", "annualReports": []}));
    assert!(matches!(normalize_reports(&[&empty]).unwrap_err(), Error::MissingData(_)));

    let undated = statement(json!({"annualReports": [{"totalRevenue": "10"}]}));
    assert!(matches!(normalize_reports(&[&undated]).unwrap_err(), Error::MissingData(_)));
  }

  #[test]
  fn test_reports_resorted_descending() {
    let income = statement(json!({"annualReports": [
      {"fiscalDateEnding": "2022-12-31", "totalRevenue": "600"},
      {"fiscalDateEnding": "2024-12-31", "totalRevenue": "1000"},
      {"fiscalDateEnding": "2023-12-31", "totalRevenue": "800"}
    ]}));

    let reports = normalize_reports(&[&income]).unwrap();
    let years: Vec<i32> = reports.iter().map(|r| r.fiscal_year).collect();
    assert_eq!(years, vec![2024, 2023, 2022]);
    assert_eq!(reports[0].total_revenue, Some(1000.0));
  }

  #[test]
  fn test_reports_merge_statements_by_year() {
    let income = statement(json!({"annualReports": [
      {"fiscalDateEnding": "2024-12-31", "totalRevenue": "1000", "netIncome": "100"},
      {"fiscalDateEnding": "2023-12-31", "totalRevenue": "800", "netIncome": "None"}
    ]}));
    let balance = statement(json!({"annualReports": [
      {"fiscalDateEnding": "2023-12-31", "totalAssets": "4000", "totalLiabilities": "1500", "totalShareholderEquity": "2500"},
      {"fiscalDateEnding": "2024-12-31", "totalAssets": "5000", "totalLiabilities": "2000", "totalShareholderEquity": "3000"},
      {"fiscalDateEnding": "2019-12-31", "totalAssets": "1"}
    ]}));
    let cash_flow = statement(json!({"annualReports": [
      {"fiscalDateEnding": "2024-12-31", "operatingCashflow": "300", "capitalExpenditures": "50", "netIncome": "123"}
    ]}));

    let reports = normalize_reports(&[&income, &balance, &cash_flow]).unwrap();
    assert_eq!(reports.len(), 2);

    let latest = &reports[0];
    assert_eq!(latest.fiscal_year, 2024);
    assert_eq!(latest.total_assets, Some(5000.0));
    assert_eq!(latest.operating_cashflow, Some(300.0));
    // income statement supplies net income first
    assert_eq!(latest.net_income, Some(100.0));

    let prior = &reports[1];
    assert_eq!(prior.total_shareholder_equity, Some(2500.0));
    assert_eq!(prior.net_income, None);
    assert_eq!(prior.operating_cashflow, None);
  }

  #[test]
  fn test_prices_sorted_and_malformed_rows_dropped() {
    let payload: TimeSeriesPayload = serde_json::from_value(json!({
      "Meta Data": {"2. Symbol": "IBM"},
      "Time Series (Daily)": {
        "2024-06-03": {"1. open": "1", "4. close": "103"},
        "2024-05-31": {"4. close": "101"},
        "2024-06-01": {"1. open": "5"},
        "2024-06-02": {"4. close": "None"},
        "not a date": {"4. close": "1"},
        "2024-05-30": {"4. close": "100", "5. volume": "12"}
      }
    }))
    .unwrap();

    let series = normalize_prices(&payload);
    assert_eq!(series.granularity, Some(Granularity::Daily));
    assert_eq!(series.closes().collect::<Vec<_>>(), vec![100.0, 101.0, 103.0]);
    assert_eq!(series.earliest().unwrap().volume, Some(12.0));
    assert_eq!(series.latest().unwrap().open, Some(1.0));
  }

  #[test]
  fn test_intraday_series_collapses_duplicate_timestamps() {
    let payload: TimeSeriesPayload = serde_json::from_value(json!({
      "Time Series (5min)": {
        "2024-06-03 09:35:00": {"4. close": "2"},
        "2024-06-03 09:35": {"4. close": "3"},
        "2024-06-03 09:30:00": {"4. close": "1"}
      }
    }))
    .unwrap();

    let series = normalize_prices(&payload);
    assert_eq!(series.granularity, Some(Granularity::Intraday(Interval::Min5)));
    assert_eq!(series.len(), 2);
    let ts: Vec<_> = series.points().iter().map(|p| p.timestamp).collect();
    assert!(ts.windows(2).all(|w| w[0] < w[1]));
    // the row listed first in the payload wins
    assert_eq!(series.closes().collect::<Vec<_>>(), vec![1.0, 2.0]);
  }

  #[test]
  fn test_duplicate_timestamp_keeps_payload_order() {
    let payload: TimeSeriesPayload = serde_json::from_str(
      r#"{"Time Series (5min)": {
        "2024-06-03 09:35": {"4. close": "3"},
        "2024-06-03 09:35:00": {"4. close": "2"}
      }}"#,
    )
    .unwrap();

    assert_eq!(normalize_prices(&payload).closes().collect::<Vec<_>>(), vec![3.0]);
  }

  #[test]
  fn test_series_without_data_is_empty() {
    let payload: TimeSeriesPayload =
      serde_json::from_value(json!({"Information": "premium endpoint"})).unwrap();
    assert!(normalize_prices(&payload).is_empty());
  }

  #[test]
  fn test_normalize_without_time_series() {
    let overview: OverviewPayload = serde_json::from_value(json!({"PERatio": "10"})).unwrap();
    let income = statement(json!({"annualReports": [{"fiscalDateEnding": "2024-12-31"}]}));

    let input = normalize(&overview, &[&income], None).unwrap();
    assert!(input.prices.is_empty());
    assert_eq!(input.reports.len(), 1);
    assert_eq!(input.overview.pe_ratio, Some(10.0));
  }
}
