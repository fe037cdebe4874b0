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

//! Fundamental data: raw overview/statement payloads and the typed records
//! the normalizer produces from them.

use crate::common::{ProviderNotices, RawFields};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// OVERVIEW response. The endpoint returns a flat object of numeric strings,
/// so it is kept as a field map and coerced field by field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverviewPayload {
  #[serde(flatten)]
  pub fields: RawFields,
}

impl OverviewPayload {
  pub fn notices(&self) -> ProviderNotices {
    ProviderNotices::from_fields(&self.fields)
  }

  /// True when the payload carries nothing besides provider notices
  pub fn has_data(&self) -> bool {
    self.fields.keys().any(|k| !ProviderNotices::KEYS.contains(&k.as_str()))
  }

  pub fn symbol(&self) -> Option<&str> {
    self.fields.get("Symbol").and_then(|v| v.as_str())
  }
}

/// INCOME_STATEMENT, BALANCE_SHEET and CASH_FLOW responses share this shape
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementPayload {
  #[serde(default)]
  pub symbol: Option<String>,

  #[serde(rename = "annualReports", default)]
  pub annual_reports: Vec<RawFields>,

  #[serde(rename = "quarterlyReports", default)]
  pub quarterly_reports: Vec<RawFields>,

  #[serde(flatten)]
  pub notices: ProviderNotices,
}

/// Overview fields the metrics pipeline reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OverviewField {
  PeRatio,
  PriceToBookRatio,
  EvToEbitda,
  ReturnOnEquityTtm,
  ReturnOnAssetsTtm,
  MarketCapitalization,
  DebtToEquity,
  FreeCashflowTtm,
  DividendPerShareTtm,
}

impl OverviewField {
  pub const ALL: [OverviewField; 9] = [
    OverviewField::PeRatio,
    OverviewField::PriceToBookRatio,
    OverviewField::EvToEbitda,
    OverviewField::ReturnOnEquityTtm,
    OverviewField::ReturnOnAssetsTtm,
    OverviewField::MarketCapitalization,
    OverviewField::DebtToEquity,
    OverviewField::FreeCashflowTtm,
    OverviewField::DividendPerShareTtm,
  ];

  /// Key used by the OVERVIEW endpoint
  pub fn api_name(&self) -> &'static str {
    match self {
      OverviewField::PeRatio => "PERatio",
      OverviewField::PriceToBookRatio => "PriceToBookRatio",
      OverviewField::EvToEbitda => "EVToEBITDA",
      OverviewField::ReturnOnEquityTtm => "ReturnOnEquityTTM",
      OverviewField::ReturnOnAssetsTtm => "ReturnOnAssetsTTM",
      OverviewField::MarketCapitalization => "MarketCapitalization",
      OverviewField::DebtToEquity => "DebtToEquity",
      OverviewField::FreeCashflowTtm => "FreeCashflowTTM",
      OverviewField::DividendPerShareTtm => "DividendPerShareTTM",
    }
  }
}

/// Immutable snapshot of the overview values; `None` means absent or malformed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyOverview {
  pub symbol: Option<String>,
  pub pe_ratio: Option<f64>,
  pub price_to_book_ratio: Option<f64>,
  pub ev_to_ebitda: Option<f64>,
  pub return_on_equity_ttm: Option<f64>,
  pub return_on_assets_ttm: Option<f64>,
  pub market_capitalization: Option<f64>,
  pub debt_to_equity: Option<f64>,
  pub free_cashflow_ttm: Option<f64>,
  pub dividend_per_share_ttm: Option<f64>,
}

impl CompanyOverview {
  pub fn get(&self, field: OverviewField) -> Option<f64> {
    match field {
      OverviewField::PeRatio => self.pe_ratio,
      OverviewField::PriceToBookRatio => self.price_to_book_ratio,
      OverviewField::EvToEbitda => self.ev_to_ebitda,
      OverviewField::ReturnOnEquityTtm => self.return_on_equity_ttm,
      OverviewField::ReturnOnAssetsTtm => self.return_on_assets_ttm,
      OverviewField::MarketCapitalization => self.market_capitalization,
      OverviewField::DebtToEquity => self.debt_to_equity,
      OverviewField::FreeCashflowTtm => self.free_cashflow_ttm,
      OverviewField::DividendPerShareTtm => self.dividend_per_share_ttm,
    }
  }

  /// Builder-style setter used by the normalizer and by tests
  pub fn with(mut self, field: OverviewField, value: Option<f64>) -> Self {
    let slot = match field {
      OverviewField::PeRatio => &mut self.pe_ratio,
      OverviewField::PriceToBookRatio => &mut self.price_to_book_ratio,
      OverviewField::EvToEbitda => &mut self.ev_to_ebitda,
      OverviewField::ReturnOnEquityTtm => &mut self.return_on_equity_ttm,
      OverviewField::ReturnOnAssetsTtm => &mut self.return_on_assets_ttm,
      OverviewField::MarketCapitalization => &mut self.market_capitalization,
      OverviewField::DebtToEquity => &mut self.debt_to_equity,
      OverviewField::FreeCashflowTtm => &mut self.free_cashflow_ttm,
      OverviewField::DividendPerShareTtm => &mut self.dividend_per_share_ttm,
    };
    *slot = value;
    self
  }
}

/// Statement fields the metrics pipeline reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReportField {
  TotalRevenue,
  NetIncome,
  TotalAssets,
  TotalLiabilities,
  TotalShareholderEquity,
  OperatingCashflow,
  CapitalExpenditures,
}

impl ReportField {
  pub const ALL: [ReportField; 7] = [
    ReportField::TotalRevenue,
    ReportField::NetIncome,
    ReportField::TotalAssets,
    ReportField::TotalLiabilities,
    ReportField::TotalShareholderEquity,
    ReportField::OperatingCashflow,
    ReportField::CapitalExpenditures,
  ];

  /// Key used inside `annualReports` entries
  pub fn api_name(&self) -> &'static str {
    match self {
      ReportField::TotalRevenue => "totalRevenue",
      ReportField::NetIncome => "netIncome",
      ReportField::TotalAssets => "totalAssets",
      ReportField::TotalLiabilities => "totalLiabilities",
      ReportField::TotalShareholderEquity => "totalShareholderEquity",
      ReportField::OperatingCashflow => "operatingCashflow",
      ReportField::CapitalExpenditures => "capitalExpenditures",
    }
  }
}

/// One fiscal year of fundamentals, merged across the statements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualReport {
  /// Four-digit fiscal year taken from the period end date
  pub fiscal_year: i32,

  /// Full period end date when it parses as `YYYY-MM-DD`
  pub fiscal_date_ending: Option<NaiveDate>,

  pub total_revenue: Option<f64>,
  pub net_income: Option<f64>,
  pub total_assets: Option<f64>,
  pub total_liabilities: Option<f64>,
  pub total_shareholder_equity: Option<f64>,
  pub operating_cashflow: Option<f64>,
  pub capital_expenditures: Option<f64>,
}

impl AnnualReport {
  /// An empty report for a fiscal year; fields are filled with [`AnnualReport::with`]
  pub fn new(fiscal_year: i32, fiscal_date_ending: Option<NaiveDate>) -> Self {
    AnnualReport {
      fiscal_year,
      fiscal_date_ending,
      total_revenue: None,
      net_income: None,
      total_assets: None,
      total_liabilities: None,
      total_shareholder_equity: None,
      operating_cashflow: None,
      capital_expenditures: None,
    }
  }

  pub fn get(&self, field: ReportField) -> Option<f64> {
    match field {
      ReportField::TotalRevenue => self.total_revenue,
      ReportField::NetIncome => self.net_income,
      ReportField::TotalAssets => self.total_assets,
      ReportField::TotalLiabilities => self.total_liabilities,
      ReportField::TotalShareholderEquity => self.total_shareholder_equity,
      ReportField::OperatingCashflow => self.operating_cashflow,
      ReportField::CapitalExpenditures => self.capital_expenditures,
    }
  }

  pub fn with(mut self, field: ReportField, value: Option<f64>) -> Self {
    self.set(field, value);
    self
  }

  /// Fill a field only if it is still absent
  pub fn fill(&mut self, field: ReportField, value: Option<f64>) {
    if self.get(field).is_none() {
      self.set(field, value);
    }
  }

  fn set(&mut self, field: ReportField, value: Option<f64>) {
    let slot = match field {
      ReportField::TotalRevenue => &mut self.total_revenue,
      ReportField::NetIncome => &mut self.net_income,
      ReportField::TotalAssets => &mut self.total_assets,
      ReportField::TotalLiabilities => &mut self.total_liabilities,
      ReportField::TotalShareholderEquity => &mut self.total_shareholder_equity,
      ReportField::OperatingCashflow => &mut self.operating_cashflow,
      ReportField::CapitalExpenditures => &mut self.capital_expenditures,
    };
    *slot = value;
  }
}
