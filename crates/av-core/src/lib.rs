pub mod config;
pub mod error;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::Config;
pub use error::{Error, Result};

/// AlphaVantage API functions whose payloads the metrics pipeline consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FuncType {
  // Fundamentals functions
  Overview,
  IncomeStatement,
  BalanceSheet,
  CashFlow,

  // Time Series functions
  TimeSeriesIntraday,
  TimeSeriesDaily,
  TimeSeriesWeekly,
  TimeSeriesMonthly,
}

impl FuncType {
  /// Fundamentals payloads in the order the normalizer merges them.
  pub const STATEMENTS: [FuncType; 3] =
    [FuncType::IncomeStatement, FuncType::BalanceSheet, FuncType::CashFlow];

  /// Time series payloads, most granular last.
  pub const TIME_SERIES: [FuncType; 4] = [
    FuncType::TimeSeriesDaily,
    FuncType::TimeSeriesWeekly,
    FuncType::TimeSeriesMonthly,
    FuncType::TimeSeriesIntraday,
  ];

  /// File name a saved response for this function is expected under.
  pub fn file_name(&self) -> String {
    format!("{}.json", self)
  }
}

impl std::fmt::Display for FuncType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      FuncType::Overview => write!(f, "OVERVIEW"),
      FuncType::IncomeStatement => write!(f, "INCOME_STATEMENT"),
      FuncType::BalanceSheet => write!(f, "BALANCE_SHEET"),
      FuncType::CashFlow => write!(f, "CASH_FLOW"),
      FuncType::TimeSeriesIntraday => write!(f, "TIME_SERIES_INTRADAY"),
      FuncType::TimeSeriesDaily => write!(f, "TIME_SERIES_DAILY"),
      FuncType::TimeSeriesWeekly => write!(f, "TIME_SERIES_WEEKLY"),
      FuncType::TimeSeriesMonthly => write!(f, "TIME_SERIES_MONTHLY"),
    }
  }
}

/// Default decimal places for plain ratios
pub const DEFAULT_RATIO_PRECISION: u32 = 2;
/// Default decimal places for percentages
pub const DEFAULT_PERCENT_PRECISION: u32 = 2;
/// Default decimal places for fractional yields
pub const DEFAULT_YIELD_PRECISION: u32 = 4;
/// Default decimal places for magnitude-formatted output
pub const DEFAULT_DISPLAY_PRECISION: u32 = 2;
/// Default momentum window in trading observations
pub const DEFAULT_MOMENTUM_LOOKBACK: usize = 5;
/// Upper bound accepted for any precision setting
pub const MAX_PRECISION: u32 = 12;
