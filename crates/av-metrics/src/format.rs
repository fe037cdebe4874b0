//! Human-readable magnitude formatting for the rendering boundary.
//!
//! Formatting is total: numbers get a K/M/B/T suffix or fixed decimals, and
//! anything that is not a number (text, absent cells, `null`) passes through.
//! Nothing here is used during calculation.

use av_core::Config;
use av_models::{MetricValue, PeriodMetrics};
use serde_json::Value;

/// Text shown for an absent cell
pub const ABSENT_MARKER: &str = "N/A";

const SUFFIXES: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

/// Format with the default two decimal places
pub fn format_magnitude(value: f64) -> String {
  format_magnitude_with(value, av_core::DEFAULT_DISPLAY_PRECISION as usize)
}

/// `2_500_000_000.0` -> `"2.50B"`, `999.0` -> `"999.00"`.
/// The suffix is picked from the absolute value so losses read the same way.
/// The suffix is chosen before rounding, so `999_999.0` renders as `"1000.00K"`.
pub fn format_magnitude_with(value: f64, precision: usize) -> String {
  if !value.is_finite() {
    return value.to_string();
  }

  let magnitude = value.abs();
  for (threshold, suffix) in SUFFIXES {
    if magnitude >= threshold {
      return format!("{:.*}{}", precision, value / threshold, suffix);
    }
  }
  format!("{:.*}", precision, value)
}

/// Values that can be rendered by the magnitude formatter
pub trait MagnitudeFormat {
  fn format_magnitude(&self, precision: usize) -> String;
}

macro_rules! numeric_magnitude {
  ($($t:ty),*) => {
    $(
      impl MagnitudeFormat for $t {
        fn format_magnitude(&self, precision: usize) -> String {
          format_magnitude_with(*self as f64, precision)
        }
      }
    )*
  };
}

numeric_magnitude!(f64, f32, i32, i64, u32, u64, usize);

impl MagnitudeFormat for str {
  fn format_magnitude(&self, _precision: usize) -> String {
    self.to_string()
  }
}

impl MagnitudeFormat for String {
  fn format_magnitude(&self, precision: usize) -> String {
    self.as_str().format_magnitude(precision)
  }
}

impl<T: MagnitudeFormat> MagnitudeFormat for Option<T> {
  fn format_magnitude(&self, precision: usize) -> String {
    match self {
      Some(value) => value.format_magnitude(precision),
      None => ABSENT_MARKER.to_string(),
    }
  }
}

impl MagnitudeFormat for MetricValue {
  fn format_magnitude(&self, precision: usize) -> String {
    self.value().format_magnitude(precision)
  }
}

impl MagnitudeFormat for Value {
  fn format_magnitude(&self, precision: usize) -> String {
    match self {
      Value::Number(n) => match n.as_f64() {
        Some(v) => format_magnitude_with(v, precision),
        None => n.to_string(),
      },
      Value::String(s) => s.clone(),
      Value::Null => ABSENT_MARKER.to_string(),
      other => other.to_string(),
    }
  }
}

/// Format anything formattable with the default precision
pub fn format_value<T: MagnitudeFormat + ?Sized>(value: &T) -> String {
  value.format_magnitude(av_core::DEFAULT_DISPLAY_PRECISION as usize)
}

/// Column headers matching [`display_cells`]
pub fn display_headers(row: &PeriodMetrics) -> Vec<String> {
  let mut headers = vec!["Year".to_string(), "Revenue".to_string(), "Net Income".to_string()];
  headers.extend(row.metrics.keys().map(|id| id.label().to_string()));
  headers
}

/// Formatted strings for every cell in a row, in column order
pub fn display_cells(row: &PeriodMetrics, config: &Config) -> Vec<String> {
  let precision = config.display_precision as usize;
  let mut cells = vec![
    row.year.clone(),
    row.revenue.format_magnitude(precision),
    row.net_income.format_magnitude(precision),
  ];
  cells.extend(row.metrics.values().map(|value| value.format_magnitude(precision)));
  cells
}
