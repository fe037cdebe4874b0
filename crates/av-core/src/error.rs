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

use thiserror::Error;

/// The main error type for av-* crates
#[derive(Error, Debug)]
pub enum Error {
  /// A required top-level payload was absent or carried no records
  #[error("Missing data: {0}")]
  MissingData(String),

  /// Fewer periods or observations than a derived metric needs
  #[error("Insufficient data for {metric}: need {required}, have {available}")]
  InsufficientData { metric: String, required: usize, available: usize },

  /// A single field failed numeric or date coercion
  #[error("Malformed field {field}: {value:?}")]
  MalformedField { field: String, value: String },

  /// Unrecognized timeframe token or non-positive window length
  #[error("Invalid timeframe: {0}")]
  InvalidTimeframe(String),

  /// Configuration error
  #[error("Configuration error: {0}")]
  Config(String),

  /// Serialization/Deserialization error
  #[error("Serialization error: {0}")]
  Serde(#[from] serde_json::Error),
}

/// Result type alias for av-* crates
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_missing_data_display() {
    let err = Error::MissingData("overview".to_string());
    assert_eq!(err.to_string(), "Missing data: overview");
  }

  #[test]
  fn test_insufficient_data_display() {
    let err =
      Error::InsufficientData { metric: "annual reports".to_string(), required: 1, available: 0 };
    assert_eq!(err.to_string(), "Insufficient data for annual reports: need 1, have 0");
  }

  #[test]
  fn test_malformed_field_display() {
    let err = Error::MalformedField { field: "totalRevenue".to_string(), value: "abc".to_string() };
    assert_eq!(err.to_string(), "Malformed field totalRevenue: \"abc\"");
  }

  #[test]
  fn test_from_serde_json_error() {
    let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
    let err = Error::from(json_err);
    assert!(matches!(err, Error::Serde(_)));
  }
}
