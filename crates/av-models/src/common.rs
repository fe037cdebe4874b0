/*
 *
 *
 *
 *
 * MIT License
 * Copyright (c) 2025. Dwight J. Browne
 * dwight[-dot-]browne[-at-]dwightjbrowne[-dot-]com
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

//! Common types and structures used across the AlphaVantage payloads

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Loosely typed field map as it arrives from the API
pub type RawFields = BTreeMap<String, Value>;

/// Raw OHLCV row of a time series; every value is a numeric string or absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OhlcvData {
  /// Opening price
  #[serde(rename = "1. open", default)]
  pub open: Option<Value>,

  /// Highest price
  #[serde(rename = "2. high", default)]
  pub high: Option<Value>,

  /// Lowest price
  #[serde(rename = "3. low", default)]
  pub low: Option<Value>,

  /// Closing price
  #[serde(rename = "4. close", default)]
  pub close: Option<Value>,

  /// Trading volume. Adjusted series put it under `6. volume`.
  #[serde(rename = "5. volume", alias = "6. volume", default)]
  pub volume: Option<Value>,
}

/// Messages AlphaVantage returns instead of data (rate limiting, bad symbol, ...)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderNotices {
  #[serde(rename = "Note", default, skip_serializing_if = "Option::is_none")]
  pub note: Option<String>,

  #[serde(rename = "Information", default, skip_serializing_if = "Option::is_none")]
  pub information: Option<String>,

  #[serde(rename = "Error Message", default, skip_serializing_if = "Option::is_none")]
  pub error_message: Option<String>,
}

impl ProviderNotices {
  /// Keys that carry a provider notice rather than data
  pub const KEYS: [&'static str; 3] = ["Note", "Information", "Error Message"];

  /// The most specific notice present, if any
  pub fn message(&self) -> Option<&str> {
    self
      .error_message
      .as_deref()
      .or(self.information.as_deref())
      .or(self.note.as_deref())
  }

  /// Pull the notice keys out of a flat field map
  pub fn from_fields(fields: &RawFields) -> Self {
    let text = |key: &str| fields.get(key).and_then(Value::as_str).map(str::to_string);
    ProviderNotices {
      note: text("Note"),
      information: text("Information"),
      error_message: text("Error Message"),
    }
  }
}

/// Render a raw JSON scalar the way it would appear in the payload, for diagnostics
pub fn raw_text(value: &Value) -> String {
  match value {
    Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_ohlcv_tolerates_missing_fields() {
    let row: OhlcvData = serde_json::from_value(json!({
      "1. open": "100.0",
      "4. close": "102.0"
    }))
    .unwrap();

    assert_eq!(row.open, Some(json!("100.0")));
    assert_eq!(row.close, Some(json!("102.0")));
    assert!(row.high.is_none());
    assert!(row.volume.is_none());
  }

  #[test]
  fn test_ohlcv_adjusted_volume_alias() {
    let row: OhlcvData = serde_json::from_value(json!({
      "4. close": "10",
      "5. adjusted close": "9.5",
      "6. volume": "1200"
    }))
    .unwrap();
    assert_eq!(row.volume, Some(json!("1200")));
  }

  #[test]
  fn test_notice_priority() {
    let notices = ProviderNotices {
      note: Some("Thank you for using Alpha Vantage!".to_string()),
      information: None,
      error_message: Some("Invalid API call.".to_string()),
    };
    assert_eq!(notices.message(), Some("Invalid API call."));
    assert_eq!(ProviderNotices::default().message(), None);
  }

  #[test]
  fn test_notices_from_fields() {
    let mut fields = RawFields::new();
    fields.insert("Information".to_string(), json!("premium endpoint"));
    fields.insert("PERatio".to_string(), json!("12"));
    assert_eq!(ProviderNotices::from_fields(&fields).message(), Some("premium endpoint"));
  }

  #[test]
  fn test_raw_text() {
    assert_eq!(raw_text(&json!("1.5")), "1.5");
    assert_eq!(raw_text(&json!(2.5)), "2.5");
    assert_eq!(raw_text(&Value::Null), "null");
  }
}
