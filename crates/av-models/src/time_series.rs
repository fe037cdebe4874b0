//! Time series payloads and the normalized price series

use crate::common::{OhlcvData, ProviderNotices, RawFields};
use av_core::types::Granularity;
use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Any TIME_SERIES_* response. The series lives under a namespaced key
/// (`"Time Series (Daily)"`, `"Time Series (5min)"`, `"Weekly Time Series"`, ...),
/// so everything besides the metadata and notices is captured by `series`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPayload {
    /// Metadata about the time series
    #[serde(rename = "Meta Data", default, skip_serializing_if = "Option::is_none")]
    pub meta_data: Option<RawFields>,

    #[serde(flatten)]
    pub notices: ProviderNotices,

    /// Namespaced series maps, keyed by timestamp string
    #[serde(flatten)]
    pub series: BTreeMap<String, Value>,
}

impl TimeSeriesPayload {
    /// Locate the first namespaced series and decode its granularity
    pub fn series_entries(&self) -> Option<(Granularity, &serde_json::Map<String, Value>)> {
        self.series.iter().find_map(|(key, value)| {
            let granularity = Granularity::from_series_key(key)?;
            value.as_object().map(|rows| (granularity, rows))
        })
    }

    /// Symbol reported in the metadata block
    pub fn symbol(&self) -> Option<&str> {
        self.meta_data.as_ref()?.get("2. Symbol")?.as_str()
    }
}

/// Decode one raw row; a row that is not an object yields `None`
pub fn decode_row(value: &Value) -> Option<OhlcvData> {
    serde_json::from_value(value.clone()).ok()
}

/// One timestamped observation. `close` is mandatory, the rest may be absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Date-only series are stored at midnight
    pub timestamp: NaiveDateTime,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: f64,
    pub volume: Option<f64>,
}

/// A price series sorted ascending by timestamp with no duplicate timestamps.
/// Deserialization goes through [`PriceSeries::new`] so the ordering holds
/// whatever order the serialized points are in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "UncheckedPriceSeries")]
pub struct PriceSeries {
    pub granularity: Option<Granularity>,
    points: Vec<PricePoint>,
}

#[derive(Deserialize)]
struct UncheckedPriceSeries {
    #[serde(default)]
    granularity: Option<Granularity>,
    #[serde(default)]
    points: Vec<PricePoint>,
}

impl From<UncheckedPriceSeries> for PriceSeries {
    fn from(raw: UncheckedPriceSeries) -> Self {
        PriceSeries::new(raw.granularity, raw.points)
    }
}

impl PriceSeries {
    /// Build a series, sorting ascending and keeping the first point per timestamp
    /// in `points` order
    pub fn new(granularity: Option<Granularity>, mut points: Vec<PricePoint>) -> Self {
        // stable sort keeps input order among equal timestamps, so dedup keeps the first
        points.sort_by_key(|p| p.timestamp);
        points.dedup_by_key(|p| p.timestamp);
        PriceSeries { granularity, points }
    }

    pub fn empty() -> Self {
        PriceSeries::default()
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Get the latest data point
    pub fn latest(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn earliest(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    /// Closing prices, oldest first
    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.close)
    }

    /// A new series holding only the points that satisfy `keep`
    pub fn filtered<F>(&self, keep: F) -> Self
    where
        F: Fn(&PricePoint) -> bool,
    {
        PriceSeries {
            granularity: self.granularity,
            points: self.points.iter().filter(|p| keep(p)).cloned().collect(),
        }
    }

    /// Points that fall in the given calendar year
    pub fn in_year(&self, year: i32) -> Self {
        self.filtered(|p| p.timestamp.year() == year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    fn point(date: &str, close: f64) -> PricePoint {
        PricePoint {
            timestamp: NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            open: None,
            high: None,
            low: None,
            close,
            volume: None,
        }
    }

    #[test]
    fn test_daily_payload_deserialization() {
        let payload: TimeSeriesPayload = serde_json::from_value(json!({
            "Meta Data": {
                "1. Information": "Daily Prices (open, high, low, close) and Volumes",
                "2. Symbol": "IBM",
                "3. Last Refreshed": "2024-06-03"
            },
            "Time Series (Daily)": {
                "2024-06-03": {"1. open": "166.54", "2. high": "166.78", "3. low": "163.53", "4. close": "165.28", "5. volume": "2776058"},
                "2024-05-31": {"1. open": "165.70", "2. high": "166.97", "3. low": "163.84", "4. close": "166.85", "5. volume": "4905002"}
            }
        }))
        .unwrap();

        assert_eq!(payload.symbol(), Some("IBM"));
        let (granularity, rows) = payload.series_entries().unwrap();
        assert_eq!(granularity, Granularity::Daily);
        assert_eq!(rows.len(), 2);

        let row = decode_row(&rows["2024-06-03"]).unwrap();
        assert_eq!(row.close, Some(json!("165.28")));
    }

    #[test]
    fn test_payload_without_series() {
        let payload: TimeSeriesPayload =
            serde_json::from_value(json!({"Error Message": "Invalid API call."})).unwrap();
        assert!(payload.series_entries().is_none());
        assert_eq!(payload.notices.message(), Some("Invalid API call."));
    }

    #[test]
    fn test_price_series_sorted_and_unique() {
        let series = PriceSeries::new(
            Some(Granularity::Daily),
            vec![point("2024-01-03", 3.0), point("2024-01-01", 1.0), point("2024-01-03", 99.0)],
        );

        assert_eq!(series.len(), 2);
        assert_eq!(series.earliest().unwrap().close, 1.0);
        assert_eq!(series.latest().unwrap().close, 3.0);
        let ts: Vec<_> = series.points().iter().map(|p| p.timestamp).collect();
        assert!(ts.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_in_year() {
        let series = PriceSeries::new(
            None,
            vec![point("2023-12-29", 1.0), point("2024-01-02", 2.0), point("2024-02-01", 3.0)],
        );
        let current = series.in_year(2024);
        assert_eq!(current.closes().collect::<Vec<_>>(), vec![2.0, 3.0]);
        assert!(series.in_year(2020).is_empty());
    }

    #[test]
    fn test_deserialized_series_is_sorted_and_unique() {
        let series: PriceSeries = serde_json::from_value(json!({
            "granularity": "Daily",
            "points": [
                {"timestamp": "2024-01-07T00:00:00", "open": null, "high": null, "low": null, "close": 200.0, "volume": null},
                {"timestamp": "2024-01-01T00:00:00", "open": null, "high": null, "low": null, "close": 100.0, "volume": null},
                {"timestamp": "2024-01-01T00:00:00", "open": null, "high": null, "low": null, "close": 150.0, "volume": null}
            ]
        }))
        .unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.closes().collect::<Vec<_>>(), vec![100.0, 200.0]);
        assert_eq!(series.latest().unwrap().close, 200.0);
        assert_eq!(series.granularity, Some(Granularity::Daily));
    }

    #[test]
    fn test_series_serialization_round_trips_through_new() {
        let series = PriceSeries::new(None, vec![point("2024-01-02", 2.0), point("2024-01-01", 1.0)]);
        let restored: PriceSeries = serde_json::from_value(serde_json::to_value(&series).unwrap()).unwrap();
        assert_eq!(restored, series);
    }
}
