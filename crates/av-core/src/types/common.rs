//! Common types used across the av-* crates

use serde::{Deserialize, Serialize};

/// Time interval for intraday data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    Min1,
    Min5,
    Min15,
    Min30,
    Min60,
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Interval::Min1 => write!(f, "1min"),
            Interval::Min5 => write!(f, "5min"),
            Interval::Min15 => write!(f, "15min"),
            Interval::Min30 => write!(f, "30min"),
            Interval::Min60 => write!(f, "60min"),
        }
    }
}

impl Interval {
    /// Parse interval from its API spelling
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "1min" => Some(Interval::Min1),
            "5min" => Some(Interval::Min5),
            "15min" => Some(Interval::Min15),
            "30min" => Some(Interval::Min30),
            "60min" => Some(Interval::Min60),
            _ => None,
        }
    }
}

/// Sampling granularity of a price series, decoded from the payload's namespace key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    Intraday(Interval),
    Daily,
    Weekly,
    Monthly,
}

impl Granularity {
    /// Decode a namespace key such as `"Time Series (Daily)"`, `"Time Series (5min)"`
    /// or `"Weekly Adjusted Time Series"`.
    pub fn from_series_key(key: &str) -> Option<Self> {
        if !key.contains("Time Series") {
            return None;
        }

        if let (Some(open), Some(close)) = (key.find('('), key.rfind(')')) {
            if open < close {
                let inner = &key[open + 1..close];
                return match inner {
                    "Daily" => Some(Granularity::Daily),
                    "Digital Currency Daily" => Some(Granularity::Daily),
                    _ => Interval::parse(inner).map(Granularity::Intraday),
                };
            }
        }

        if key.starts_with("Weekly") {
            Some(Granularity::Weekly)
        } else if key.starts_with("Monthly") {
            Some(Granularity::Monthly)
        } else {
            None
        }
    }

    /// Whether timestamps carry a time-of-day component
    pub fn is_intraday(&self) -> bool {
        matches!(self, Granularity::Intraday(_))
    }
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Granularity::Intraday(interval) => write!(f, "intraday ({})", interval),
            Granularity::Daily => write!(f, "daily"),
            Granularity::Weekly => write!(f, "weekly"),
            Granularity::Monthly => write!(f, "monthly"),
        }
    }
}
