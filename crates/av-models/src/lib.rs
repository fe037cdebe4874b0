//! # av-models
//!
//! Data models for the AlphaVantage metrics engine.
//!
//! Two layers live here:
//!
//! - **Raw payloads** (`OverviewPayload`, `StatementPayload`, `TimeSeriesPayload`):
//!   lenient serde models of what the API returns. Numeric values are kept as
//!   JSON scalars because the API mixes numeric strings, numbers and `"None"`.
//! - **Normalized records** (`CompanyOverview`, `AnnualReport`, `PriceSeries`,
//!   `PeriodMetrics`): typed values where every number is either present and
//!   finite or explicitly absent.
//!
//! ## Usage
//!
//! ```ignore
//! use av_models::fundamentals::{OverviewPayload, StatementPayload};
//!
//! let overview: OverviewPayload = serde_json::from_str(&overview_json)?;
//! let income: StatementPayload = serde_json::from_str(&income_json)?;
//! ```

#![warn(clippy::all)]

pub mod common;
pub mod fundamentals;
pub mod metrics;
pub mod time_series;

// Re-export common types for convenience
pub use common::*;

// Re-export all model types
pub use fundamentals::*;
pub use metrics::*;
pub use time_series::*;
