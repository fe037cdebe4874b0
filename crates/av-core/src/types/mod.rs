//! Common types used across av-* crates

pub mod common;

pub use common::{Granularity, Interval};
