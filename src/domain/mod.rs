//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the dataset row (`Record`) and the indicator columns (`Indicator`)
//! - the caller-facing selection type (`YearSelection`)
//! - pipeline outputs (`LongSeriesPoint`, `ChartSpec`, `Kpis`)
//! - the dashboard views (`View`) and run configuration (`RunConfig`)

pub mod types;

pub use types::*;
