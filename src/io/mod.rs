//! Output helpers.
//!
//! - chart-spec JSON + long-form series CSV exports (`export`)
//!
//! Dataset ingest lives in `data::loader`; this module only writes artifacts.

pub mod export;

pub use export::*;
