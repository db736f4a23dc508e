//! The data-transformation pipeline.
//!
//! Stage order per run:
//!
//! - `validate`: schema check against the required-column list
//! - `filter`: restrict to the selected calendar years
//! - `derive`: export share and trade balance over the filtered rows
//! - `reshape`: wide columns into long-form points for multi-series plotting
//!
//! Every stage is a pure function returning a new sequence; no stage mutates
//! a shared container.

pub mod derive;
pub mod filter;
pub mod reshape;
pub mod validate;

pub use derive::*;
pub use filter::*;
pub use reshape::*;
pub use validate::*;
