//! Dataset sources.
//!
//! - CSV ingest + header aliasing (`loader`)
//! - memoized loading keyed on source identity (`cache`)
//! - deterministic synthetic data for file-less runs (`sample`)

pub mod cache;
pub mod loader;
pub mod sample;

pub use cache::*;
pub use loader::*;
pub use sample::*;
