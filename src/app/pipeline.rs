//! Shared dashboard pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load (memoized) -> validate -> filter -> derive/reshape/aggregate -> specs
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use crate::chart;
use crate::data::cache::DataCache;
use crate::data::loader::LoadedData;
use crate::data::sample::generate_sample;
use crate::domain::{ChartSpec, Kpis, Record, RunConfig, View, YearSelection};
use crate::error::AppError;
use crate::report::compute_kpis;
use crate::transform::{default_selection, filter_by_years, years_present};

/// All computed outputs of a single dashboard run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub rows_read: usize,
    pub rows_used: usize,
    /// Count of skipped source rows (details stay with the loader).
    pub row_errors: usize,
    /// Distinct years in the full dataset (for selection menus).
    pub years_available: Vec<i32>,
    /// The selection actually applied (after the default policy resolved).
    pub selection: YearSelection,
    pub filtered: Vec<Record>,
    /// One spec per view, in `View::ALL` order.
    pub specs: Vec<ChartSpec>,
    /// `None` when the filtered dataset is empty.
    pub kpis: Option<Kpis>,
}

impl RunOutput {
    /// The spec for one view.
    pub fn spec(&self, view: View) -> Option<&ChartSpec> {
        self.specs.iter().find(|s| s.view == view)
    }
}

/// Execute the full pipeline, reading the source through the cache.
pub fn run_dashboard(cache: &mut DataCache, config: &RunConfig) -> Result<RunOutput, AppError> {
    if config.use_sample {
        let loaded = LoadedData::from_records(generate_sample(config.sample_seed)?);
        return run_with_loaded(&loaded, config);
    }

    let loaded = cache.load(&config.data_path)?;
    run_with_loaded(loaded, config)
}

/// Execute the pipeline with an already-loaded dataset.
///
/// This is the path the TUI takes on every interaction: refilter and
/// recompute without touching the source file.
pub fn run_with_loaded(loaded: &LoadedData, config: &RunConfig) -> Result<RunOutput, AppError> {
    // `None` applies the default policy; an explicit empty selection means
    // "all years" and is passed through to the filter untouched.
    let selection = match &config.years {
        Some(sel) => sel.clone(),
        None => default_selection(&loaded.records),
    };

    let filtered = filter_by_years(&loaded.records, &selection);
    let specs = chart::build_all(&filtered);
    let kpis = compute_kpis(&filtered);

    Ok(RunOutput {
        rows_read: loaded.rows_read,
        rows_used: loaded.rows_used,
        row_errors: loaded.row_errors.len(),
        years_available: years_present(&loaded.records),
        selection,
        filtered,
        specs,
        kpis,
    })
}
