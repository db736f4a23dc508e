//! Artifact exports: chart specs as JSON, the long-form series as CSV.
//!
//! Exports are meant to be easy to consume in spreadsheets or downstream
//! scripts; they carry no rendering state.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::{ChartSpec, LongSeriesPoint};
use crate::error::AppError;

/// Write one chart spec as pretty JSON to `<dir>/<view-slug>.json`.
///
/// Returns the written path.
pub fn write_chart_spec_json(dir: &Path, spec: &ChartSpec) -> Result<PathBuf, AppError> {
    fs::create_dir_all(dir).map_err(|e| {
        AppError::new(
            4,
            format!("Failed to create export dir '{}': {e}", dir.display()),
        )
    })?;

    let path = dir.join(format!("{}.json", spec.view.slug()));
    let json = serde_json::to_string_pretty(spec)
        .map_err(|e| AppError::new(4, format!("Failed to serialize chart spec: {e}")))?;
    fs::write(&path, json).map_err(|e| {
        AppError::new(
            4,
            format!("Failed to write chart spec '{}': {e}", path.display()),
        )
    })?;

    Ok(path)
}

/// Write long-form series rows (`date,indicator,value`) to a CSV file.
pub fn write_series_csv(path: &Path, points: &[LongSeriesPoint]) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(
            4,
            format!("Failed to create series CSV '{}': {e}", path.display()),
        )
    })?;

    writeln!(file, "date,indicator,value")
        .map_err(|e| AppError::new(4, format!("Failed to write series CSV header: {e}")))?;

    for p in points {
        writeln!(file, "{},{},{:.3}", p.date, p.indicator.column_name(), p.value)
            .map_err(|e| AppError::new(4, format!("Failed to write series CSV row: {e}")))?;
    }

    Ok(())
}
