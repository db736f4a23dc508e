//! CSV ingest and normalization.
//!
//! This module turns the published steel-trade CSV into a clean, date-ordered
//! `Vec<Record>`.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2,
//!   listing every missing column at once)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Load-time aliasing** of legacy column spellings
//! - **Separation of concerns**: no derived metrics here

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::Record;
use crate::error::AppError;
use crate::transform::validate_columns;

/// Filename published by the upstream data drop; used when neither `--data`
/// nor `SIDER_DATA` overrides it.
pub const DEFAULT_DATA_PATH: &str = "dados_siderurgia_limpos_2013_2025.csv";

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: parsed records + row errors + counters.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub records: Vec<Record>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

impl LoadedData {
    /// Wrap an in-memory dataset (the synthetic sample path).
    pub fn from_records(records: Vec<Record>) -> Self {
        let n = records.len();
        Self {
            records,
            row_errors: Vec::new(),
            rows_read: n,
            rows_used: n,
        }
    }
}

/// Load and normalize the dataset CSV.
///
/// The schema is validated against the canonical required-column list before
/// any row is parsed; rows with unparseable values are skipped and reported.
pub fn load_records(path: &Path) -> Result<LoadedData, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to open dataset '{}': {e}", path.display()),
        )
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    validate_columns(header_map.keys().map(String::as_str))?;

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map) {
            Ok(rec) => records.push(rec),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    if records.is_empty() {
        return Err(AppError::new(3, "No valid rows remain after parsing."));
    }

    // Consumers assume date-ascending order; only re-sort when the source is
    // actually out of order (stable, so same-date rows keep file order).
    if !records.is_sorted_by_key(|r: &Record| r.date) {
        records.sort_by_key(|r| r.date);
    }

    let rows_used = records.len();
    Ok(LoadedData {
        records,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        let name = canonical_column_name(&normalize_header_name(name));
        // First occurrence wins when a file carries both spellings.
        map.entry(name).or_insert(idx);
    }
    map
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header (e.g. "﻿date"). If we don't strip it, schema validation
    // will incorrectly report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

/// Resolve legacy column spellings to the canonical schema.
///
/// Several source revisions exported `exportacoes_volume` /
/// `importacoes_volume`; the canonical names are the short ones, and the
/// aliasing happens here so the validator and the pipeline only ever see one
/// spelling.
fn canonical_column_name(name: &str) -> String {
    match name {
        "exportacoes_volume" => "exportacoes".to_string(),
        "importacoes_volume" => "importacoes".to_string(),
        _ => name.to_string(),
    }
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<Record, String> {
    let date = parse_date(get_required(record, header_map, "date")?)?;
    let vendas_internas = parse_f64(get_required(record, header_map, "vendas_internas")?)?;
    let exportacoes = parse_f64(get_required(record, header_map, "exportacoes")?)?;
    let importacoes = parse_f64(get_required(record, header_map, "importacoes")?)?;
    let consumo_aparente = parse_f64(get_required(record, header_map, "consumo_aparente")?)?;

    let saldo_comercial = get_optional(record, header_map, "saldo_comercial")
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite());

    Ok(Record {
        date,
        vendas_internas,
        exportacoes,
        importacoes,
        consumo_aparente,
        saldo_comercial,
    })
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    // The published file uses ISO dates, but hand-edited revisions show up
    // with day-first dates and bare `YYYY-MM` period markers. We accept a
    // small set of formats to reduce friction while keeping parsing
    // deterministic.
    const FMTS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    // `YYYY-MM` means the first of that month.
    if let Ok(d) = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d") {
        return Ok(d);
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, DD/MM/YYYY, YYYY/MM/DD, YYYY-MM."
    ))
}

fn parse_f64(s: &str) -> Result<f64, String> {
    let v = s
        .parse::<f64>()
        .map_err(|_| format!("Invalid numeric value '{s}'."))?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(format!("Non-finite numeric value '{s}'."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn write_temp_csv(contents: &str) -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
        let path = env::temp_dir().join(format!(
            "sider_loader_test_{}_{id}.csv",
            std::process::id()
        ));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn loads_canonical_headers() {
        let path = write_temp_csv(
            "date,vendas_internas,exportacoes,importacoes,consumo_aparente\n\
             2023-01-01,100.0,50.0,20.0,120.0\n\
             2023-02-01,110.0,55.0,22.0,132.0\n",
        );
        let loaded = load_records(&path).unwrap();
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.rows_read, 2);
        assert_eq!(loaded.rows_used, 2);
        assert!(loaded.row_errors.is_empty());
        assert_eq!(loaded.records[0].exportacoes, 50.0);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn volume_suffixed_headers_are_aliased() {
        let path = write_temp_csv(
            "date,vendas_internas,exportacoes_volume,importacoes_volume,consumo_aparente\n\
             2023-01-01,100.0,50.0,20.0,120.0\n",
        );
        let loaded = load_records(&path).unwrap();
        assert_eq!(loaded.records[0].exportacoes, 50.0);
        assert_eq!(loaded.records[0].importacoes, 20.0);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_columns_are_all_reported() {
        let path = write_temp_csv("date,vendas_internas\n2023-01-01,100.0\n");
        let err = load_records(&path).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        let msg = err.to_string();
        assert!(msg.contains("`exportacoes`"));
        assert!(msg.contains("`importacoes`"));
        assert!(msg.contains("`consumo_aparente`"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn bad_rows_are_skipped_and_reported() {
        let path = write_temp_csv(
            "date,vendas_internas,exportacoes,importacoes,consumo_aparente\n\
             2023-01-01,100.0,50.0,20.0,120.0\n\
             not-a-date,1.0,2.0,3.0,4.0\n\
             2023-03-01,90.0,45.0,18.0,108.0\n",
        );
        let loaded = load_records(&path).unwrap();
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.rows_read, 3);
        assert_eq!(loaded.row_errors.len(), 1);
        assert_eq!(loaded.row_errors[0].line, 3);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn year_month_period_markers_parse_as_first_of_month() {
        let path = write_temp_csv(
            "date,vendas_internas,exportacoes,importacoes,consumo_aparente\n\
             2023-05,100.0,50.0,20.0,120.0\n",
        );
        let loaded = load_records(&path).unwrap();
        assert_eq!(
            loaded.records[0].date,
            NaiveDate::from_ymd_opt(2023, 5, 1).unwrap()
        );
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn out_of_order_rows_are_sorted_ascending() {
        let path = write_temp_csv(
            "date,vendas_internas,exportacoes,importacoes,consumo_aparente\n\
             2023-03-01,90.0,45.0,18.0,108.0\n\
             2023-01-01,100.0,50.0,20.0,120.0\n",
        );
        let loaded = load_records(&path).unwrap();
        assert!(loaded.records[0].date < loaded.records[1].date);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn optional_saldo_column_is_carried_through() {
        let path = write_temp_csv(
            "date,vendas_internas,exportacoes,importacoes,consumo_aparente,saldo_comercial\n\
             2023-01-01,100.0,50.0,20.0,120.0,30.0\n",
        );
        let loaded = load_records(&path).unwrap();
        assert_eq!(loaded.records[0].saldo_comercial, Some(30.0));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn all_rows_bad_is_a_no_data_error() {
        let path = write_temp_csv(
            "date,vendas_internas,exportacoes,importacoes,consumo_aparente\n\
             bad,1,2,3,4\n",
        );
        let err = load_records(&path).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        let _ = fs::remove_file(&path);
    }
}
