//! Dataset schema validation.
//!
//! Runs once per load, before any filtering or derivation touches the data.
//! A missing required column is a dataset-level failure, not a per-row issue,
//! and *every* missing name is collected so a single load attempt reports the
//! full problem.

use std::collections::HashSet;

/// Required columns of the steel-trade dataset (canonical names).
///
/// `saldo_comercial` is deliberately absent: it is optional in the source and
/// always recomputed by the pipeline.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "date",
    "vendas_internas",
    "exportacoes",
    "importacoes",
    "consumo_aparente",
];

/// Schema violation: one or more required columns absent from the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    missing: Vec<String>,
}

impl SchemaError {
    /// Every missing required column, in schema order.
    pub fn missing(&self) -> &[String] {
        &self.missing
    }
}

impl std::fmt::Display for SchemaError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<String> = self.missing.iter().map(|c| format!("`{c}`")).collect();
        write!(f, "Missing required column(s): {}", names.join(", "))
    }
}

impl std::error::Error for SchemaError {}

/// Check that every required column is present.
///
/// `present` is the set of (already canonicalized) column names the loader
/// found in the source. On failure the error names all missing columns, not
/// just the first.
pub fn validate_columns<'a>(present: impl IntoIterator<Item = &'a str>) -> Result<(), SchemaError> {
    let present: HashSet<&str> = present.into_iter().collect();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| !present.contains(**c))
        .map(|c| (*c).to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError { missing })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_schema_passes() {
        assert!(validate_columns(REQUIRED_COLUMNS).is_ok());
    }

    #[test]
    fn extra_columns_are_tolerated() {
        let mut cols: Vec<&str> = REQUIRED_COLUMNS.to_vec();
        cols.push("saldo_comercial");
        cols.push("producao_bruta");
        assert!(validate_columns(cols).is_ok());
    }

    #[test]
    fn reports_every_missing_column() {
        let err = validate_columns(["date", "vendas_internas"]).unwrap_err();
        assert_eq!(
            err.missing(),
            ["exportacoes", "importacoes", "consumo_aparente"]
        );
        let msg = err.to_string();
        assert!(msg.contains("`exportacoes`"));
        assert!(msg.contains("`importacoes`"));
        assert!(msg.contains("`consumo_aparente`"));
    }

    #[test]
    fn empty_source_reports_all_columns() {
        let err = validate_columns([]).unwrap_err();
        assert_eq!(err.missing().len(), REQUIRED_COLUMNS.len());
    }
}
