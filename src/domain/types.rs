//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory while recomputing the dashboard per interaction
//! - exported to JSON/CSV
//! - reloaded later by downstream tooling

use std::collections::BTreeSet;
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One monthly row of the steel-trade dataset.
///
/// `date` is a first-of-month period marker; all volumes are in thousand
/// tonnes (mil t), matching the Aço Brasil / MDIC source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub date: NaiveDate,
    /// Domestic sales volume.
    pub vendas_internas: f64,
    /// Export volume.
    pub exportacoes: f64,
    /// Import volume.
    pub importacoes: f64,
    /// Apparent consumption (domestic sales plus net imports).
    pub consumo_aparente: f64,
    /// Trade balance as shipped by some source revisions.
    ///
    /// Carried through when present, but the pipeline always recomputes the
    /// balance from `exportacoes` and `importacoes` (see `transform::derive`),
    /// so this column cannot drift from the derived overlay.
    pub saldo_comercial: Option<f64>,
}

/// The indicator columns a chart can plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    VendasInternas,
    Exportacoes,
    Importacoes,
    ConsumoAparente,
}

impl Indicator {
    pub const ALL: [Indicator; 4] = [
        Indicator::VendasInternas,
        Indicator::Exportacoes,
        Indicator::Importacoes,
        Indicator::ConsumoAparente,
    ];

    /// Canonical column name in the source dataset.
    pub fn column_name(self) -> &'static str {
        match self {
            Indicator::VendasInternas => "vendas_internas",
            Indicator::Exportacoes => "exportacoes",
            Indicator::Importacoes => "importacoes",
            Indicator::ConsumoAparente => "consumo_aparente",
        }
    }

    /// Human-readable label for chart legends and tables.
    pub fn display_name(self) -> &'static str {
        match self {
            Indicator::VendasInternas => "Vendas internas",
            Indicator::Exportacoes => "Exportações",
            Indicator::Importacoes => "Importações",
            Indicator::ConsumoAparente => "Consumo aparente",
        }
    }

    /// Read this indicator's value out of a record.
    pub fn value(self, record: &Record) -> f64 {
        match self {
            Indicator::VendasInternas => record.vendas_internas,
            Indicator::Exportacoes => record.exportacoes,
            Indicator::Importacoes => record.importacoes,
            Indicator::ConsumoAparente => record.consumo_aparente,
        }
    }
}

/// Caller-selected calendar years.
///
/// An empty selection means "all years": the original dashboard treats a
/// cleared multiselect as no restriction, and that policy is preserved here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSelection(BTreeSet<i32>);

impl YearSelection {
    pub fn new(years: impl IntoIterator<Item = i32>) -> Self {
        Self(years.into_iter().collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, year: i32) -> bool {
        self.0.contains(&year)
    }

    /// Add the year if absent, remove it if present.
    pub fn toggle(&mut self, year: i32) {
        if !self.0.remove(&year) {
            self.0.insert(year);
        }
    }

    /// Selected years in ascending order.
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.0.iter().copied()
    }
}

/// A single long-form observation: one `(date, indicator, value)` triple.
///
/// Each `Record` expands into one point per indicator requested for a view;
/// this is the shape multi-series plotting needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LongSeriesPoint {
    pub date: NaiveDate,
    pub indicator: Indicator,
    pub value: f64,
}

/// One point of an overlay series (derived metric over time).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Declarative description of one chart.
///
/// Carries no rendering-library state; the TUI and the JSON export both
/// consume the same spec.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub view: View,
    pub primary_series: Vec<LongSeriesPoint>,
    pub overlay_series: Option<Vec<OverlayPoint>>,
    pub primary_axis_label: String,
    pub overlay_axis_label: Option<String>,
    /// Fixed overlay bounds; `None` means auto-scale to the overlay data.
    pub overlay_range: Option<(f64, f64)>,
}

/// Summary scalars over the filtered dataset.
///
/// The aggregator returns `Option<Kpis>`: `None` is "no data", which callers
/// must render distinctly from an all-zero summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Kpis {
    pub total_vendas_internas: f64,
    pub total_exportacoes: f64,
    pub media_consumo_aparente: f64,
}

/// The dashboard views (the tabs of the original page layout).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum View {
    /// Domestic sales vs. exports, with an export-share (%) overlay.
    VendasVsExportacoes,
    /// Exports vs. imports, with a trade-balance overlay.
    ExportVsImport,
    /// Apparent consumption vs. domestic sales, no overlay.
    ConsumoVsVendas,
}

impl View {
    pub const ALL: [View; 3] = [
        View::VendasVsExportacoes,
        View::ExportVsImport,
        View::ConsumoVsVendas,
    ];

    /// Tab title, as on the original page.
    pub fn display_name(self) -> &'static str {
        match self {
            View::VendasVsExportacoes => "Vendas Internas vs Exportações",
            View::ExportVsImport => "Export vs Import",
            View::ConsumoVsVendas => "Consumo vs Vendas Internas",
        }
    }

    /// Stable identifier for export filenames.
    pub fn slug(self) -> &'static str {
        match self {
            View::VendasVsExportacoes => "vendas-vs-exportacoes",
            View::ExportVsImport => "export-vs-import",
            View::ConsumoVsVendas => "consumo-vs-vendas",
        }
    }

    pub fn next(self) -> View {
        match self {
            View::VendasVsExportacoes => View::ExportVsImport,
            View::ExportVsImport => View::ConsumoVsVendas,
            View::ConsumoVsVendas => View::VendasVsExportacoes,
        }
    }

    pub fn prev(self) -> View {
        match self {
            View::VendasVsExportacoes => View::ConsumoVsVendas,
            View::ExportVsImport => View::VendasVsExportacoes,
            View::ConsumoVsVendas => View::ExportVsImport,
        }
    }
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults and `.env` overrides).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub data_path: PathBuf,
    /// `None` applies the default policy (last 3 distinct years in the
    /// dataset); `Some(empty)` selects every year.
    pub years: Option<YearSelection>,
    /// Generate a deterministic synthetic dataset instead of reading a file.
    pub use_sample: bool,
    pub sample_seed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(y: i32, m: u32) -> Record {
        Record {
            date: NaiveDate::from_ymd_opt(y, m, 1).unwrap(),
            vendas_internas: 100.0,
            exportacoes: 50.0,
            importacoes: 20.0,
            consumo_aparente: 120.0,
            saldo_comercial: None,
        }
    }

    #[test]
    fn indicator_accessors_match_columns() {
        let r = record(2023, 1);
        assert_eq!(Indicator::VendasInternas.value(&r), 100.0);
        assert_eq!(Indicator::Exportacoes.value(&r), 50.0);
        assert_eq!(Indicator::Importacoes.value(&r), 20.0);
        assert_eq!(Indicator::ConsumoAparente.value(&r), 120.0);
        assert_eq!(Indicator::Exportacoes.column_name(), "exportacoes");
    }

    #[test]
    fn year_selection_toggle_roundtrip() {
        let mut sel = YearSelection::default();
        assert!(sel.is_empty());
        sel.toggle(2024);
        assert!(sel.contains(2024));
        sel.toggle(2024);
        assert!(sel.is_empty());
    }

    #[test]
    fn view_next_cycles_through_all() {
        let mut v = View::VendasVsExportacoes;
        for _ in 0..View::ALL.len() {
            v = v.next();
        }
        assert_eq!(v, View::VendasVsExportacoes);
        assert_eq!(View::ExportVsImport.prev(), View::VendasVsExportacoes);
    }
}
