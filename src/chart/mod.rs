//! Chart-spec assembly.
//!
//! A `ChartSpec` is a render-free description of one view: the long-form
//! primary series, an optional derived overlay series, and axis metadata.
//! All series and bounds are computed here, outside any render call; the TUI
//! and the JSON export consume the same specs.

use crate::domain::{ChartSpec, Indicator, OverlayPoint, Record, View};
use crate::transform::{export_share, reshape_long, trade_balance};

/// Axis label shared by every primary series (volumes in thousand tonnes).
const PRIMARY_AXIS_LABEL: &str = "volume (mil t)";

/// The indicator pair a view compares.
pub fn primary_indicators(view: View) -> [Indicator; 2] {
    match view {
        View::VendasVsExportacoes => [Indicator::VendasInternas, Indicator::Exportacoes],
        View::ExportVsImport => [Indicator::Exportacoes, Indicator::Importacoes],
        View::ConsumoVsVendas => [Indicator::ConsumoAparente, Indicator::VendasInternas],
    }
}

/// Build the spec for one view over the filtered dataset.
///
/// Inputs are never mutated. An empty filtered dataset yields empty series,
/// not an error; "no data" is a valid, renderable state.
pub fn build_chart_spec(view: View, filtered: &[Record]) -> ChartSpec {
    let primary_series = reshape_long(filtered, &primary_indicators(view));

    let (overlay_series, overlay_axis_label, overlay_range) = match view {
        View::VendasVsExportacoes => (
            Some(zip_overlay(filtered, export_share(filtered))),
            Some("% exportações".to_string()),
            // Percentage is bounded by construction; a value outside [0, 100]
            // signals an upstream data error, not a rendering choice.
            Some((0.0, 100.0)),
        ),
        View::ExportVsImport => (
            Some(zip_overlay(filtered, trade_balance(filtered))),
            Some("saldo comercial (mil t)".to_string()),
            None,
        ),
        View::ConsumoVsVendas => (None, None, None),
    };

    ChartSpec {
        view,
        primary_series,
        overlay_series,
        primary_axis_label: PRIMARY_AXIS_LABEL.to_string(),
        overlay_axis_label,
        overlay_range,
    }
}

/// Build every view's spec, in `View::ALL` order.
pub fn build_all(filtered: &[Record]) -> Vec<ChartSpec> {
    View::ALL
        .iter()
        .map(|&view| build_chart_spec(view, filtered))
        .collect()
}

fn zip_overlay(records: &[Record], values: Vec<f64>) -> Vec<OverlayPoint> {
    records
        .iter()
        .zip(values)
        .map(|(r, value)| OverlayPoint {
            date: r.date,
            value,
        })
        .collect()
}
