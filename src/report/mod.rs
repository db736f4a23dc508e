//! Reporting utilities: KPI aggregation and formatted terminal output.

use crate::domain::{Kpis, Record};

pub mod format;

/// Compute the summary scalars over the filtered dataset.
///
/// Returns `None` for an empty dataset. Callers must render that as
/// "no data"; a `0` summary for an empty selection would be misleading.
pub fn compute_kpis(records: &[Record]) -> Option<Kpis> {
    if records.is_empty() {
        return None;
    }

    let total_vendas_internas: f64 = records.iter().map(|r| r.vendas_internas).sum();
    let total_exportacoes: f64 = records.iter().map(|r| r.exportacoes).sum();
    let media_consumo_aparente =
        records.iter().map(|r| r.consumo_aparente).sum::<f64>() / records.len() as f64;

    Some(Kpis {
        total_vendas_internas,
        total_exportacoes,
        media_consumo_aparente,
    })
}
