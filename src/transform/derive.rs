//! Derived comparison metrics.
//!
//! Both functions consume the *already filtered* dataset and return one value
//! per record, aligned by position with the input. Deriving before filtering
//! would misalign timestamps if the filter ever changed row order, so the
//! pipeline never does it in that order.

use crate::domain::Record;

/// Export share of total sales volume, in percent:
/// `exportacoes / (exportacoes + vendas_internas) * 100`.
///
/// A zero denominator maps to exactly `0.0`, never NaN. Canonical policy:
/// the overlay axis is bounded to [0, 100] and must stay renderable for
/// months with no recorded volume.
pub fn export_share(records: &[Record]) -> Vec<f64> {
    records
        .iter()
        .map(|r| {
            let total = r.exportacoes + r.vendas_internas;
            if total == 0.0 {
                0.0
            } else {
                r.exportacoes / total * 100.0
            }
        })
        .collect()
}

/// Trade balance per month: `exportacoes - importacoes`, in thousand tonnes.
///
/// Always defined; the source's optional `saldo_comercial` column is ignored
/// here so the overlay can never disagree with the canonical columns.
pub fn trade_balance(records: &[Record]) -> Vec<f64> {
    records.iter().map(|r| r.exportacoes - r.importacoes).collect()
}
