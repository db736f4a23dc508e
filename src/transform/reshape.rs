//! Wide-to-long reshaping for multi-series plotting.
//!
//! Charts need one categorical "indicator" dimension instead of N separate
//! columns; each record expands into one point per requested indicator.

use crate::domain::{Indicator, LongSeriesPoint, Record};

/// Expand wide indicator columns into a long-form point sequence.
///
/// Ordering is deterministic: record order is preserved, and within a record
/// the points follow the order of `indicators`. No sorting by value, ever.
pub fn reshape_long(records: &[Record], indicators: &[Indicator]) -> Vec<LongSeriesPoint> {
    let mut out = Vec::with_capacity(records.len() * indicators.len());
    for record in records {
        for &indicator in indicators {
            out.push(LongSeriesPoint {
                date: record.date,
                indicator,
                value: indicator.value(record),
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn record(m: u32, vendas: f64, exportacoes: f64) -> Record {
        Record {
            date: NaiveDate::from_ymd_opt(2024, m, 1).unwrap(),
            vendas_internas: vendas,
            exportacoes,
            importacoes: 10.0,
            consumo_aparente: vendas + 10.0,
            saldo_comercial: None,
        }
    }

    #[test]
    fn one_point_per_record_per_indicator() {
        let records = vec![record(1, 100.0, 40.0), record(2, 110.0, 45.0)];
        let long = reshape_long(
            &records,
            &[Indicator::VendasInternas, Indicator::Exportacoes],
        );
        assert_eq!(long.len(), 4);
    }

    #[test]
    fn record_major_ordering_with_indicator_order_inside() {
        let records = vec![record(1, 100.0, 40.0), record(2, 110.0, 45.0)];
        let long = reshape_long(
            &records,
            &[Indicator::Exportacoes, Indicator::VendasInternas],
        );

        assert_eq!(long[0].date, records[0].date);
        assert_eq!(long[0].indicator, Indicator::Exportacoes);
        assert_eq!(long[1].indicator, Indicator::VendasInternas);
        assert_eq!(long[2].date, records[1].date);
        assert_eq!(long[2].indicator, Indicator::Exportacoes);
    }

    #[test]
    fn reshaping_is_deterministic() {
        let records = vec![record(1, 100.0, 40.0), record(2, 110.0, 45.0)];
        let indicators = [Indicator::VendasInternas, Indicator::Exportacoes];
        assert_eq!(
            reshape_long(&records, &indicators),
            reshape_long(&records, &indicators)
        );
    }

    #[test]
    fn regrouping_long_points_reconstructs_wide_values() {
        let records = vec![
            record(1, 100.0, 40.0),
            record(2, 110.0, 45.0),
            record(3, 95.0, 60.0),
        ];
        let indicators = [Indicator::VendasInternas, Indicator::Exportacoes];
        let long = reshape_long(&records, &indicators);

        let mut grouped: HashMap<(NaiveDate, Indicator), f64> = HashMap::new();
        for p in &long {
            grouped.insert((p.date, p.indicator), p.value);
        }

        for r in &records {
            for &ind in &indicators {
                assert_eq!(grouped[&(r.date, ind)], ind.value(r));
            }
        }
        assert_eq!(grouped.len(), records.len() * indicators.len());
    }

    #[test]
    fn empty_dataset_reshapes_to_empty() {
        let long = reshape_long(&[], &[Indicator::VendasInternas]);
        assert!(long.is_empty());
    }
}
