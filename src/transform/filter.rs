//! Year filtering over the loaded dataset.
//!
//! Filtering never fails: a selected year with no matching rows simply
//! contributes nothing, and an empty selection selects everything.

use chrono::Datelike;

use crate::domain::{Record, YearSelection};

/// How many years the default selection keeps (most recent first).
const DEFAULT_YEAR_COUNT: usize = 3;

/// Distinct calendar years present in the dataset, ascending.
pub fn years_present(records: &[Record]) -> Vec<i32> {
    let mut years: Vec<i32> = records.iter().map(|r| r.date.year()).collect();
    years.sort_unstable();
    years.dedup();
    years
}

/// Default selection policy: the last 3 distinct years present in the
/// dataset, or every year when fewer than 3 exist.
pub fn default_selection(records: &[Record]) -> YearSelection {
    let years = years_present(records);
    let start = years.len().saturating_sub(DEFAULT_YEAR_COUNT);
    YearSelection::new(years[start..].iter().copied())
}

/// Restrict the dataset to the selected years, preserving original order.
///
/// An empty selection returns the full dataset. This is a policy choice
/// carried over from the original page (a cleared multiselect shows
/// everything), not an error.
pub fn filter_by_years(records: &[Record], selection: &YearSelection) -> Vec<Record> {
    if selection.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|r| selection.contains(r.date.year()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(y: i32, m: u32) -> Record {
        Record {
            date: NaiveDate::from_ymd_opt(y, m, 1).unwrap(),
            vendas_internas: 1.0,
            exportacoes: 2.0,
            importacoes: 3.0,
            consumo_aparente: 4.0,
            saldo_comercial: None,
        }
    }

    #[test]
    fn empty_selection_returns_full_dataset() {
        let records = vec![record(2022, 1), record(2023, 1), record(2024, 1)];
        let filtered = filter_by_years(&records, &YearSelection::default());
        assert_eq!(filtered, records);
    }

    #[test]
    fn filtered_length_matches_manual_count() {
        let records = vec![
            record(2022, 1),
            record(2022, 7),
            record(2023, 1),
            record(2024, 3),
        ];
        let selection = YearSelection::new([2022, 2024]);
        let filtered = filter_by_years(&records, &selection);

        let expected = records
            .iter()
            .filter(|r| selection.contains(r.date.year()))
            .count();
        assert_eq!(filtered.len(), expected);
        assert_eq!(filtered.len(), 3);
    }

    #[test]
    fn out_of_range_year_matches_nothing() {
        let records = vec![record(2022, 1), record(2024, 1)];
        let filtered = filter_by_years(&records, &YearSelection::new([2023]));
        assert!(filtered.is_empty());
    }

    #[test]
    fn order_is_preserved() {
        let records = vec![record(2023, 1), record(2023, 2), record(2023, 3)];
        let filtered = filter_by_years(&records, &YearSelection::new([2023]));
        let dates: Vec<_> = filtered.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![records[0].date, records[1].date, records[2].date]);
    }

    #[test]
    fn default_selection_keeps_last_three_years() {
        let records = vec![
            record(2020, 1),
            record(2021, 1),
            record(2022, 1),
            record(2023, 1),
            record(2024, 6),
        ];
        let sel = default_selection(&records);
        assert_eq!(sel.years().collect::<Vec<_>>(), vec![2022, 2023, 2024]);
    }

    #[test]
    fn default_selection_with_few_years_keeps_all() {
        let records = vec![record(2024, 1), record(2025, 1)];
        let sel = default_selection(&records);
        assert_eq!(sel.years().collect::<Vec<_>>(), vec![2024, 2025]);
    }

    #[test]
    fn years_present_is_sorted_and_distinct() {
        let records = vec![record(2024, 1), record(2022, 1), record(2024, 2)];
        assert_eq!(years_present(&records), vec![2022, 2024]);
    }
}
