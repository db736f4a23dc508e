//! Formatted terminal output for the `summary` subcommand.
//!
//! We keep formatting code in one place so:
//! - the pipeline stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::app::pipeline::RunOutput;
use crate::domain::{Kpis, Record, YearSelection};
use crate::transform::trade_balance;

/// Format the run header: source, row counts, years, selection, filter result.
pub fn format_run_summary(run: &RunOutput, source: &str) -> String {
    let mut out = String::new();

    out.push_str("=== sider — Siderurgia Brasileira (Aço Brasil / MDIC) ===\n");
    out.push_str(&format!("Source: {source}\n"));
    out.push_str(&format!(
        "Rows: read={} used={} ({} row error{})\n",
        run.rows_read,
        run.rows_used,
        run.row_errors,
        if run.row_errors == 1 { "" } else { "s" },
    ));

    match (run.years_available.first(), run.years_available.last()) {
        (Some(first), Some(last)) => {
            out.push_str(&format!("Years available: {first}–{last}\n"));
        }
        _ => out.push_str("Years available: none\n"),
    }

    out.push_str(&format!("Selection: {}\n", format_selection(&run.selection)));

    match (run.filtered.first(), run.filtered.last()) {
        (Some(first), Some(last)) => {
            out.push_str(&format!(
                "Filtered: n={} | {} .. {}\n",
                run.filtered.len(),
                first.date,
                last.date
            ));
        }
        _ => out.push_str("Filtered: n=0\n"),
    }

    out
}

/// Format the KPI block.
///
/// `None` renders an explicit "no data" line, never a zero summary.
pub fn format_kpis(kpis: Option<&Kpis>) -> String {
    let Some(kpis) = kpis else {
        return "KPIs: sem dados para a seleção atual.\n".to_string();
    };

    let mut out = String::new();
    out.push_str("KPIs:\n");
    out.push_str(&format!(
        "- Vendas internas (total): {:>12.1} mil t\n",
        kpis.total_vendas_internas
    ));
    out.push_str(&format!(
        "- Exportações (total):     {:>12.1} mil t\n",
        kpis.total_exportacoes
    ));
    out.push_str(&format!(
        "- Consumo aparente (média mensal): {:>8.1} mil t\n",
        kpis.media_consumo_aparente
    ));
    out
}

/// Format the most recent `last_n` months as a table.
pub fn format_recent_table(filtered: &[Record], last_n: usize) -> String {
    let mut out = String::new();

    let start = filtered.len().saturating_sub(last_n);
    let tail = &filtered[start..];

    out.push_str(&format!("Last {} month(s):\n", tail.len()));
    out.push_str(&format!(
        "{:<10} {:>10} {:>10} {:>10} {:>10} {:>10}\n",
        "date", "vendas", "export", "import", "consumo", "saldo"
    ));
    out.push_str(&format!(
        "{:-<10} {:-<10} {:-<10} {:-<10} {:-<10} {:-<10}\n",
        "", "", "", "", "", ""
    ));

    let balances = trade_balance(tail);
    for (r, balance) in tail.iter().zip(balances) {
        out.push_str(&format!(
            "{:<10} {:>10.1} {:>10.1} {:>10.1} {:>10.1} {:>10.1}\n",
            r.date.to_string(),
            r.vendas_internas,
            r.exportacoes,
            r.importacoes,
            r.consumo_aparente,
            balance,
        ));
    }

    out
}

fn format_selection(selection: &YearSelection) -> String {
    if selection.is_empty() {
        return "all years".to_string();
    }
    let years: Vec<String> = selection.years().map(|y| y.to_string()).collect();
    years.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(y: i32, m: u32) -> Record {
        Record {
            date: NaiveDate::from_ymd_opt(y, m, 1).unwrap(),
            vendas_internas: 100.0,
            exportacoes: 80.0,
            importacoes: 30.0,
            consumo_aparente: 130.0,
            saldo_comercial: None,
        }
    }

    #[test]
    fn kpis_none_renders_no_data_line() {
        let text = format_kpis(None);
        assert!(text.contains("sem dados"));
        assert!(!text.contains("0.0"));
    }

    #[test]
    fn kpis_some_renders_all_three_values() {
        let kpis = Kpis {
            total_vendas_internas: 1200.0,
            total_exportacoes: 800.0,
            media_consumo_aparente: 150.5,
        };
        let text = format_kpis(Some(&kpis));
        assert!(text.contains("1200.0"));
        assert!(text.contains("800.0"));
        assert!(text.contains("150.5"));
    }

    #[test]
    fn recent_table_shows_derived_balance() {
        let text = format_recent_table(&[record(2024, 1)], 12);
        assert!(text.contains("2024-01-01"));
        // 80 - 30
        assert!(text.contains("50.0"));
    }

    #[test]
    fn recent_table_clamps_to_available_rows() {
        let records = vec![record(2024, 1), record(2024, 2), record(2024, 3)];
        let text = format_recent_table(&records, 2);
        assert!(!text.contains("2024-01-01"));
        assert!(text.contains("2024-02-01"));
        assert!(text.contains("2024-03-01"));
    }

    #[test]
    fn selection_formats_empty_as_all_years() {
        assert_eq!(format_selection(&YearSelection::default()), "all years");
        assert_eq!(
            format_selection(&YearSelection::new([2024, 2023])),
            "2023, 2024"
        );
    }
}
