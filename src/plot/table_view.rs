use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Table};

use crate::metrics::table::MetricsTable;

pub const COLUMNS: [&str; 8] = ["THRESHOLD", "TP", "FP", "FN", "TN", "FPR", "REC", "PREC"];

fn rate_cell(v: f64) -> Cell {
    let text = if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{:.4}", v)
    };
    Cell::new(text).set_alignment(CellAlignment::Right)
}

fn count_cell(v: usize) -> Cell {
    Cell::new(v).set_alignment(CellAlignment::Right)
}

/// Terminal rendering of a metrics table, one line per threshold.
pub fn render_table(table: &MetricsTable) -> Table {
    let mut out = Table::new();
    out.load_preset(UTF8_FULL).set_header(COLUMNS.to_vec());

    for row in table.rows() {
        out.add_row(vec![
            rate_cell(row.threshold),
            count_cell(row.true_positive),
            count_cell(row.false_positive),
            count_cell(row.false_negative),
            count_cell(row.true_negative),
            rate_cell(row.false_positive_rate),
            rate_cell(row.recall),
            rate_cell(row.precision),
        ]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::table::build_metrics_table;

    #[test]
    fn renders_header_and_rows() {
        let table = build_metrics_table(&[0, 0, 1, 1], &[0.1, 0.4, 0.35, 0.8]).unwrap();
        let text = render_table(&table).to_string();
        for col in COLUMNS {
            assert!(text.contains(col), "missing column {}", col);
        }
        assert!(text.contains("1.8000"));
        assert!(text.contains("0.5000"));
        // the sentinel's undefined precision is shown, not hidden
        assert!(text.contains("NaN"));
    }
}
