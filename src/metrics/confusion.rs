//! Fixed-width confusion-matrix tooltips.
//!
//! Output looks like this (default labels, `\n` line break):
//!
//! ```text
//! PRECISION: 0.750
//! RECALL   : 0.750
//!
//!           | Actual  |
//!           |POS |NEG |
//!       ----+----+----+
//!       POS | 3  | 1  |
//! PRED  ----+----+----+
//!       NEG | 1  | 3  |
//!       ----+----+----+
//! ```
//!
//! The grid is meant for a monospace hover font: every `|` and `+` sits at
//! the same column on each grid line, whatever the label and count widths.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::TooltipConfig;
use crate::error::{Result, RocError};
use crate::metrics::table::MetricsRow;

const ACTUAL_BANNER: &str = "Actual";
const PRED_MARGIN: &str = "PRED  ";
const BLANK_MARGIN: &str = "      ";

/// Value of an extra tooltip line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Int(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{:.3}", v),
            FieldValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

/// A labelled line printed above precision and recall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraField {
    pub label: String,
    pub value: FieldValue,
}

impl ExtraField {
    pub fn new(label: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

// num / (num + other), widened so large counts cannot overflow;
// a zero denominator displays as 0 rather than NaN
fn ratio(num: i64, other: i64) -> f64 {
    let den = i128::from(num) + i128::from(other);
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

fn grid_lines(counts: [i64; 4], pos_label: &str, neg_label: &str) -> Vec<String> {
    let cells: Vec<String> = counts.iter().map(|c| c.to_string()).collect();
    let label_len = pos_label.chars().count().max(neg_label.chars().count());
    let count_len = cells.iter().map(|c| c.len()).max().unwrap_or(0);

    let row_width = label_len + 1;
    // the banner spans two cells plus the separator between them
    let cell_width = (count_len.max(label_len) + 1).max(ACTUAL_BANNER.len() / 2);

    let row_rule = "-".repeat(row_width);
    let cell_rule = "-".repeat(cell_width);
    let rule = |margin: &str| format!("{}{}+{}+{}+", margin, row_rule, cell_rule, cell_rule);
    let row = |header: &str, left: &str, right: &str| {
        format!(
            "{}{:^rw$}|{:^cw$}|{:^cw$}|",
            BLANK_MARGIN,
            header,
            left,
            right,
            rw = row_width,
            cw = cell_width
        )
    };

    vec![
        format!(
            "{}{:rw$}|{:^span$}|",
            BLANK_MARGIN,
            "",
            ACTUAL_BANNER,
            rw = row_width,
            span = 2 * cell_width + 1
        ),
        row("", pos_label, neg_label),
        rule(BLANK_MARGIN),
        row(pos_label, cells[0].as_str(), cells[1].as_str()),
        rule(PRED_MARGIN),
        row(neg_label, cells[2].as_str(), cells[3].as_str()),
        rule(BLANK_MARGIN),
    ]
}

/// Render precision, recall and the 2x2 confusion matrix as an aligned
/// text block, lines joined by `config.line_break`.
///
/// `extra_fields` are printed first, in order; float values use three
/// decimals. Precision and recall print as `0.000` when undefined.
///
/// # Errors
///
/// Returns [`RocError::InvalidInput`] if any count is negative.
pub fn format_confusion_matrix(
    tp: i64,
    fp: i64,
    fn_: i64,
    tn: i64,
    extra_fields: &[ExtraField],
    config: &TooltipConfig,
) -> Result<String> {
    for (name, count) in [("tp", tp), ("fp", fp), ("fn", fn_), ("tn", tn)] {
        if count < 0 {
            return Err(RocError::InvalidInput(format!(
                "{} must be non-negative, got {}",
                name, count
            )));
        }
    }

    let precision = ratio(tp, fp);
    let recall = ratio(tp, fn_);

    let mut summary: Vec<(String, String)> = extra_fields
        .iter()
        .map(|field| (field.label.clone(), field.value.to_string()))
        .collect();
    summary.push(("PRECISION".to_string(), format!("{:.3}", precision)));
    summary.push(("RECALL".to_string(), format!("{:.3}", recall)));

    let label_width = summary
        .iter()
        .map(|(label, _)| label.chars().count())
        .max()
        .unwrap_or(0);

    let mut lines: Vec<String> = summary
        .iter()
        .map(|(label, value)| format!("{:<w$}: {}", label, value, w = label_width))
        .collect();
    lines.push(String::new());
    lines.extend(grid_lines(
        [tp, fp, fn_, tn],
        &config.pos_label,
        &config.neg_label,
    ));

    Ok(lines.join(&config.line_break))
}

/// Tooltip for one table row, with its threshold as an extra field.
pub fn format_row(row: &MetricsRow, config: &TooltipConfig) -> Result<String> {
    format_confusion_matrix(
        row.true_positive as i64,
        row.false_positive as i64,
        row.false_negative as i64,
        row.true_negative as i64,
        &[ExtraField::new("THRESHOLD", row.threshold)],
        config,
    )
}

#[cfg(test)]
pub(crate) fn separator_columns(line: &str) -> Vec<usize> {
    line.chars()
        .enumerate()
        .filter(|(_, c)| *c == '|' || *c == '+')
        .map(|(i, _)| i)
        .collect()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn grid_separators_line_up(
            neg in "[A-Za-z]{1,12}",
            pos in "[A-Za-z]{1,12}",
            counts in proptest::array::uniform4(0i64..1_000_000),
        ) {
            let config = TooltipConfig {
                neg_label: neg,
                pos_label: pos,
                line_break: "\n".to_string(),
            };
            let out = format_confusion_matrix(counts[0], counts[1], counts[2], counts[3], &[], &config).unwrap();
            let lines: Vec<&str> = out.split('\n').collect();
            prop_assert_eq!(lines.len(), 10);
            let grid = &lines[3..];

            let width = grid[0].chars().count();
            let cols = separator_columns(grid[2]);
            prop_assert_eq!(cols.len(), 3);
            prop_assert_eq!(*cols.last().unwrap(), width - 1);
            prop_assert_eq!(separator_columns(grid[0]), vec![cols[0], cols[2]]);
            for line in &grid[1..] {
                prop_assert_eq!(line.chars().count(), width);
                prop_assert_eq!(separator_columns(line), cols.clone());
            }
        }
    }
}
