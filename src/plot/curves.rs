use log::info;
use plotly::common::{DashType, Font, HoverInfo, Label, Line, Marker, Mode, Title};
use plotly::layout::{Axis, Layout};
use plotly::{Plot, Scatter};

use crate::config::CurveStyle;
use crate::error::Result;
use crate::metrics::confusion::format_row;
use crate::metrics::table::MetricsTable;

// monospace so the tooltip grid lines up
const HOVER_FONT_FAMILY: &str = "Courier New, monospace";

fn tooltips(table: &MetricsTable, style: &CurveStyle) -> Result<Vec<String>> {
    let config = style.tooltip_config();
    table.rows().iter().map(|row| format_row(row, &config)).collect()
}

fn series_trace(
    xs: Vec<f64>,
    ys: Vec<f64>,
    hover: Vec<String>,
    name: &str,
    style: &CurveStyle,
) -> Box<Scatter<f64, f64>> {
    Scatter::new(xs, ys)
        .mode(Mode::LinesMarkers)
        .name(name)
        .hover_text_array(hover)
        .hover_info(HoverInfo::Text)
        .hover_label(Label::new().font(Font::new().family(HOVER_FONT_FAMILY)))
        .marker(
            Marker::new()
                .color(style.line_color.clone())
                .size(style.marker_size),
        )
        .line(Line::new().color(style.line_color.clone()))
        .show_legend(true)
}

fn reference_diagonal() -> Box<Scatter<f64, f64>> {
    Scatter::new(vec![0.0, 1.0], vec![0.0, 1.0])
        .mode(Mode::Lines)
        .line(Line::new().color("black".to_string()).dash(DashType::Dash))
        .hover_info(HoverInfo::Skip)
        .show_legend(false)
}

fn curve_layout(title: &str, x_title: &str, y_title: &str, style: &CurveStyle) -> Layout {
    let (width, height) = style.fig_size;
    Layout::new()
        .title(Title::new(title))
        .x_axis(Axis::new().title(Title::new(x_title)))
        .y_axis(Axis::new().title(Title::new(y_title)))
        .auto_size(false)
        .width(width)
        .height(height)
}

/// Add a ROC curve (FPR vs recall) for `table` to `fig`, or to a new figure.
///
/// A new figure also gets the dashed chance diagonal; passing an existing
/// figure overlays the curve without adding another diagonal.
pub fn roc_curve(table: &MetricsTable, fig: Option<Plot>, style: &CurveStyle) -> Result<Plot> {
    let hover = tooltips(table, style)?;
    let auc = table.roc_auc();
    let name = style.legend_name(auc);
    info!("adding ROC trace '{}' ({} points)", name, table.len());

    let mut plot = fig.unwrap_or_else(|| {
        let mut plot = Plot::new();
        plot.add_trace(reference_diagonal());
        plot
    });
    plot.add_trace(series_trace(
        table.false_positive_rates(),
        table.recalls(),
        hover,
        &name,
        style,
    ));
    plot.set_layout(curve_layout(
        "ROC Curve",
        "False Positive Rate",
        "True Positive Rate",
        style,
    ));
    Ok(plot)
}

/// Add a precision-recall curve for `table` to `fig`, or to a new figure.
///
/// The sentinel row has undefined precision and is left as a gap.
pub fn precision_recall_curve(
    table: &MetricsTable,
    fig: Option<Plot>,
    style: &CurveStyle,
) -> Result<Plot> {
    let hover = tooltips(table, style)?;
    let auc = table.pr_auc();
    let name = style.legend_name(auc);
    info!("adding precision-recall trace '{}' ({} points)", name, table.len());

    let mut plot = fig.unwrap_or_else(Plot::new);
    plot.add_trace(series_trace(
        table.recalls(),
        table.precisions(),
        hover,
        &name,
        style,
    ));
    plot.set_layout(curve_layout(
        "Precision Recall Curve",
        "Recall",
        "Precision",
        style,
    ));
    Ok(plot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LabelNames;
    use crate::metrics::table::build_metrics_table;

    fn separable() -> MetricsTable {
        build_metrics_table(&[0, 0, 0, 1, 1, 1], &[0.1, 0.2, 0.3, 0.7, 0.8, 0.9]).unwrap()
    }

    #[test]
    fn roc_legend_and_tooltips() {
        let style = CurveStyle {
            line_name: Some("model".to_string()),
            ..CurveStyle::roc()
        };
        let json = roc_curve(&separable(), None, &style).unwrap().to_json();
        assert!(json.contains("model; AUC: 1.0000"));
        assert!(json.contains("PRECISION: 1.000<br>RECALL   : 1.000"));
        assert!(json.contains("Courier New, monospace"));
        assert!(json.contains("ROC Curve"));
        assert!(json.contains("steelblue"));
    }

    #[test]
    fn roc_overlay_adds_single_diagonal() {
        let table = separable();
        let first = roc_curve(&table, None, &CurveStyle::roc()).unwrap();
        let once = first.to_json().matches("\"dash\"").count();
        assert!(once >= 1);

        let overlay = roc_curve(&table, Some(first), &CurveStyle::roc()).unwrap();
        let json = overlay.to_json();
        assert_eq!(json.matches("\"dash\"").count(), once);
        assert_eq!(json.matches("AUC: 1.0000").count(), 2);
    }

    #[test]
    fn tooltips_use_label_names() {
        let style = CurveStyle {
            label_names: Some(LabelNames::new("CAT", "DOG")),
            ..CurveStyle::precision_recall()
        };
        let json = precision_recall_curve(&separable(), None, &style)
            .unwrap()
            .to_json();
        assert!(json.contains("DOG"));
        assert!(json.contains("CAT"));
        assert!(json.contains("Precision Recall Curve"));
        assert!(!json.contains("\"dash\""));
    }

    #[test]
    fn one_tooltip_per_row() {
        let table = separable();
        let hover = tooltips(&table, &CurveStyle::roc()).unwrap();
        assert_eq!(hover.len(), table.len());
        assert!(hover.iter().all(|h| h.starts_with("THRESHOLD: ")));
    }
}
