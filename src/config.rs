use serde::{Deserialize, Serialize};

/// Display names for the two classes. Affects tooltips only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelNames {
    pub negative: String,
    pub positive: String,
}

impl LabelNames {
    pub fn new(negative: impl Into<String>, positive: impl Into<String>) -> Self {
        Self {
            negative: negative.into(),
            positive: positive.into(),
        }
    }
}

/// Confusion-matrix tooltip options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TooltipConfig {
    pub neg_label: String,
    pub pos_label: String,
    pub line_break: String,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            neg_label: "NEG".to_string(),
            pos_label: "POS".to_string(),
            line_break: "\n".to_string(),
        }
    }
}

impl TooltipConfig {
    /// Default labels with an HTML `<br>` line break, for plotly hover text.
    pub fn html() -> Self {
        Self {
            line_break: "<br>".to_string(),
            ..Self::default()
        }
    }

    pub fn with_labels(mut self, names: &LabelNames) -> Self {
        self.neg_label = names.negative.clone();
        self.pos_label = names.positive.clone();
        self
    }
}

/// Appearance of one curve on a figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveStyle {
    /// Legend prefix, shown as `"<name>; AUC: ..."`.
    pub line_name: Option<String>,
    pub line_color: String,
    pub label_names: Option<LabelNames>,
    /// Figure (width, height) in pixels.
    pub fig_size: (usize, usize),
    pub marker_size: usize,
}

impl Default for CurveStyle {
    fn default() -> Self {
        Self::roc()
    }
}

impl CurveStyle {
    pub fn roc() -> Self {
        Self {
            line_name: None,
            line_color: "steelblue".to_string(),
            label_names: None,
            fig_size: (650, 500),
            marker_size: 6,
        }
    }

    pub fn precision_recall() -> Self {
        Self {
            line_color: "green".to_string(),
            fig_size: (700, 500),
            ..Self::roc()
        }
    }

    pub fn legend_name(&self, auc: f64) -> String {
        match &self.line_name {
            Some(name) if !name.is_empty() => format!("{}; AUC: {:.4}", name, auc),
            _ => format!("AUC: {:.4}", auc),
        }
    }

    /// Hover-text config: HTML line breaks plus the class names, if any.
    pub fn tooltip_config(&self) -> TooltipConfig {
        match &self.label_names {
            Some(names) => TooltipConfig::html().with_labels(names),
            None => TooltipConfig::html(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legend_name_with_and_without_line_name() {
        let mut style = CurveStyle::roc();
        assert_eq!(style.legend_name(0.91234), "AUC: 0.9123");
        style.line_name = Some("logreg".to_string());
        assert_eq!(style.legend_name(1.0), "logreg; AUC: 1.0000");
    }

    #[test]
    fn tooltip_config_uses_label_names() {
        let style = CurveStyle {
            label_names: Some(LabelNames::new("CAT", "DOG")),
            ..CurveStyle::roc()
        };
        let config = style.tooltip_config();
        assert_eq!(config.neg_label, "CAT");
        assert_eq!(config.pos_label, "DOG");
        assert_eq!(config.line_break, "<br>");
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let style: CurveStyle =
            serde_json::from_str(r#"{"line_color": "crimson", "fig_size": [800, 600]}"#).unwrap();
        assert_eq!(style.line_color, "crimson");
        assert_eq!(style.fig_size, (800, 600));
        assert_eq!(style.marker_size, 6);
        assert!(style.line_name.is_none());

        let tooltip: TooltipConfig = serde_json::from_str(r#"{"pos_label": "SPAM"}"#).unwrap();
        assert_eq!(tooltip.pos_label, "SPAM");
        assert_eq!(tooltip.neg_label, "NEG");
    }
}
