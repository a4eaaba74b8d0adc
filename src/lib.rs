pub mod config;
pub mod error;

pub mod data {
    pub mod loader;
}

pub mod metrics {
    pub mod auc;
    pub mod confusion;
    pub mod table;
}

pub mod plot {
    pub mod curves;
    pub mod table_view;
}

pub use error::{Result, RocError};
pub use metrics::confusion::{format_confusion_matrix, format_row};
pub use metrics::table::{build_metrics_table, MetricsRow, MetricsTable};
