use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use log::info;
use plotly::Plot;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

use roc_curves::config::{CurveStyle, TooltipConfig};
use roc_curves::data::loader::{load_sample_sets, synthetic_samples, SampleSet};
use roc_curves::metrics::confusion::format_confusion_matrix;
use roc_curves::metrics::table::MetricsTable;
use roc_curves::plot::curves::{precision_recall_curve, roc_curve};
use roc_curves::plot::table_view::render_table;

// overlay colours, cycled when a file holds several sample sets
const PALETTE: [&str; 8] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
];

#[derive(Parser)]
#[command(name = "roc_curves")]
#[command(about = "Threshold metrics tables and interactive ROC / precision-recall curves")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the per-threshold metrics table
    Table {
        /// JSON file with {"labels", "scores"} (or an array of them)
        input: PathBuf,

        /// Emit JSON instead of a text table
        #[arg(long)]
        json: bool,

        /// Drop collinear intermediate thresholds
        #[arg(long)]
        thin: bool,
    },

    /// Write an interactive ROC curve as HTML
    Roc {
        input: PathBuf,

        #[arg(short, long, default_value = "roc.html")]
        output: PathBuf,

        /// JSON curve style (line_name, line_color, label_names, fig_size)
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        thin: bool,
    },

    /// Write an interactive precision-recall curve as HTML
    Pr {
        input: PathBuf,

        #[arg(short, long, default_value = "precision_recall.html")]
        output: PathBuf,

        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        thin: bool,
    },

    /// Print a confusion-matrix tooltip for the given counts
    Tooltip {
        #[arg(long)]
        tp: i64,
        #[arg(long)]
        fp: i64,
        #[arg(long = "fn")]
        false_negative: i64,
        #[arg(long)]
        tn: i64,
        #[arg(long, default_value = "NEG")]
        neg_label: String,
        #[arg(long, default_value = "POS")]
        pos_label: String,
    },

    /// Plot ROC curves for seeded synthetic scores
    Demo {
        #[arg(short, long, default_value = "demo_roc.html")]
        output: PathBuf,

        /// Samples per synthetic set
        #[arg(short, long, default_value = "500")]
        n: usize,

        #[arg(long, default_value = "42")]
        seed: u64,
    },
}

#[derive(Clone, Copy)]
enum CurveKind {
    Roc,
    PrecisionRecall,
}

fn build_tables(
    sets: &[SampleSet],
    thin: bool,
) -> anyhow::Result<Vec<(Option<String>, MetricsTable)>> {
    sets.par_iter()
        .map(|set| {
            let table = set
                .metrics_table()
                .with_context(|| format!("sample set '{}'", set.display_name()))?;
            let table = if thin { table.drop_intermediate() } else { table };
            Ok((set.name.clone(), table))
        })
        .collect()
}

fn load_style(path: Option<&Path>, kind: CurveKind) -> anyhow::Result<CurveStyle> {
    match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading style {}", path.display()))?;
            let style = serde_json::from_str(&raw)
                .with_context(|| format!("parsing style {}", path.display()))?;
            Ok(style)
        }
        None => Ok(match kind {
            CurveKind::Roc => CurveStyle::roc(),
            CurveKind::PrecisionRecall => CurveStyle::precision_recall(),
        }),
    }
}

fn plot_tables(
    tables: &[(Option<String>, MetricsTable)],
    kind: CurveKind,
    base: &CurveStyle,
) -> anyhow::Result<Plot> {
    let mut fig: Option<Plot> = None;
    for (i, (name, table)) in tables.iter().enumerate() {
        let mut style = base.clone();
        if name.is_some() {
            style.line_name = name.clone();
        }
        if tables.len() > 1 {
            style.line_color = PALETTE[i % PALETTE.len()].to_string();
        }
        let plot = match kind {
            CurveKind::Roc => roc_curve(table, fig.take(), &style)?,
            CurveKind::PrecisionRecall => precision_recall_curve(table, fig.take(), &style)?,
        };
        fig = Some(plot);
    }
    match fig {
        Some(plot) => Ok(plot),
        None => bail!("no sample sets to plot"),
    }
}

fn run_curve(
    input: &Path,
    output: &Path,
    config: Option<&Path>,
    thin: bool,
    kind: CurveKind,
) -> anyhow::Result<()> {
    let sets = load_sample_sets(input)?;
    let tables = build_tables(&sets, thin)?;
    let style = load_style(config, kind)?;
    let plot = plot_tables(&tables, kind, &style)?;
    plot.write_html(output);
    println!("Wrote {}", output.display());
    Ok(())
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Table { input, json, thin } => {
            let sets = load_sample_sets(&input)?;
            let tables = build_tables(&sets, thin)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tables)?);
            } else {
                for (name, table) in &tables {
                    println!(
                        "{} | P={} N={} | ROC AUC={:.4} | PR AUC={:.4}",
                        name.as_deref().unwrap_or("unnamed"),
                        table.positives(),
                        table.negatives(),
                        table.roc_auc(),
                        table.pr_auc()
                    );
                    println!("{}", render_table(table));
                }
            }
        }
        Commands::Roc { input, output, config, thin } => {
            run_curve(&input, &output, config.as_deref(), thin, CurveKind::Roc)?;
        }
        Commands::Pr { input, output, config, thin } => {
            run_curve(&input, &output, config.as_deref(), thin, CurveKind::PrecisionRecall)?;
        }
        Commands::Tooltip { tp, fp, false_negative, tn, neg_label, pos_label } => {
            let config = TooltipConfig {
                neg_label,
                pos_label,
                ..TooltipConfig::default()
            };
            println!("{}", format_confusion_matrix(tp, fp, false_negative, tn, &[], &config)?);
        }
        Commands::Demo { output, n, seed } => {
            let sets: Vec<SampleSet> = [0.25, 0.75, 2.0]
                .iter()
                .enumerate()
                .map(|(i, &sep)| synthetic_samples(n, sep, seed + i as u64))
                .collect();
            info!("generated {} synthetic sets of {} samples", sets.len(), n);
            let tables = build_tables(&sets, true)?;
            let plot = plot_tables(&tables, CurveKind::Roc, &CurveStyle::roc())?;
            plot.write_html(&output);
            println!("Wrote {}", output.display());
        }
    }

    Ok(())
}
