use itertools::Itertools;
use log::debug;
use ordered_float::OrderedFloat;
use serde::Serialize;
use std::cmp::Reverse;

use crate::error::{Result, RocError};
use crate::metrics::auc::trapezoidal_auc;

/// Confusion-matrix counts and rates at one decision threshold.
///
/// A sample is predicted positive when its score is `>= threshold`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MetricsRow {
    #[serde(rename = "THRESHOLD")]
    pub threshold: f64,
    #[serde(rename = "TP")]
    pub true_positive: usize,
    #[serde(rename = "FP")]
    pub false_positive: usize,
    #[serde(rename = "FN")]
    pub false_negative: usize,
    #[serde(rename = "TN")]
    pub true_negative: usize,
    #[serde(rename = "FPR")]
    pub false_positive_rate: f64,
    #[serde(rename = "REC")]
    pub recall: f64,
    /// NaN when nothing is predicted positive.
    #[serde(rename = "PREC")]
    pub precision: f64,
}

impl MetricsRow {
    fn new(threshold: f64, tp: usize, fp: usize, positives: usize, negatives: usize) -> Self {
        let precision = if tp + fp == 0 {
            f64::NAN
        } else {
            tp as f64 / (tp + fp) as f64
        };
        Self {
            threshold,
            true_positive: tp,
            false_positive: fp,
            false_negative: positives - tp,
            true_negative: negatives - fp,
            false_positive_rate: fp as f64 / negatives as f64,
            recall: tp as f64 / positives as f64,
            precision,
        }
    }
}

/// Metrics for every distinct threshold, ordered by decreasing threshold.
///
/// The first row is a sentinel above the highest score (nothing predicted
/// positive), the last row predicts everything positive.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsTable {
    positives: usize,
    negatives: usize,
    rows: Vec<MetricsRow>,
}

impl MetricsTable {
    pub fn rows(&self) -> &[MetricsRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Total positive samples (P).
    pub fn positives(&self) -> usize {
        self.positives
    }

    /// Total negative samples (N).
    pub fn negatives(&self) -> usize {
        self.negatives
    }

    pub fn thresholds(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.threshold).collect()
    }

    pub fn false_positive_rates(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.false_positive_rate).collect()
    }

    pub fn recalls(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.recall).collect()
    }

    pub fn precisions(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.precision).collect()
    }

    /// Area under the ROC curve over (FPR, REC).
    pub fn roc_auc(&self) -> f64 {
        trapezoidal_auc(&self.false_positive_rates(), &self.recalls())
    }

    /// Area under the precision-recall curve over (REC, PREC).
    ///
    /// The curve is anchored at (0, 1) in place of the sentinel's undefined
    /// precision; any other NaN precision is skipped.
    pub fn pr_auc(&self) -> f64 {
        let mut precisions = self.precisions();
        if let Some(first) = precisions.first_mut() {
            if first.is_nan() {
                *first = 1.0;
            }
        }
        trapezoidal_auc(&self.recalls(), &precisions)
    }

    /// Drop interior rows that are collinear with their neighbours.
    ///
    /// A sweep row survives when the second difference of its TP or FP count
    /// is non-zero. The sentinel and the first and last sweep rows are always
    /// kept, so the boundary rows survive thinning.
    pub fn drop_intermediate(&self) -> MetricsTable {
        let sweep = &self.rows[1..];
        let last = sweep.len().saturating_sub(1);
        let kept = sweep.iter().enumerate().filter(|&(i, row)| {
            if i == 0 || i == last {
                return true;
            }
            let (prev, next) = (&sweep[i - 1], &sweep[i + 1]);
            let bends = |f: fn(&MetricsRow) -> usize| f(prev) + f(next) != 2 * f(row);
            bends(|r| r.true_positive) || bends(|r| r.false_positive)
        });

        let rows: Vec<MetricsRow> = std::iter::once(self.rows[0])
            .chain(kept.map(|(_, row)| *row))
            .collect();
        debug!("thinned metrics table from {} to {} rows", self.rows.len(), rows.len());

        MetricsTable {
            positives: self.positives,
            negatives: self.negatives,
            rows,
        }
    }
}

fn validate(labels: &[u8], scores: &[f64]) -> Result<(usize, usize)> {
    if labels.len() != scores.len() {
        return Err(RocError::InvalidInput(format!(
            "labels length {} != scores length {}",
            labels.len(),
            scores.len()
        )));
    }
    if labels.is_empty() {
        return Err(RocError::InvalidInput("empty input".into()));
    }
    if let Some((i, label)) = labels.iter().find_position(|&&l| l > 1) {
        return Err(RocError::InvalidInput(format!(
            "label at index {} is {}, expected 0 or 1",
            i, label
        )));
    }
    if let Some((i, score)) = scores.iter().find_position(|s| !s.is_finite()) {
        return Err(RocError::InvalidInput(format!(
            "score at index {} is {}, expected a finite number",
            i, score
        )));
    }

    let positives = labels.iter().filter(|&&l| l == 1).count();
    let negatives = labels.len() - positives;
    if positives == 0 {
        return Err(RocError::InvalidInput("no positive samples".into()));
    }
    if negatives == 0 {
        return Err(RocError::InvalidInput("no negative samples".into()));
    }
    Ok((positives, negatives))
}

// max + 1, or the next representable f64 once +1 is absorbed by rounding
fn sentinel_threshold(max_score: f64) -> f64 {
    let bumped = max_score + 1.0;
    if bumped > max_score {
        return bumped;
    }
    let bits = max_score.to_bits();
    if max_score > 0.0 {
        f64::from_bits(bits + 1)
    } else {
        f64::from_bits(bits - 1)
    }
}

/// Build the threshold sweep table for binary `labels` (0/1) and `scores`.
///
/// Samples sharing a score collapse into a single row. The leading sentinel
/// row sits at `max_score + 1`, or just above `max_score` when the score is
/// too large for `+ 1` to change it.
///
/// # Errors
///
/// Returns [`RocError::InvalidInput`] on mismatched or empty input, labels
/// other than 0/1, NaN or infinite scores, or when only one class is present.
pub fn build_metrics_table(labels: &[u8], scores: &[f64]) -> Result<MetricsTable> {
    let (positives, negatives) = validate(labels, scores)?;

    // stable sort: ties keep input order
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by_key(|&i| Reverse(OrderedFloat(scores[i])));

    let max_score = scores[order[0]];
    let mut rows = Vec::with_capacity(scores.len() + 1);
    rows.push(MetricsRow::new(sentinel_threshold(max_score), 0, 0, positives, negatives));

    let (mut tp, mut fp) = (0usize, 0usize);
    let groups = order.iter().group_by(|&&i| OrderedFloat(scores[i]));
    for (score, group) in &groups {
        for &i in group {
            if labels[i] == 1 {
                tp += 1;
            } else {
                fp += 1;
            }
        }
        rows.push(MetricsRow::new(score.into_inner(), tp, fp, positives, negatives));
    }

    debug!(
        "built metrics table: {} samples ({} pos / {} neg), {} rows",
        labels.len(),
        positives,
        negatives,
        rows.len()
    );

    Ok(MetricsTable {
        positives,
        negatives,
        rows,
    })
}
