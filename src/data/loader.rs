use anyhow::Context;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::Result;
use crate::metrics::table::{build_metrics_table, MetricsTable};

/// One scored sample set: parallel binary labels and scores.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SampleSet {
    #[serde(default)]
    pub name: Option<String>,
    pub labels: Vec<u8>,
    pub scores: Vec<f64>,
}

impl SampleSet {
    pub fn metrics_table(&self) -> Result<MetricsTable> {
        build_metrics_table(&self.labels, &self.scores)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed")
    }
}

// a file holds either one set or a list of them
#[derive(Deserialize)]
#[serde(untagged)]
enum SampleFile {
    Many(Vec<SampleSet>),
    One(SampleSet),
}

impl SampleFile {
    fn into_sets(self) -> Vec<SampleSet> {
        match self {
            SampleFile::Many(sets) => sets,
            SampleFile::One(set) => vec![set],
        }
    }
}

/// Parse sample sets from a JSON string.
pub fn parse_sample_sets(json: &str) -> anyhow::Result<Vec<SampleSet>> {
    let parsed: SampleFile = serde_json::from_str(json)?;
    Ok(parsed.into_sets())
}

/// Load sample sets from a JSON file holding one
/// `{"name", "labels", "scores"}` object or an array of them.
pub fn load_sample_sets(path: impl AsRef<Path>) -> anyhow::Result<Vec<SampleSet>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let parsed: SampleFile = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))?;
    let sets = parsed.into_sets();
    info!("loaded {} sample set(s) from {}", sets.len(), path.display());
    Ok(sets)
}

/// Seeded synthetic scores: uniform noise shifted up by `separation` for
/// positives, then rescaled into [0, 1].
pub fn synthetic_samples(n: usize, separation: f64, seed: u64) -> SampleSet {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut labels = Vec::with_capacity(n);
    let mut scores = Vec::with_capacity(n);

    for _ in 0..n {
        let label = u8::from(rng.gen_bool(0.5));
        let noise: f64 = rng.gen();
        labels.push(label);
        scores.push((noise + separation * label as f64) / (1.0 + separation));
    }

    SampleSet {
        name: Some(format!("synthetic (sep={:.2})", separation)),
        labels,
        scores,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_object() {
        let sets = parse_sample_sets(r#"{"labels": [0, 1], "scores": [0.2, 0.9]}"#).unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].display_name(), "unnamed");
        assert_eq!(sets[0].labels, vec![0, 1]);
    }

    #[test]
    fn parses_array_of_named_sets() {
        let json = r#"[
            {"name": "a", "labels": [0, 1], "scores": [0.2, 0.9]},
            {"name": "b", "labels": [1, 0, 1], "scores": [0.4, 0.3, 0.6]}
        ]"#;
        let sets = parse_sample_sets(json).unwrap();
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[1].display_name(), "b");
        assert_eq!(sets[1].metrics_table().unwrap().positives(), 2);
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(parse_sample_sets(r#"{"labels": [0, 1]}"#).is_err());
        assert!(parse_sample_sets(r#"{"labels": [-1], "scores": [0.1]}"#).is_err());
    }

    #[test]
    fn invalid_labels_surface_on_table_build() {
        let sets = parse_sample_sets(r#"{"labels": [0, 3], "scores": [0.1, 0.2]}"#).unwrap();
        assert!(sets[0].metrics_table().is_err());
    }

    #[test]
    fn loads_from_file() {
        let path = std::env::temp_dir().join(format!("roc_curves_loader_{}.json", std::process::id()));
        std::fs::write(&path, r#"{"name": "f", "labels": [0, 1], "scores": [0.1, 0.7]}"#).unwrap();
        let sets = load_sample_sets(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(sets[0].display_name(), "f");
    }

    #[test]
    fn missing_file_error_names_path() {
        let err = load_sample_sets("/nonexistent/samples.json").unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/samples.json"));
    }

    #[test]
    fn synthetic_is_seeded() {
        let a = synthetic_samples(200, 1.0, 7);
        let b = synthetic_samples(200, 1.0, 7);
        assert_eq!(a.labels, b.labels);
        assert_eq!(a.scores, b.scores);
        assert!(a.scores.iter().all(|s| (0.0..=1.0).contains(s)));
    }

    #[test]
    fn synthetic_separation_beats_chance() {
        let table = synthetic_samples(500, 2.0, 42).metrics_table().unwrap();
        assert!(table.roc_auc() > 0.9);
    }
}
