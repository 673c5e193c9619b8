//! Isolation forest anomaly detection over (amount, tenure)
//!
//! Each tree isolates points by recursive random splits on random
//! subsamples. Anomalies are isolated in fewer splits, so their average
//! path length is short.
//!
//! Scores follow the usual isolation forest convention:
//!
//! ```text
//! score_samples(x) = -2 ^ (-E[h(x)] / c(max_samples))
//! offset           = percentile(score_samples(train), 100 * contamination)
//! anomaly_score(x) = score_samples(x) - offset     (< 0 means outlier)
//! ```

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::IntakeError;
use crate::model::{AnomalyDetector, AnomalyVerdict};

/// Number of numeric features: amount and tenure
pub const NUMERIC_FEATURES: usize = 2;

/// One (amount, tenure) observation
pub type NumericRow = [f64; NUMERIC_FEATURES];

const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Isolation forest hyper-parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IsolationParams {
    /// Number of isolation trees
    pub n_estimators: usize,
    /// Upper bound on the subsample drawn for each tree
    pub max_samples: usize,
    /// Expected share of anomalies in the training data, in (0, 0.5]
    pub contamination: f64,
    pub seed: u64,
}

impl Default for IsolationParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_samples: 256,
            contamination: 0.1,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
enum IsolationNode {
    Split {
        feature: usize,
        threshold: f64,
        left: Box<IsolationNode>,
        right: Box<IsolationNode>,
    },
    Leaf {
        size: usize,
    },
}

impl IsolationNode {
    fn path_length(&self, row: &NumericRow) -> f64 {
        let mut node = self;
        let mut depth = 0.0;
        loop {
            match node {
                IsolationNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold { &**left } else { &**right };
                    depth += 1.0;
                }
                IsolationNode::Leaf { size } => return depth + average_path_length(*size),
            }
        }
    }
}

/// Fitted isolation forest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsolationForest {
    trees: Vec<IsolationNode>,
    sample_size: usize,
    offset: f64,
    contamination: f64,
}

impl IsolationForest {
    /// Grows the forest and calibrates the outlier threshold
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::Fit` for empty input, non-finite values or
    /// out-of-range parameters.
    pub fn fit(rows: &[NumericRow], params: &IsolationParams) -> Result<Self, IntakeError> {
        if rows.is_empty() {
            return Err(IntakeError::fit("no numeric rows to fit the anomaly detector"));
        }
        if rows.iter().flatten().any(|value| !value.is_finite()) {
            return Err(IntakeError::fit("numeric features must be finite"));
        }
        if params.n_estimators == 0 || params.max_samples == 0 {
            return Err(IntakeError::fit(
                "n_estimators and max_samples must be positive",
            ));
        }
        if !(params.contamination > 0.0 && params.contamination <= 0.5) {
            return Err(IntakeError::fit(format!(
                "contamination must be in (0, 0.5], got {}",
                params.contamination
            )));
        }

        let sample_size = params.max_samples.min(rows.len());
        let height_limit = (sample_size.max(2) as f64).log2().ceil() as usize;
        let mut rng = StdRng::seed_from_u64(params.seed);

        let trees = (0..params.n_estimators)
            .map(|_| {
                let sample: Vec<NumericRow> = index::sample(&mut rng, rows.len(), sample_size)
                    .into_iter()
                    .map(|i| rows[i])
                    .collect();
                grow(&sample, 0, height_limit, &mut rng)
            })
            .collect();

        let mut forest = Self {
            trees,
            sample_size,
            offset: 0.0,
            contamination: params.contamination,
        };

        let mut training_scores: Vec<f64> =
            rows.iter().map(|row| forest.score_samples(row)).collect();
        forest.offset = percentile(&mut training_scores, 100.0 * params.contamination);

        debug!(
            rows = rows.len(),
            trees = forest.trees.len(),
            sample_size,
            offset = forest.offset,
            "Isolation forest fitted"
        );

        Ok(forest)
    }

    /// Raw score in [-1, 0); more negative is more anomalous
    pub fn score_samples(&self, row: &NumericRow) -> f64 {
        let mean_depth = self
            .trees
            .iter()
            .map(|tree| tree.path_length(row))
            .sum::<f64>()
            / self.trees.len() as f64;
        let normaliser = average_path_length(self.sample_size).max(f64::EPSILON);
        -(2f64).powf(-mean_depth / normaliser)
    }

    /// Score shifted by the contamination threshold; negative means outlier
    pub fn decision_function(&self, row: &NumericRow) -> f64 {
        self.score_samples(row) - self.offset
    }

    pub fn contamination(&self) -> f64 {
        self.contamination
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl AnomalyDetector for IsolationForest {
    fn score(&self, amount: f64, tenure: f64) -> AnomalyVerdict {
        let anomaly_score = self.decision_function(&[amount, tenure]);
        AnomalyVerdict {
            is_outlier: anomaly_score < 0.0,
            anomaly_score,
        }
    }
}

fn grow(sample: &[NumericRow], depth: usize, height_limit: usize, rng: &mut StdRng) -> IsolationNode {
    if depth >= height_limit || sample.len() <= 1 {
        return IsolationNode::Leaf { size: sample.len() };
    }

    let ranges: Vec<(usize, f64, f64)> = (0..NUMERIC_FEATURES)
        .filter_map(|feature| {
            let (min, max) = sample.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), row| {
                (lo.min(row[feature]), hi.max(row[feature]))
            });
            (max > min).then_some((feature, min, max))
        })
        .collect();

    // All remaining points are identical
    if ranges.is_empty() {
        return IsolationNode::Leaf { size: sample.len() };
    }

    let (feature, min, max) = ranges[rng.gen_range(0..ranges.len())];
    let threshold = rng.gen_range(min..max);
    let (left, right): (Vec<NumericRow>, Vec<NumericRow>) =
        sample.iter().copied().partition(|row| row[feature] <= threshold);

    IsolationNode::Split {
        feature,
        threshold,
        left: Box::new(grow(&left, depth + 1, height_limit, rng)),
        right: Box::new(grow(&right, depth + 1, height_limit, rng)),
    }
}

/// Average path length of an unsuccessful BST search over `n` points
fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

/// Linear-interpolated percentile; sorts `values` in place
fn percentile(values: &mut [f64], pct: f64) -> f64 {
    values.sort_by(|a, b| a.total_cmp(b));
    let rank = (pct / 100.0) * (values.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    values[lower] + (values[upper] - values[lower]) * (rank - lower as f64)
}

/// Fits the anomaly detector when numeric rows are available
///
/// `None` means the dataset has no numeric columns and fraud scoring is
/// disabled for the resulting bundle.
pub fn fit_anomaly_model(
    rows: Option<&[NumericRow]>,
    params: &IsolationParams,
) -> Result<Option<IsolationForest>, IntakeError> {
    rows.map(|rows| IsolationForest::fit(rows, params)).transpose()
}

/// Scores a claim's numeric attributes; `None` when no detector is present
pub fn score_claim(
    model: Option<&dyn AnomalyDetector>,
    amount: f64,
    tenure: f64,
) -> Option<AnomalyVerdict> {
    model.map(|detector| detector.score(amount, tenure))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typical_rows() -> Vec<NumericRow> {
        (0..60)
            .map(|i| {
                let amount = 800.0 + (i % 12) as f64 * 45.0;
                let tenure = 3.0 + (i % 7) as f64;
                [amount, tenure]
            })
            .collect()
    }

    /// 54 ordinary claims plus six very large ones from brand-new customers
    fn rows_with_outliers() -> Vec<NumericRow> {
        let mut rows: Vec<NumericRow> = typical_rows().into_iter().take(54).collect();
        rows.extend((0..6).map(|i| [50_000.0 + i as f64 * 8_000.0, 0.0]));
        rows
    }

    #[test]
    fn test_average_path_length_small_values() {
        assert_eq!(average_path_length(1), 0.0);
        assert_eq!(average_path_length(2), 1.0);
        assert!(average_path_length(256) > 9.0);
    }

    #[test]
    fn test_percentile_interpolates() {
        let mut values = vec![4.0, 1.0, 3.0, 2.0];
        assert!((percentile(&mut values, 50.0) - 2.5).abs() < 1e-12);
        assert_eq!(percentile(&mut values, 0.0), 1.0);
        assert_eq!(percentile(&mut values, 100.0), 4.0);
    }

    #[test]
    fn test_extreme_claim_is_outlier() {
        let forest = IsolationForest::fit(&rows_with_outliers(), &IsolationParams::default()).unwrap();
        let verdict = forest.score(80_000.0, 0.0);
        assert!(verdict.is_outlier);
        assert!(verdict.anomaly_score < 0.0);
    }

    #[test]
    fn test_typical_claim_scores_higher_than_extreme() {
        let forest = IsolationForest::fit(&rows_with_outliers(), &IsolationParams::default()).unwrap();
        let typical = forest.score(1_000.0, 5.0);
        let extreme = forest.score(80_000.0, 0.0);
        assert!(typical.anomaly_score > extreme.anomaly_score);
    }

    #[test]
    fn test_contamination_share_flagged_on_training_data() {
        let rows = typical_rows();
        let forest = IsolationForest::fit(&rows, &IsolationParams::default()).unwrap();
        let flagged = rows
            .iter()
            .filter(|row| forest.score(row[0], row[1]).is_outlier)
            .count();
        assert!(flagged <= rows.len() / 10 + 1);
    }

    #[test]
    fn test_fit_is_deterministic_for_seed() {
        let rows = typical_rows();
        let a = IsolationForest::fit(&rows, &IsolationParams::default()).unwrap();
        let b = IsolationForest::fit(&rows, &IsolationParams::default()).unwrap();
        for row in &rows {
            assert_eq!(a.decision_function(row), b.decision_function(row));
        }
    }

    #[test]
    fn test_constant_rows_fit() {
        let rows = vec![[500.0, 2.0]; 20];
        let forest = IsolationForest::fit(&rows, &IsolationParams::default()).unwrap();
        assert_eq!(forest.n_trees(), 100);
        assert!(forest.score(500.0, 2.0).anomaly_score.is_finite());
    }

    #[test]
    fn test_empty_rows_rejected() {
        let err = IsolationForest::fit(&[], &IsolationParams::default()).unwrap_err();
        assert!(matches!(err, IntakeError::Fit(_)));
    }

    #[test]
    fn test_invalid_contamination_rejected() {
        let params = IsolationParams {
            contamination: 0.0,
            ..IsolationParams::default()
        };
        assert!(IsolationForest::fit(&typical_rows(), &params).is_err());
    }

    #[test]
    fn test_absent_model_yields_no_verdict() {
        assert!(fit_anomaly_model(None, &IsolationParams::default()).unwrap().is_none());
        assert!(score_claim(None, 1_000.0, 1.0).is_none());
    }
}
