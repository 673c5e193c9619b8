//! Category classification
//!
//! Descriptions are vectorized into term counts and classified by a
//! seeded random forest, so identical training data always yields the same
//! model.

use serde::{Deserialize, Serialize};
use smartcore::ensemble::random_forest_classifier::{
    RandomForestClassifier, RandomForestClassifierParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

use crate::error::IntakeError;
use crate::model::CategoryClassifier;
use crate::text::CountVectorizer;

type Forest = RandomForestClassifier<f64, i32, DenseMatrix<f64>, Vec<i32>>;

/// Random forest hyper-parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestParams {
    /// Number of trees in the ensemble
    pub n_trees: u16,
    /// Seed for bootstrap sampling and feature selection
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_trees: 100,
            seed: 42,
        }
    }
}

/// Fitted description classifier
#[derive(Serialize, Deserialize)]
pub struct CategoryModel {
    vectorizer: CountVectorizer,
    classes: Vec<String>,
    forest: Forest,
}

impl CategoryModel {
    /// Fits the vectorizer and forest on labelled descriptions
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::Fit` when inputs are empty or misaligned, when
    /// fewer than two distinct labels are present, when every description
    /// is made of stop words, or when the forest itself fails to fit.
    pub fn fit(
        texts: &[String],
        labels: &[String],
        params: &ForestParams,
    ) -> Result<Self, IntakeError> {
        if texts.len() != labels.len() {
            return Err(IntakeError::fit(format!(
                "{} descriptions but {} labels",
                texts.len(),
                labels.len()
            )));
        }
        if texts.is_empty() {
            return Err(IntakeError::fit("no training rows"));
        }

        let classes: Vec<String> = labels
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if classes.len() < 2 {
            return Err(IntakeError::fit(
                "at least two distinct categories are required",
            ));
        }

        let vectorizer = CountVectorizer::fit(texts);
        if vectorizer.is_empty() {
            return Err(IntakeError::fit(
                "descriptions contain no usable terms after stop-word removal",
            ));
        }

        let x = DenseMatrix::new(
            texts.len(),
            vectorizer.len(),
            vectorizer.transform_batch(texts),
            false,
        );
        let y: Vec<i32> = labels
            .iter()
            .map(|label| encode_label(&classes, label))
            .collect::<Result<_, _>>()?;

        let parameters = RandomForestClassifierParameters::default()
            .with_n_trees(params.n_trees)
            .with_seed(params.seed);
        let forest = RandomForestClassifier::fit(&x, &y, parameters)
            .map_err(|e| IntakeError::fit(format!("random forest: {}", e)))?;

        debug!(
            rows = texts.len(),
            vocabulary = vectorizer.len(),
            categories = classes.len(),
            n_trees = params.n_trees,
            "Category model fitted"
        );

        Ok(Self {
            vectorizer,
            classes,
            forest,
        })
    }

    /// Predicts categories for several descriptions in one forest pass
    pub fn predict_many<S: AsRef<str>>(&self, texts: &[S]) -> Result<Vec<String>, IntakeError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let x = DenseMatrix::new(
            texts.len(),
            self.vectorizer.len(),
            self.vectorizer.transform_batch(texts),
            false,
        );
        let encoded = self
            .forest
            .predict(&x)
            .map_err(|e| IntakeError::inference(format!("random forest: {}", e)))?;

        encoded
            .into_iter()
            .map(|code| self.decode_label(code))
            .collect()
    }

    /// Size of the learned vocabulary
    pub fn vocabulary_len(&self) -> usize {
        self.vectorizer.len()
    }

    fn decode_label(&self, code: i32) -> Result<String, IntakeError> {
        usize::try_from(code)
            .ok()
            .and_then(|index| self.classes.get(index))
            .cloned()
            .ok_or_else(|| IntakeError::inference(format!("unknown class index {}", code)))
    }
}

impl CategoryClassifier for CategoryModel {
    fn predict(&self, description: &str) -> Result<String, IntakeError> {
        let mut labels = self.predict_many(&[description])?;
        labels
            .pop()
            .ok_or_else(|| IntakeError::inference("classifier returned no prediction"))
    }

    fn categories(&self) -> &[String] {
        &self.classes
    }
}

impl fmt::Debug for CategoryModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CategoryModel")
            .field("classes", &self.classes)
            .field("vocabulary", &self.vectorizer.len())
            .finish_non_exhaustive()
    }
}

fn encode_label(classes: &[String], label: &str) -> Result<i32, IntakeError> {
    classes
        .binary_search_by(|class| class.as_str().cmp(label))
        .ok()
        .and_then(|index| i32::try_from(index).ok())
        .ok_or_else(|| IntakeError::fit(format!("label '{}' could not be encoded", label)))
}

/// Fits a category model; see [`CategoryModel::fit`]
pub fn fit_category_model(
    texts: &[String],
    labels: &[String],
    params: &ForestParams,
) -> Result<CategoryModel, IntakeError> {
    CategoryModel::fit(texts, labels, params)
}

/// Predicts the category of one description with any fitted classifier
pub fn predict_category(
    model: &dyn CategoryClassifier,
    description: &str,
) -> Result<String, IntakeError> {
    model.predict(description)
}
