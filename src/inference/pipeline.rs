//! The fitted premium pipeline: column transformer, SMOTE, random forest

use crate::error::{PremiumError, Result};
use crate::preprocessing::ColumnTransformer;
use crate::synthetic::{Sampler, SMOTE};
use crate::training::{ClassWeight, RandomForestClassifier, TrainingConfig};
use ndarray::{Array1, Array2};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Preprocessing, resampling and classification in one serializable unit.
///
/// SMOTE only runs inside [`PremiumPipeline::fit`]; prediction goes straight
/// from the column transformer to the forest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PremiumPipeline {
    preprocessor: ColumnTransformer,
    resampler: SMOTE,
    classifier: RandomForestClassifier,
    classes: Vec<String>,
}

impl PremiumPipeline {
    /// Unfitted pipeline configured from training settings
    pub fn new(config: &TrainingConfig) -> Self {
        let classifier = RandomForestClassifier::new(config.n_estimators)
            .with_max_depth(config.max_depth)
            .with_min_samples_split(config.min_samples_split)
            .with_min_samples_leaf(config.min_samples_leaf)
            .with_bootstrap(true)
            .with_class_weight(ClassWeight::BalancedSubsample)
            .with_random_state(config.random_state);

        Self {
            preprocessor: ColumnTransformer::new(),
            resampler: SMOTE::new()
                .with_k_neighbors(config.smote_k_neighbors)
                .with_seed(config.random_state),
            classifier,
            classes: Vec::new(),
        }
    }

    /// Fit on a feature frame and class indices into `classes`.
    /// Returns the number of synthetic rows SMOTE added.
    pub fn fit(&mut self, df: &DataFrame, labels: &[usize], classes: Vec<String>) -> Result<usize> {
        if df.height() != labels.len() {
            return Err(PremiumError::ShapeError {
                expected: format!("{} labels", df.height()),
                actual: format!("{} labels", labels.len()),
            });
        }

        let x = self.preprocessor.fit_transform(df)?;
        let y = Array1::from_vec(labels.to_vec());

        let resampled = self.resampler.fit_resample(&x, &y)?;
        let n_synthetic: usize = resampled.n_synthetic.values().sum();
        debug!(
            rows = x.nrows(),
            synthetic = n_synthetic,
            features = x.ncols(),
            "training matrix resampled"
        );

        self.classifier.fit(&resampled.x, &resampled.y, classes.len())?;
        self.classes = classes;
        Ok(n_synthetic)
    }

    fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        if !self.classifier.is_fitted() {
            return Err(PremiumError::ModelNotFitted);
        }
        self.preprocessor.transform(df)
    }

    /// Class probabilities, columns in [`classes`](Self::classes) order
    pub fn predict_proba(&self, df: &DataFrame) -> Result<Array2<f64>> {
        let x = self.transform(df)?;
        self.classifier.predict_proba(&x)
    }

    pub fn predict_indices(&self, df: &DataFrame) -> Result<Array1<usize>> {
        let x = self.transform(df)?;
        self.classifier.predict(&x)
    }

    /// Predicted class labels
    pub fn predict(&self, df: &DataFrame) -> Result<Vec<String>> {
        self.predict_indices(df)?
            .iter()
            .map(|&i| {
                self.classes.get(i).cloned().ok_or_else(|| {
                    PremiumError::InferenceError(format!("class index {} out of range", i))
                })
            })
            .collect()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn preprocessor(&self) -> &ColumnTransformer {
        &self.preprocessor
    }

    pub fn resampler(&self) -> &SMOTE {
        &self.resampler
    }

    pub fn classifier(&self) -> &RandomForestClassifier {
        &self.classifier
    }

    /// Transformed feature names paired with forest importances, descending
    pub fn feature_importances(&self) -> Vec<(String, f64)> {
        let Some(importances) = self.classifier.feature_importances() else {
            return Vec::new();
        };
        let mut pairs: Vec<(String, f64)> = self
            .preprocessor
            .feature_names()
            .into_iter()
            .zip(importances.iter().copied())
            .collect();
        pairs.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        pairs
    }
}
