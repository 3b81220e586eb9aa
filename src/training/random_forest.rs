//! Random forest classifier

use super::decision_tree::{argmax, DecisionTree};
use crate::error::{PremiumError, Result};
use ndarray::{Array1, Array2, Axis};
use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Per-tree class weighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassWeight {
    /// Every sample weighs 1
    Uniform,
    /// Inverse class frequency, recomputed on each bootstrap sample
    BalancedSubsample,
}

/// Random forest of Gini classification trees.
///
/// Leaves store class distributions; `predict_proba` averages them across
/// trees and `predict` takes the arg-max.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestClassifier {
    trees: Vec<DecisionTree>,
    /// Number of trees
    pub n_estimators: usize,
    /// Maximum depth per tree
    pub max_depth: Option<usize>,
    /// Minimum samples to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf
    pub min_samples_leaf: usize,
    /// Bootstrap sampling
    pub bootstrap: bool,
    pub class_weight: ClassWeight,
    /// Random state
    pub random_state: u64,
    n_features: usize,
    n_classes: usize,
    feature_importances: Option<Array1<f64>>,
}

impl Default for RandomForestClassifier {
    fn default() -> Self {
        Self::new(100)
    }
}

impl RandomForestClassifier {
    pub fn new(n_estimators: usize) -> Self {
        Self {
            trees: Vec::new(),
            n_estimators,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            bootstrap: true,
            class_weight: ClassWeight::Uniform,
            random_state: 42,
            n_features: 0,
            n_classes: 0,
            feature_importances: None,
        }
    }

    pub fn with_max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_min_samples_split(mut self, min_samples: usize) -> Self {
        self.min_samples_split = min_samples;
        self
    }

    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples;
        self
    }

    pub fn with_bootstrap(mut self, bootstrap: bool) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    pub fn with_class_weight(mut self, class_weight: ClassWeight) -> Self {
        self.class_weight = class_weight;
        self
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    /// Features considered per split: floor of the square root, at least one
    fn compute_max_features(n_features: usize) -> usize {
        ((n_features as f64).sqrt().floor() as usize).max(1)
    }

    /// Sample weights for one tree: bootstrap multiplicity times class weight
    fn tree_weights(&self, y: &[usize], rng: &mut ChaCha8Rng) -> Vec<f64> {
        let n_samples = y.len();
        let mut weights = if self.bootstrap {
            let mut counts = vec![0.0; n_samples];
            for _ in 0..n_samples {
                counts[rng.gen_range(0..n_samples)] += 1.0;
            }
            counts
        } else {
            vec![1.0; n_samples]
        };

        if self.class_weight == ClassWeight::BalancedSubsample {
            let mut class_totals = vec![0.0; self.n_classes];
            for (i, &w) in weights.iter().enumerate() {
                class_totals[y[i]] += w;
            }
            let present = class_totals.iter().filter(|&&c| c > 0.0).count() as f64;
            let drawn: f64 = class_totals.iter().sum();
            let class_weights: Vec<f64> = class_totals
                .iter()
                .map(|&c| if c > 0.0 { drawn / (present * c) } else { 0.0 })
                .collect();
            for (i, w) in weights.iter_mut().enumerate() {
                *w *= class_weights[y[i]];
            }
        }

        weights
    }

    /// Fit the forest. Labels are class indices in `0..n_classes`.
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<usize>, n_classes: usize) -> Result<&mut Self> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples != y.len() {
            return Err(PremiumError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 || n_features == 0 {
            return Err(PremiumError::TrainingError("cannot fit a forest on an empty matrix".to_string()));
        }
        if self.n_estimators == 0 {
            return Err(PremiumError::ConfigError("n_estimators must be at least 1".to_string()));
        }

        self.n_features = n_features;
        self.n_classes = n_classes;
        let max_features = Self::compute_max_features(n_features);
        let labels: Vec<usize> = y.to_vec();
        let base_seed = self.random_state;

        let trees: Vec<DecisionTree> = (0..self.n_estimators)
            .into_par_iter()
            .map(|tree_idx| -> Result<DecisionTree> {
                let seed = base_seed.wrapping_add(tree_idx as u64);
                let mut rng = ChaCha8Rng::seed_from_u64(seed);
                let weights = self.tree_weights(&labels, &mut rng);

                let mut tree = DecisionTree::new()
                    .with_max_depth(self.max_depth)
                    .with_min_samples_split(self.min_samples_split)
                    .with_min_samples_leaf(self.min_samples_leaf)
                    .with_max_features(Some(max_features));
                tree.fit(x, &labels, Some(&weights), n_classes, rng.next_u64())?;
                Ok(tree)
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            trees = trees.len(),
            max_features,
            mean_depth = trees.iter().map(|t| t.depth()).sum::<usize>() as f64 / trees.len() as f64,
            "random forest fitted"
        );

        self.trees = trees;
        self.compute_feature_importances();
        Ok(self)
    }

    fn compute_feature_importances(&mut self) {
        let mut total_importances = vec![0.0; self.n_features];

        for tree in &self.trees {
            if let Some(imp) = tree.feature_importances() {
                for (i, &val) in imp.iter().enumerate() {
                    total_importances[i] += val;
                }
            }
        }

        let total: f64 = total_importances.iter().sum();
        if total > 0.0 {
            for imp in &mut total_importances {
                *imp /= total;
            }
        }

        self.feature_importances = Some(Array1::from_vec(total_importances));
    }

    /// Average of the leaf distributions reached in every tree
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if self.trees.is_empty() {
            return Err(PremiumError::ModelNotFitted);
        }
        if x.ncols() != self.n_features {
            return Err(PremiumError::ShapeError {
                expected: format!("{} features", self.n_features),
                actual: format!("{} features", x.ncols()),
            });
        }

        let n_trees = self.trees.len() as f64;
        let rows: Vec<Vec<f64>> = (0..x.nrows())
            .into_par_iter()
            .map(|i| -> Result<Vec<f64>> {
                let row = x.row(i);
                let mut acc = vec![0.0; self.n_classes];
                for tree in &self.trees {
                    for (a, p) in acc.iter_mut().zip(tree.predict_proba_row(row)?) {
                        *a += p;
                    }
                }
                Ok(acc.into_iter().map(|a| a / n_trees).collect())
            })
            .collect::<Result<Vec<_>>>()?;

        let flat: Vec<f64> = rows.into_iter().flatten().collect();
        Ok(Array2::from_shape_vec((x.nrows(), self.n_classes), flat)?)
    }

    /// Arg-max of `predict_proba`; ties go to the lowest class index
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<usize>> {
        let proba = self.predict_proba(x)?;
        Ok(proba.axis_iter(Axis(0)).map(argmax).collect())
    }

    pub fn feature_importances(&self) -> Option<&Array1<f64>> {
        self.feature_importances.as_ref()
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn is_fitted(&self) -> bool {
        !self.trees.is_empty()
    }
}
