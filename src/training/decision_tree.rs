//! Decision tree classifier with weighted Gini impurity

use crate::error::{PremiumError, Result};
use ndarray::{Array1, Array2, ArrayView1};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Decision tree node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TreeNode {
    /// Leaf node holding the weighted class distribution
    Leaf {
        distribution: Vec<f64>,
        n_samples: usize,
    },
    /// Internal node with split; rows with `x <= threshold` go left
    Split {
        feature_idx: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
        n_samples: usize,
        impurity: f64,
    },
}

/// Best split found at a node
struct SplitCandidate {
    feature_idx: usize,
    threshold: f64,
    /// Weighted child impurity, W_left * gini_left + W_right * gini_right
    children_impurity: f64,
}

/// Gini impurity of a weighted class histogram
fn gini(counts: &[f64], total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    1.0 - counts.iter().map(|&c| (c / total).powi(2)).sum::<f64>()
}

/// Classification tree. Class labels are indices in `0..n_classes`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    root: Option<TreeNode>,
    /// Maximum depth
    pub max_depth: Option<usize>,
    /// Minimum samples to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf
    pub min_samples_leaf: usize,
    /// Features considered per split (all when `None`)
    pub max_features: Option<usize>,
    n_features: usize,
    n_classes: usize,
    feature_importances: Option<Array1<f64>>,
}

impl Default for DecisionTree {
    fn default() -> Self {
        Self::new()
    }
}

struct BuildContext<'a> {
    x: &'a Array2<f64>,
    y: &'a [usize],
    weights: &'a [f64],
    max_features: usize,
    rng: ChaCha8Rng,
    importances: Vec<f64>,
}

impl DecisionTree {
    pub fn new() -> Self {
        Self {
            root: None,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
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
        self.min_samples_split = min_samples.max(2);
        self
    }

    pub fn with_min_samples_leaf(mut self, min_samples: usize) -> Self {
        self.min_samples_leaf = min_samples.max(1);
        self
    }

    pub fn with_max_features(mut self, max_features: Option<usize>) -> Self {
        self.max_features = max_features;
        self
    }

    /// Fit the tree. Rows with zero weight are left out entirely, which is
    /// how the forest expresses a bootstrap sample.
    pub fn fit(
        &mut self,
        x: &Array2<f64>,
        y: &[usize],
        sample_weight: Option<&[f64]>,
        n_classes: usize,
        seed: u64,
    ) -> Result<&mut Self> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples != y.len() {
            return Err(PremiumError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if let Some(label) = y.iter().find(|&&c| c >= n_classes) {
            return Err(PremiumError::TrainingError(format!(
                "label {} out of range for {} classes",
                label, n_classes
            )));
        }

        let uniform;
        let weights = match sample_weight {
            Some(w) if w.len() == n_samples => w,
            Some(w) => {
                return Err(PremiumError::ShapeError {
                    expected: format!("{} sample weights", n_samples),
                    actual: format!("{} sample weights", w.len()),
                })
            }
            None => {
                uniform = vec![1.0; n_samples];
                &uniform
            }
        };

        let indices: Vec<usize> = (0..n_samples).filter(|&i| weights[i] > 0.0).collect();
        if indices.is_empty() {
            return Err(PremiumError::TrainingError("no samples with positive weight".to_string()));
        }

        self.n_features = n_features;
        self.n_classes = n_classes;

        let mut ctx = BuildContext {
            x,
            y,
            weights,
            max_features: self.max_features.unwrap_or(n_features).clamp(1, n_features.max(1)),
            rng: ChaCha8Rng::seed_from_u64(seed),
            importances: vec![0.0; n_features],
        };

        let mut indices = indices;
        let root = self.build_tree(&mut ctx, &mut indices, 0);
        self.root = Some(root);

        let mut importances = ctx.importances;
        let total: f64 = importances.iter().sum();
        if total > 0.0 {
            for imp in &mut importances {
                *imp /= total;
            }
        }
        self.feature_importances = Some(Array1::from_vec(importances));

        Ok(self)
    }

    fn class_weights(&self, ctx: &BuildContext, indices: &[usize]) -> Vec<f64> {
        let mut counts = vec![0.0; self.n_classes];
        for &i in indices {
            counts[ctx.y[i]] += ctx.weights[i];
        }
        counts
    }

    fn leaf(counts: Vec<f64>, total: f64, n_samples: usize) -> TreeNode {
        let distribution = if total > 0.0 {
            counts.into_iter().map(|c| c / total).collect()
        } else {
            counts
        };
        TreeNode::Leaf { distribution, n_samples }
    }

    fn build_tree(&self, ctx: &mut BuildContext, indices: &mut [usize], depth: usize) -> TreeNode {
        let n_samples = indices.len();
        let counts = self.class_weights(ctx, indices);
        let total: f64 = counts.iter().sum();
        let impurity = gini(&counts, total);

        let should_stop = n_samples < self.min_samples_split
            || n_samples < 2 * self.min_samples_leaf
            || self.max_depth.map_or(false, |d| depth >= d)
            || impurity <= 1e-12;

        if should_stop {
            return Self::leaf(counts, total, n_samples);
        }

        let Some(best) = self.find_best_split(ctx, indices, &counts) else {
            return Self::leaf(counts, total, n_samples);
        };

        let decrease = total * impurity - best.children_impurity;
        if decrease <= 1e-12 {
            return Self::leaf(counts, total, n_samples);
        }
        ctx.importances[best.feature_idx] += decrease;

        // Partition in place: left rows first
        let mut split_at = 0;
        for k in 0..indices.len() {
            if ctx.x[[indices[k], best.feature_idx]] <= best.threshold {
                indices.swap(k, split_at);
                split_at += 1;
            }
        }
        let (left_idx, right_idx) = indices.split_at_mut(split_at);

        let left = Box::new(self.build_tree(ctx, left_idx, depth + 1));
        let right = Box::new(self.build_tree(ctx, right_idx, depth + 1));

        TreeNode::Split {
            feature_idx: best.feature_idx,
            threshold: best.threshold,
            left,
            right,
            n_samples,
            impurity,
        }
    }

    /// Scan randomly ordered features until `max_features` non-constant ones
    /// have been evaluated.
    fn find_best_split(
        &self,
        ctx: &mut BuildContext,
        indices: &[usize],
        parent_counts: &[f64],
    ) -> Option<SplitCandidate> {
        let mut features: Vec<usize> = (0..self.n_features).collect();
        features.shuffle(&mut ctx.rng);

        let mut best: Option<SplitCandidate> = None;
        let mut visited = 0;
        let mut sorted: Vec<usize> = indices.to_vec();

        for feature_idx in features {
            if visited >= ctx.max_features {
                break;
            }

            let x = ctx.x;
            sorted.sort_by(|&a, &b| {
                x[[a, feature_idx]]
                    .partial_cmp(&x[[b, feature_idx]])
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

            let first = x[[sorted[0], feature_idx]];
            let last = x[[sorted[sorted.len() - 1], feature_idx]];
            if last <= first {
                continue;
            }
            visited += 1;

            if let Some(candidate) = self.sweep_feature(ctx, &sorted, feature_idx, parent_counts) {
                let better = best
                    .as_ref()
                    .map_or(true, |b| candidate.children_impurity < b.children_impurity);
                if better {
                    best = Some(candidate);
                }
            }
        }

        best
    }

    /// Evaluate every threshold between consecutive distinct values of one
    /// feature, with rows already sorted by that feature.
    fn sweep_feature(
        &self,
        ctx: &BuildContext,
        sorted: &[usize],
        feature_idx: usize,
        parent_counts: &[f64],
    ) -> Option<SplitCandidate> {
        let n = sorted.len();
        let total: f64 = parent_counts.iter().sum();
        let mut left = vec![0.0; self.n_classes];
        let mut left_total = 0.0;
        let mut best: Option<SplitCandidate> = None;

        for pos in 0..n - 1 {
            let row = sorted[pos];
            let w = ctx.weights[row];
            left[ctx.y[row]] += w;
            left_total += w;

            let value = ctx.x[[row, feature_idx]];
            let next = ctx.x[[sorted[pos + 1], feature_idx]];
            if next <= value {
                continue;
            }

            let n_left = pos + 1;
            if n_left < self.min_samples_leaf || n - n_left < self.min_samples_leaf {
                continue;
            }

            let right: Vec<f64> = parent_counts.iter().zip(&left).map(|(p, l)| p - l).collect();
            let right_total = total - left_total;
            let children = left_total * gini(&left, left_total) + right_total * gini(&right, right_total);

            if best.as_ref().map_or(true, |b| children < b.children_impurity) {
                let mut threshold = (value + next) / 2.0;
                if threshold >= next {
                    threshold = value;
                }
                best = Some(SplitCandidate {
                    feature_idx,
                    threshold,
                    children_impurity: children,
                });
            }
        }

        best
    }

    /// Class distribution of the leaf reached by one row
    pub fn predict_proba_row(&self, row: ArrayView1<f64>) -> Result<&[f64]> {
        let mut node = self.root.as_ref().ok_or(PremiumError::ModelNotFitted)?;
        loop {
            match node {
                TreeNode::Leaf { distribution, .. } => return Ok(distribution),
                TreeNode::Split {
                    feature_idx,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    node = if row[*feature_idx] <= *threshold { left } else { right };
                }
            }
        }
    }

    /// Class probabilities, one row per sample
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.check_features(x)?;
        let mut out = Array2::zeros((x.nrows(), self.n_classes));
        for (i, row) in x.rows().into_iter().enumerate() {
            let dist = self.predict_proba_row(row)?;
            for (j, &p) in dist.iter().enumerate() {
                out[[i, j]] = p;
            }
        }
        Ok(out)
    }

    fn check_features(&self, x: &Array2<f64>) -> Result<()> {
        if self.root.is_none() {
            return Err(PremiumError::ModelNotFitted);
        }
        if x.ncols() != self.n_features {
            return Err(PremiumError::ShapeError {
                expected: format!("{} features", self.n_features),
                actual: format!("{} features", x.ncols()),
            });
        }
        Ok(())
    }

    pub fn feature_importances(&self) -> Option<&Array1<f64>> {
        self.feature_importances.as_ref()
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Depth of the fitted tree (a single leaf has depth 0)
    pub fn depth(&self) -> usize {
        fn node_depth(node: &TreeNode) -> usize {
            match node {
                TreeNode::Leaf { .. } => 0,
                TreeNode::Split { left, right, .. } => 1 + node_depth(left).max(node_depth(right)),
            }
        }
        self.root.as_ref().map_or(0, node_depth)
    }

    pub fn n_leaves(&self) -> usize {
        fn count(node: &TreeNode) -> usize {
            match node {
                TreeNode::Leaf { .. } => 1,
                TreeNode::Split { left, right, .. } => count(left) + count(right),
            }
        }
        self.root.as_ref().map_or(0, count)
    }
}

/// Index of the largest value; the lowest index wins ties
pub fn argmax(values: ArrayView1<f64>) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}
