//! Training configuration

use crate::error::{PremiumError, Result};
use crate::schema::TARGET_COLUMN;
use serde::{Deserialize, Serialize};

/// Configuration for fitting the premium pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Target column name, after header normalization
    pub target_column: String,

    /// Fraction of rows held out for evaluation
    pub test_size: f64,

    /// Random seed for the split, SMOTE and the forest
    pub random_state: u64,

    // Forest parameters
    /// Number of trees
    pub n_estimators: usize,

    /// Maximum depth of trees
    pub max_depth: Option<usize>,

    /// Minimum samples to split a node
    pub min_samples_split: usize,

    /// Minimum samples per leaf
    pub min_samples_leaf: usize,

    /// Neighbors used by SMOTE
    pub smote_k_neighbors: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            target_column: TARGET_COLUMN.to_string(),
            test_size: 0.2,
            random_state: 42,
            n_estimators: 300,
            max_depth: Some(20),
            min_samples_split: 3,
            min_samples_leaf: 2,
            smote_k_neighbors: 5,
        }
    }
}

impl TrainingConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target_column = target.into();
        self
    }

    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    pub fn with_n_estimators(mut self, n: usize) -> Self {
        self.n_estimators = n;
        self
    }

    pub fn with_max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_min_samples_split(mut self, n: usize) -> Self {
        self.min_samples_split = n;
        self
    }

    pub fn with_min_samples_leaf(mut self, n: usize) -> Self {
        self.min_samples_leaf = n;
        self
    }

    pub fn with_smote_k_neighbors(mut self, k: usize) -> Self {
        self.smote_k_neighbors = k;
        self
    }

    /// Reject settings that cannot produce a model
    pub fn validate(&self) -> Result<()> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(PremiumError::ConfigError(format!(
                "test_size must be in (0, 1), got {}",
                self.test_size
            )));
        }
        if self.n_estimators == 0 {
            return Err(PremiumError::ConfigError("n_estimators must be at least 1".to_string()));
        }
        if self.min_samples_split < 2 {
            return Err(PremiumError::ConfigError("min_samples_split must be at least 2".to_string()));
        }
        if self.min_samples_leaf == 0 {
            return Err(PremiumError::ConfigError("min_samples_leaf must be at least 1".to_string()));
        }
        if self.smote_k_neighbors == 0 {
            return Err(PremiumError::ConfigError("smote_k_neighbors must be at least 1".to_string()));
        }
        Ok(())
    }
}
