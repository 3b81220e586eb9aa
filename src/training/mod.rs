//! Model training
//!
//! - Gini decision trees and a bootstrap random forest classifier
//! - Stratified hold-out split
//! - Classification metrics and report
//! - The training engine driving preprocessing, SMOTE and the forest

mod config;
mod engine;
pub mod decision_tree;
pub mod metrics;
pub mod random_forest;
pub mod split;

pub use config::TrainingConfig;
pub use decision_tree::{DecisionTree, TreeNode};
pub use engine::{ColumnSummary, TrainEngine, TrainingReport};
pub use metrics::{ClassScores, ClassificationReport, ConfusionMatrix, EvaluationSummary};
pub use random_forest::{ClassWeight, RandomForestClassifier};
pub use split::{stratified_split, SplitIndices};
