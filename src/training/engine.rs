//! Training engine: CSV in, fitted pipeline and evaluation out

use super::metrics::EvaluationSummary;
use super::split::stratified_split;
use super::TrainingConfig;
use crate::error::{PremiumError, Result};
use crate::inference::{ModelArtifact, PremiumPipeline};
use crate::preprocessing::detect_column_kinds;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

const MEDICATION_COLUMN: &str = "current_medications";
const INFER_SCHEMA_ROWS: usize = 10_000;

/// Unique values observed in one column, for the pre-training printout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub name: String,
    pub dtype: String,
    pub n_unique: usize,
    /// First unique values in order of appearance
    pub values: Vec<String>,
}

/// Outcome of a training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingReport {
    pub classes: Vec<String>,
    pub numeric_columns: Vec<String>,
    pub categorical_columns: Vec<String>,
    pub n_rows: usize,
    pub n_synthetic: usize,
    pub evaluation: EvaluationSummary,
    /// Transformed feature name and importance, most important first
    pub feature_importances: Vec<(String, f64)>,
    pub training_time_secs: f64,
}

/// Main training engine
#[derive(Debug, Clone)]
pub struct TrainEngine {
    config: TrainingConfig,
}

impl TrainEngine {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Read a CSV with header, inferring the schema from the first rows,
    /// and normalize its column names.
    pub fn load_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
        let path = path.as_ref();
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .map_err(|e| PremiumError::DataError(format!("{}: {}", path.display(), e)))?
            .finish()
            .map_err(|e| PremiumError::DataError(format!("{}: {}", path.display(), e)))?;

        info!(path = %path.display(), rows = df.height(), columns = df.width(), "dataset loaded");
        Self::normalize_columns(df)
    }

    /// Trim, lowercase and replace spaces with underscores in every header
    pub fn normalize_columns(mut df: DataFrame) -> Result<DataFrame> {
        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|n| normalize_name(n.as_str()))
            .collect();

        let unique: BTreeSet<&String> = names.iter().collect();
        if unique.len() != names.len() {
            return Err(PremiumError::ConfigError(
                "column names collide after normalization".to_string(),
            ));
        }

        df.set_column_names(names)?;
        Ok(df)
    }

    /// Map a text Yes/No medication column to integer 1/0
    pub fn normalize_medication(mut df: DataFrame) -> Result<DataFrame> {
        let Ok(column) = df.column(MEDICATION_COLUMN) else {
            return Ok(df);
        };
        if column.dtype() != &DataType::String {
            return Ok(df);
        }

        let ca = column.as_materialized_series().str()?;
        let values: Vec<Option<i64>> = ca
            .into_iter()
            .map(|v| match v {
                Some("Yes") => Ok(Some(1)),
                Some("No") => Ok(Some(0)),
                None => Ok(None),
                Some(other) => Err(PremiumError::ConversionError {
                    column: MEDICATION_COLUMN.to_string(),
                    reason: format!("expected Yes or No, got '{}'", other),
                }),
            })
            .collect::<Result<_>>()?;

        let series = Series::new(MEDICATION_COLUMN.into(), values);
        df.with_column(series)?;
        Ok(df)
    }

    /// Unique values per column, truncated to `limit` values each
    pub fn column_summary(df: &DataFrame, limit: usize) -> Result<Vec<ColumnSummary>> {
        df.get_columns()
            .iter()
            .map(|col| {
                let unique = col.as_materialized_series().unique_stable()?;
                let text = unique.cast(&DataType::String)?;
                let values = text
                    .str()?
                    .into_iter()
                    .take(limit)
                    .map(|v| v.unwrap_or("null").to_string())
                    .collect();
                Ok(ColumnSummary {
                    name: col.name().to_string(),
                    dtype: col.dtype().to_string(),
                    n_unique: unique.len(),
                    values,
                })
            })
            .collect()
    }

    /// Split the target off the frame and encode it over the sorted label set
    fn encode_target(&self, df: &DataFrame) -> Result<(DataFrame, Vec<usize>, Vec<String>)> {
        let target = &self.config.target_column;
        let column = df.column(target).map_err(|_| {
            PremiumError::ConfigError(format!("target column '{}' not found in dataset", target))
        })?;

        let text = column.as_materialized_series().cast(&DataType::String)?;
        let raw: Vec<String> = text
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, v)| {
                v.map(str::to_string).ok_or_else(|| {
                    PremiumError::DataError(format!("missing target value in row {}", row))
                })
            })
            .collect::<Result<_>>()?;

        let classes: Vec<String> = raw.iter().cloned().collect::<BTreeSet<_>>().into_iter().collect();
        if classes.len() < 2 {
            return Err(PremiumError::DataError(format!(
                "need at least 2 target classes, found {}",
                classes.len()
            )));
        }

        let labels = raw
            .iter()
            .map(|v| classes.binary_search(v).unwrap_or_default())
            .collect();
        let features = df.drop(target)?;
        Ok((features, labels, classes))
    }

    fn take_rows(df: &DataFrame, rows: &[usize]) -> Result<DataFrame> {
        let idx: Vec<IdxSize> = rows.iter().map(|&i| i as IdxSize).collect();
        Ok(df.take(&IdxCa::from_vec("idx".into(), idx))?)
    }

    /// Fit a pipeline on an already loaded frame and evaluate it on the
    /// held-out split.
    pub fn fit(&self, df: &DataFrame) -> Result<(PremiumPipeline, TrainingReport)> {
        let start = Instant::now();
        self.config.validate()?;

        let df = Self::normalize_medication(df.clone())?;
        let (features, labels, classes) = self.encode_target(&df)?;
        let (numeric, categorical) = detect_column_kinds(&features)?;

        let split = stratified_split(&labels, self.config.test_size, self.config.random_state)?;
        let x_train = Self::take_rows(&features, &split.train)?;
        let x_test = Self::take_rows(&features, &split.test)?;
        let y_train: Vec<usize> = split.train.iter().map(|&i| labels[i]).collect();
        let y_test: Vec<usize> = split.test.iter().map(|&i| labels[i]).collect();

        info!(
            train = y_train.len(),
            test = y_test.len(),
            classes = ?classes,
            numeric = numeric.len(),
            categorical = categorical.len(),
            "fitting pipeline"
        );

        let mut pipeline = PremiumPipeline::new(&self.config);
        let n_synthetic = pipeline.fit(&x_train, &y_train, classes.clone())?;

        let y_pred = pipeline.predict_indices(&x_test)?.to_vec();
        let evaluation = EvaluationSummary::compute(&y_test, &y_pred, &classes, y_train.len())?;
        if evaluation.n_test == 0 {
            warn!("evaluation split is empty");
        }

        let report = TrainingReport {
            classes,
            numeric_columns: numeric,
            categorical_columns: categorical,
            n_rows: df.height(),
            n_synthetic,
            feature_importances: pipeline.feature_importances(),
            training_time_secs: start.elapsed().as_secs_f64(),
            evaluation,
        };

        info!(
            accuracy = report.evaluation.accuracy,
            f1_macro = report.evaluation.f1_macro,
            secs = report.training_time_secs,
            "training complete"
        );

        Ok((pipeline, report))
    }

    /// Load, fit, evaluate and persist in one call
    pub fn run(&self, data: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<TrainingReport> {
        let df = Self::load_csv(data)?;
        let (pipeline, report) = self.fit(&df)?;
        ModelArtifact::new(pipeline, report.evaluation.clone()).save(output.as_ref())?;
        info!(path = %output.as_ref().display(), "model artifact saved");
        Ok(report)
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}
