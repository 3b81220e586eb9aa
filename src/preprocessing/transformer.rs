//! Column transformer combining scaling and one-hot encoding

use super::{detect_column_kinds, ColumnKind, OneHotEncoder, StandardScaler};
use crate::error::{PremiumError, Result};
use ndarray::{concatenate, Array2, Axis};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Routes numeric columns through a [`StandardScaler`] and categorical
/// columns through a [`OneHotEncoder`]. Output is the scaled block followed
/// by the one-hot block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnTransformer {
    numeric_columns: Vec<String>,
    categorical_columns: Vec<String>,
    scaler: StandardScaler,
    encoder: OneHotEncoder,
    is_fitted: bool,
}

impl ColumnTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Detect column kinds from the frame dtypes and fit both blocks.
    pub fn fit(&mut self, df: &DataFrame) -> Result<&mut Self> {
        let (numeric, categorical) = detect_column_kinds(df)?;
        if numeric.is_empty() && categorical.is_empty() {
            return Err(PremiumError::PreprocessingError(
                "no feature columns to fit".to_string(),
            ));
        }

        let num_cols: Vec<&str> = numeric.iter().map(|s| s.as_str()).collect();
        let cat_cols: Vec<&str> = categorical.iter().map(|s| s.as_str()).collect();
        self.scaler.fit(df, &num_cols)?;
        self.encoder.fit(df, &cat_cols)?;

        debug!(
            numeric = numeric.len(),
            categorical = categorical.len(),
            outputs = numeric.len() + self.encoder.n_outputs(),
            "column transformer fitted"
        );

        self.numeric_columns = numeric;
        self.categorical_columns = categorical;
        self.is_fitted = true;
        Ok(self)
    }

    /// Check that every fitted column is present with the fitted kind.
    fn check_frame(&self, df: &DataFrame) -> Result<()> {
        let expected = self
            .numeric_columns
            .iter()
            .map(|c| (c, ColumnKind::Numeric))
            .chain(self.categorical_columns.iter().map(|c| (c, ColumnKind::Categorical)));

        for (name, kind) in expected {
            let column = df
                .column(name)
                .map_err(|_| PremiumError::FeatureNotFound(name.clone()))?;
            if ColumnKind::of(column.dtype()) != Some(kind) {
                return Err(PremiumError::ConversionError {
                    column: name.clone(),
                    reason: format!("expected {:?} column, got dtype {}", kind, column.dtype()),
                });
            }
        }
        Ok(())
    }

    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(PremiumError::ModelNotFitted);
        }
        self.check_frame(df)?;

        let numeric = self.scaler.transform(df)?;
        let categorical = self.encoder.transform(df)?;
        Ok(concatenate(Axis(1), &[numeric.view(), categorical.view()])?)
    }

    pub fn fit_transform(&mut self, df: &DataFrame) -> Result<Array2<f64>> {
        self.fit(df)?;
        self.transform(df)
    }

    /// Names of the output features, numeric first
    pub fn feature_names(&self) -> Vec<String> {
        self.numeric_columns
            .iter()
            .cloned()
            .chain(self.encoder.feature_names())
            .collect()
    }

    pub fn n_features_out(&self) -> usize {
        self.numeric_columns.len() + self.encoder.n_outputs()
    }

    pub fn numeric_columns(&self) -> &[String] {
        &self.numeric_columns
    }

    pub fn categorical_columns(&self) -> &[String] {
        &self.categorical_columns
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn encoder(&self) -> &OneHotEncoder {
        &self.encoder
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }
}
