//! Standard scaling of numeric columns

use super::numeric_values;
use crate::error::{PremiumError, Result};
use ndarray::Array2;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Fitted parameters for one column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ScalerParams {
    center: f64, // mean
    scale: f64,  // population std, 1 when the column is constant
}

/// Z-score scaler: (x - mean) / std
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StandardScaler {
    params: Vec<(String, ScalerParams)>,
    is_fitted: bool,
}

impl StandardScaler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit the scaler to the given columns
    pub fn fit(&mut self, df: &DataFrame, columns: &[&str]) -> Result<&mut Self> {
        self.params.clear();
        for col_name in columns {
            let values = numeric_values(df, col_name)?;
            self.params.push((col_name.to_string(), Self::compute_params(&values)));
        }
        self.is_fitted = true;
        Ok(self)
    }

    fn compute_params(values: &[f64]) -> ScalerParams {
        if values.is_empty() {
            return ScalerParams { center: 0.0, scale: 1.0 };
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        let std = var.sqrt();
        ScalerParams {
            center: mean,
            scale: if std == 0.0 { 1.0 } else { std },
        }
    }

    /// Scale the fitted columns into a dense block, one column per fitted
    /// column in fit order.
    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(PremiumError::ModelNotFitted);
        }

        let mut out = Array2::zeros((df.height(), self.params.len()));
        for (j, (col_name, params)) in self.params.iter().enumerate() {
            let values = numeric_values(df, col_name)?;
            for (i, v) in values.into_iter().enumerate() {
                out[[i, j]] = (v - params.center) / params.scale;
            }
        }
        Ok(out)
    }

    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[&str]) -> Result<Array2<f64>> {
        self.fit(df, columns)?;
        self.transform(df)
    }

    pub fn columns(&self) -> Vec<&str> {
        self.params.iter().map(|(c, _)| c.as_str()).collect()
    }

    pub fn mean(&self, column: &str) -> Option<f64> {
        self.params.iter().find(|(c, _)| c == column).map(|(_, p)| p.center)
    }

    pub fn scale(&self, column: &str) -> Option<f64> {
        self.params.iter().find(|(c, _)| c == column).map(|(_, p)| p.scale)
    }

    pub fn is_fitted(&self) -> bool {
        self.is_fitted
    }
}
