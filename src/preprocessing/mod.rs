//! Feature preprocessing
//!
//! Turns a feature frame into the dense matrix the classifier consumes:
//! - Standard scaling of numeric columns (population statistics)
//! - One-hot encoding of categorical columns, unseen categories ignored
//! - A column transformer that places the numeric block before the
//!   one-hot block, in fitted column order

mod encoder;
mod scaler;
mod transformer;

pub use encoder::OneHotEncoder;
pub use scaler::StandardScaler;
pub use transformer::ColumnTransformer;

use crate::error::{PremiumError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// How a feature column is treated by the transformer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

impl ColumnKind {
    /// Classify a column by dtype. Only integers, floats and strings are
    /// accepted as features.
    pub fn of(dtype: &DataType) -> Option<Self> {
        match dtype {
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64 => Some(ColumnKind::Numeric),
            DataType::String => Some(ColumnKind::Categorical),
            _ => None,
        }
    }
}

/// Split the columns of a frame into numeric and categorical lists,
/// preserving frame order.
pub fn detect_column_kinds(df: &DataFrame) -> Result<(Vec<String>, Vec<String>)> {
    let mut numeric = Vec::new();
    let mut categorical = Vec::new();

    for col in df.get_columns() {
        let name = col.name().to_string();
        match ColumnKind::of(col.dtype()) {
            Some(ColumnKind::Numeric) => numeric.push(name),
            Some(ColumnKind::Categorical) => categorical.push(name),
            None => {
                return Err(PremiumError::ConfigError(format!(
                    "column '{}' has unsupported dtype {}",
                    name,
                    col.dtype()
                )))
            }
        }
    }

    Ok((numeric, categorical))
}

/// Read a numeric column as f64 values. Text or missing values are a
/// conversion error for that column.
pub(crate) fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df
        .column(name)
        .map_err(|_| PremiumError::FeatureNotFound(name.to_string()))?;
    if ColumnKind::of(column.dtype()) != Some(ColumnKind::Numeric) {
        return Err(PremiumError::ConversionError {
            column: name.to_string(),
            reason: format!("expected a numeric column, got {}", column.dtype()),
        });
    }

    let series = column
        .as_materialized_series()
        .cast(&DataType::Float64)
        .map_err(|e| PremiumError::ConversionError {
            column: name.to_string(),
            reason: e.to_string(),
        })?;
    let ca = series.f64()?;

    ca.into_iter()
        .map(|v| {
            v.ok_or_else(|| PremiumError::ConversionError {
                column: name.to_string(),
                reason: "contains missing values".to_string(),
            })
        })
        .collect()
}

/// Read a categorical column as owned strings.
pub(crate) fn text_values(df: &DataFrame, name: &str) -> Result<Vec<String>> {
    let column = df
        .column(name)
        .map_err(|_| PremiumError::FeatureNotFound(name.to_string()))?;
    let ca = column
        .as_materialized_series()
        .str()
        .map_err(|_| PremiumError::ConversionError {
            column: name.to_string(),
            reason: format!("expected a text column, got {}", column.dtype()),
        })?;

    ca.into_iter()
        .map(|v| {
            v.map(str::to_string).ok_or_else(|| PremiumError::ConversionError {
                column: name.to_string(),
                reason: "contains missing values".to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_column_kinds() {
        let df = df! {
            "age" => &[30i64, 40],
            "gender" => &["Male", "Female"],
            "bmi" => &[22.5, 31.0],
        }
        .unwrap();
        let (numeric, categorical) = detect_column_kinds(&df).unwrap();
        assert_eq!(numeric, vec!["age", "bmi"]);
        assert_eq!(categorical, vec!["gender"]);
    }

    #[test]
    fn test_unsupported_dtype_is_config_error() {
        let df = df! { "flag" => &[true, false] }.unwrap();
        let err = detect_column_kinds(&df).unwrap_err();
        assert!(matches!(err, PremiumError::ConfigError(msg) if msg.contains("flag")));
    }

    #[test]
    fn test_numeric_values_rejects_text() {
        let df = df! { "age" => &["thirty"] }.unwrap();
        let err = numeric_values(&df, "age").unwrap_err();
        assert!(err.is_value_error());
        let err = numeric_values(&df, "missing").unwrap_err();
        assert!(matches!(err, PremiumError::FeatureNotFound(_)));
    }
}
