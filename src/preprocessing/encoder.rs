//! One-hot encoding of categorical columns

use super::text_values;
use crate::error::{PremiumError, Result};
use ndarray::Array2;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One-hot encoder with sorted categories per column.
///
/// A category not seen during fit encodes to all zeros for its column.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OneHotEncoder {
    categories: Vec<(String, Vec<String>)>,
    is_fitted: bool,
}

impl OneHotEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fit(&mut self, df: &DataFrame, columns: &[&str]) -> Result<&mut Self> {
        self.categories.clear();
        for col_name in columns {
            let values = text_values(df, col_name)?;
            let sorted: BTreeSet<String> = values.into_iter().collect();
            self.categories.push((col_name.to_string(), sorted.into_iter().collect()));
        }
        self.is_fitted = true;
        Ok(self)
    }

    /// Width of the encoded block
    pub fn n_outputs(&self) -> usize {
        self.categories.iter().map(|(_, cats)| cats.len()).sum()
    }

    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        if !self.is_fitted {
            return Err(PremiumError::ModelNotFitted);
        }

        let mut out = Array2::zeros((df.height(), self.n_outputs()));
        let mut offset = 0;
        for (col_name, cats) in &self.categories {
            let values = text_values(df, col_name)?;
            for (i, v) in values.iter().enumerate() {
                if let Ok(pos) = cats.binary_search(v) {
                    out[[i, offset + pos]] = 1.0;
                }
            }
            offset += cats.len();
        }
        Ok(out)
    }

    pub fn fit_transform(&mut self, df: &DataFrame, columns: &[&str]) -> Result<Array2<f64>> {
        self.fit(df, columns)?;
        self.transform(df)
    }

    /// Output names in `column_category` form
    pub fn feature_names(&self) -> Vec<String> {
        self.categories
            .iter()
            .flat_map(|(col, cats)| cats.iter().map(move |c| format!("{}_{}", col, c)))
            .collect()
    }

    pub fn categories(&self, column: &str) -> Option<&[String]> {
        self.categories
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, cats)| cats.as_slice())
    }

    pub fn columns(&self) -> Vec<&str> {
        self.categories.iter().map(|(c, _)| c.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DataFrame {
        df! {
            "area" => &["Urban", "Rural", "Urban", "Semi-urban"],
            "smoke" => &["Never", "Current", "Never", "Never"],
        }
        .unwrap()
    }

    #[test]
    fn test_categories_sorted() {
        let mut encoder = OneHotEncoder::new();
        encoder.fit(&frame(), &["area", "smoke"]).unwrap();
        assert_eq!(
            encoder.categories("area").unwrap(),
            &["Rural".to_string(), "Semi-urban".to_string(), "Urban".to_string()]
        );
        assert_eq!(encoder.n_outputs(), 5);
        assert_eq!(encoder.feature_names()[3], "smoke_Current");
    }

    #[test]
    fn test_one_hot_rows() {
        let mut encoder = OneHotEncoder::new();
        let out = encoder.fit_transform(&frame(), &["area", "smoke"]).unwrap();
        assert_eq!(out.row(0).to_vec(), vec![0.0, 0.0, 1.0, 0.0, 1.0]);
        assert_eq!(out.row(1).to_vec(), vec![1.0, 0.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_unknown_category_is_all_zeros() {
        let mut encoder = OneHotEncoder::new();
        encoder.fit(&frame(), &["area"]).unwrap();
        let unseen = df! { "area" => &["Island"] }.unwrap();
        let out = encoder.transform(&unseen).unwrap();
        assert!(out.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_numeric_column_rejected() {
        let mut encoder = OneHotEncoder::new();
        encoder.fit(&frame(), &["area"]).unwrap();
        let wrong = df! { "area" => &[1i64] }.unwrap();
        assert!(encoder.transform(&wrong).unwrap_err().is_value_error());
    }
}
