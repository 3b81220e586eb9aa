//! Single-record prediction used by the HTTP service

use super::PremiumPipeline;
use crate::error::{PremiumError, Result};
use crate::schema::{FeatureRecord, FeatureValue, OrderedMap};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Response body of a successful prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub premium_category: String,
    /// Class label to probability, in the classifier's class order
    pub probabilities: OrderedMap<f64>,
    pub confidence: f64,
    /// The renamed feature values submitted to the model
    pub input_processed: OrderedMap<FeatureValue>,
}

/// One-row frame with internal column names and typed columns
pub fn record_frame(record: &FeatureRecord) -> Result<DataFrame> {
    let columns: Vec<Column> = record
        .iter()
        .map(|(field, value)| -> Column {
            let name: PlSmallStr = field.column.into();
            let series = match value {
                FeatureValue::Integer(v) => Series::new(name, &[*v]),
                FeatureValue::Real(v) => Series::new(name, &[*v]),
                FeatureValue::Text(v) => Series::new(name, &[v.as_str()]),
            };
            series.into()
        })
        .collect();
    Ok(DataFrame::new(columns)?)
}

/// Run the pipeline on one validated record
pub fn predict_record(pipeline: &PremiumPipeline, record: &FeatureRecord) -> Result<Prediction> {
    let frame = record_frame(record)?;
    let labels = pipeline.predict(&frame)?;
    let proba = pipeline.predict_proba(&frame)?;

    let premium_category = labels
        .into_iter()
        .next()
        .ok_or_else(|| PremiumError::InferenceError("empty prediction".to_string()))?;
    if proba.nrows() != 1 || proba.ncols() != pipeline.classes().len() {
        return Err(PremiumError::ShapeError {
            expected: format!("1 x {}", pipeline.classes().len()),
            actual: format!("{} x {}", proba.nrows(), proba.ncols()),
        });
    }

    let probabilities: OrderedMap<f64> = pipeline
        .classes()
        .iter()
        .zip(proba.row(0).iter())
        .map(|(class, &p)| (class.as_str(), p))
        .collect();
    let confidence = probabilities.values().copied().fold(0.0, f64::max);

    Ok(Prediction {
        premium_category,
        probabilities,
        confidence,
        input_processed: record.to_processed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{validate, PremiumRequest};

    #[test]
    fn test_record_frame_types() {
        let record = validate(&PremiumRequest::sample().to_json()).unwrap();
        let frame = record_frame(&record).unwrap();
        assert_eq!(frame.shape(), (1, 25));
        assert_eq!(frame.column("age").unwrap().dtype(), &DataType::Int64);
        assert_eq!(frame.column("bmi").unwrap().dtype(), &DataType::Float64);
        assert_eq!(frame.column("gender").unwrap().dtype(), &DataType::String);
        assert_eq!(frame.column("current_medications").unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn test_prediction_json_shape() {
        let prediction = Prediction {
            premium_category: "Low".into(),
            probabilities: [("High", 0.1), ("Low", 0.7), ("Medium", 0.2)].into_iter().collect(),
            confidence: 0.7,
            input_processed: [("age", FeatureValue::Integer(30))].into_iter().collect(),
        };
        let json = serde_json::to_value(&prediction).unwrap();
        assert_eq!(json["premium_category"], "Low");
        assert_eq!(json["input_processed"]["age"], 30);
        let back: Prediction = serde_json::from_value(json).unwrap();
        assert_eq!(back, prediction);
    }

    #[test]
    fn test_probabilities_keep_class_order_when_serialized() {
        let prediction = Prediction {
            premium_category: "Medium".into(),
            probabilities: [("Low", 0.2), ("Medium", 0.5), ("High", 0.3)].into_iter().collect(),
            confidence: 0.5,
            input_processed: [("gender", FeatureValue::Text("Male".into())), ("age", FeatureValue::Integer(30))]
                .into_iter()
                .collect(),
        };
        let text = serde_json::to_string(&prediction).unwrap();
        let low = text.find("\"Low\"").unwrap();
        let medium = text.find("\"Medium\":").unwrap();
        let high = text.find("\"High\"").unwrap();
        assert!(low < medium && medium < high, "{}", text);
        assert!(text.find("\"gender\"").unwrap() < text.find("\"age\"").unwrap());

        let back: Prediction = serde_json::from_str(&text).unwrap();
        let keys: Vec<&str> = back.probabilities.keys().collect();
        assert_eq!(keys, vec!["Low", "Medium", "High"]);
    }
}
