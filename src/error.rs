//! Error types for the premium predictor

use thiserror::Error;

/// Result type alias for predictor operations
pub type Result<T> = std::result::Result<T, PremiumError>;

/// Main error type for training, persistence and inference
#[derive(Error, Debug)]
pub enum PremiumError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Preprocessing error: {0}")]
    PreprocessingError(String),

    #[error("Training error: {0}")]
    TrainingError(String),

    #[error("Inference error: {0}")]
    InferenceError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Artifact error: {0}")]
    ArtifactError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Feature not found: {0}")]
    FeatureNotFound(String),

    #[error("Could not convert column '{column}': {reason}")]
    ConversionError { column: String, reason: String },

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl PremiumError {
    /// Errors caused by the shape or content of the submitted features
    /// rather than by the model itself.
    pub fn is_value_error(&self) -> bool {
        matches!(
            self,
            PremiumError::FeatureNotFound(_)
                | PremiumError::ConversionError { .. }
                | PremiumError::ShapeError { .. }
                | PremiumError::ValidationError(_)
        )
    }
}

impl From<polars::error::PolarsError> for PremiumError {
    fn from(err: polars::error::PolarsError) -> Self {
        PremiumError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for PremiumError {
    fn from(err: serde_json::Error) -> Self {
        PremiumError::SerializationError(err.to_string())
    }
}

impl From<bincode::Error> for PremiumError {
    fn from(err: bincode::Error) -> Self {
        PremiumError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for PremiumError {
    fn from(err: ndarray::ShapeError) -> Self {
        PremiumError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PremiumError::DataError("test error".to_string());
        assert_eq!(err.to_string(), "Data error: test error");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: PremiumError = io_err.into();
        assert!(matches!(err, PremiumError::IoError(_)));
    }

    #[test]
    fn test_value_error_classification() {
        assert!(PremiumError::FeatureNotFound("age".into()).is_value_error());
        assert!(PremiumError::ConversionError {
            column: "bmi".into(),
            reason: "not a number".into(),
        }
        .is_value_error());
        assert!(!PremiumError::ModelNotFitted.is_value_error());
        assert!(!PremiumError::InferenceError("boom".into()).is_value_error());
    }
}
