//! Error types for the server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::error::PremiumError;
use crate::schema::ValidationError;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Input validation error: {0}")]
    Validation(ValidationError),

    #[error("Model not loaded")]
    ModelNotLoaded,

    #[error("Not found")]
    NotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Prediction error: {0}")]
    Prediction(#[from] PremiumError),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::BadRequest(_) | ServerError::Validation(_) => StatusCode::BAD_REQUEST,
            ServerError::ModelNotLoaded => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::NotFound => StatusCode::NOT_FOUND,
            ServerError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ServerError::Prediction(e) if e.is_value_error() => StatusCode::BAD_REQUEST,
            ServerError::Prediction(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ServerError::BadRequest(msg) => json!({ "detail": msg }),
            ServerError::Validation(e) => {
                tracing::warn!(fields = ?e.fields(), "Request rejected by validation");
                json!({
                    "detail": self.to_string(),
                    "errors": e.violations,
                })
            }
            ServerError::ModelNotLoaded => json!({
                "detail": "Model not loaded. Train a model and restart the service.",
            }),
            ServerError::NotFound => json!({
                "detail": "Not found. Use POST /predict, GET /health or GET / for the form.",
            }),
            ServerError::MethodNotAllowed => json!({
                "detail": "Method not allowed.",
            }),
            ServerError::Prediction(e) if e.is_value_error() => {
                tracing::warn!(error = %e, "Feature frame rejected");
                json!({ "detail": format!("Input validation error: {}", e) })
            }
            ServerError::Prediction(e) => {
                tracing::error!(error = %e, "Prediction failed");
                json!({ "detail": self.to_string() })
            }
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
