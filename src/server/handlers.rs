//! HTTP request handlers

use std::sync::Arc;
use axum::{
    extract::{rejection::JsonRejection, State},
    response::Html,
    Json,
};
use serde_json::Value;
use tracing::info;

use crate::inference::{predict_record, Prediction};
use crate::schema::validate;

use super::error::{Result, ServerError};
use super::state::AppState;
use super::ui::FORM_HTML;

/// Validate one feature record and run the loaded pipeline on it.
///
/// Order of checks: model availability, JSON syntax, field validation,
/// then the pipeline itself.
pub async fn predict(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<Prediction>> {
    let pipeline = state.model().ok_or(ServerError::ModelNotLoaded)?;

    let Json(body) = body.map_err(|e| ServerError::BadRequest(format!("Invalid JSON body: {}", e.body_text())))?;
    if !body.is_object() {
        return Err(ServerError::BadRequest("Request body must be a JSON object".to_string()));
    }

    let record = validate(&body).map_err(ServerError::Validation)?;
    let prediction = predict_record(pipeline, &record)?;

    info!(
        category = %prediction.premium_category,
        confidence = prediction.confidence,
        "Prediction served"
    );
    Ok(Json(prediction))
}

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    let (model_status, message) = if state.is_model_loaded() {
        ("healthy", "Model loaded and ready for predictions")
    } else {
        ("model_not_loaded", "Model not loaded. Train a model and restart the service.")
    };
    Json(serde_json::json!({
        "status": "healthy",
        "model_status": model_status,
        "message": message,
    }))
}

pub async fn serve_form() -> Html<&'static str> {
    Html(FORM_HTML)
}
