//! Integration test: prediction service endpoints

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use premium_predictor::inference::{Prediction, PremiumPipeline};
use premium_predictor::schema::{FeatureValue, PremiumRequest, FIELDS};
use premium_predictor::server::{create_router, AppState, ServerConfig};
use serde_json::{json, Value};
use std::sync::{Arc, OnceLock};
use tower::ServiceExt;

fn pipeline() -> Arc<PremiumPipeline> {
    static PIPELINE: OnceLock<Arc<PremiumPipeline>> = OnceLock::new();
    PIPELINE
        .get_or_init(|| Arc::new(common::fit_pipeline(300, 21)))
        .clone()
}

fn app() -> axum::Router {
    let state = AppState::with_pipeline(ServerConfig::default(), pipeline());
    create_router(Arc::new(state))
}

fn degraded_app() -> axum::Router {
    create_router(Arc::new(AppState::without_model(ServerConfig::default())))
}

fn post_json(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send_raw(app: axum::Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, bytes) = send_raw(app, request).await;
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

/// Typed response parsed from the raw body, so object key order survives
async fn predict_typed(body: &Value) -> (StatusCode, Prediction) {
    let (status, bytes) = send_raw(app(), post_json(body.to_string())).await;
    let prediction = serde_json::from_slice(&bytes).unwrap();
    (status, prediction)
}

async fn predict(body: &Value) -> (StatusCode, Value) {
    send(app(), post_json(body.to_string())).await
}

fn sample() -> Value {
    PremiumRequest::sample().to_json()
}

fn error_fields(body: &Value) -> Vec<String> {
    body["errors"]
        .as_array()
        .map(|errors| {
            errors
                .iter()
                .filter_map(|e| e["field"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_without_model() {
    let (status, body) = send(degraded_app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model_status"], "model_not_loaded");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_health_with_model() {
    let (status, body) = send(app(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["model_status"], "healthy");
}

// ============================================================================
// Predict
// ============================================================================

#[tokio::test]
async fn test_predict_without_model_is_503() {
    let (status, body) = send(degraded_app(), post_json(sample().to_string())).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["detail"].is_string());

    // availability is checked before the body
    let (status, _) = send(degraded_app(), post_json("{not json".to_string())).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_predict_response_shape() {
    let (status, body) = predict(&sample()).await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    let classes = pipeline().classes().to_vec();
    let (_, typed) = predict_typed(&sample()).await;
    let keys: Vec<&str> = typed.probabilities.keys().collect();
    assert_eq!(keys, classes.iter().map(String::as_str).collect::<Vec<_>>());

    let probabilities = body["probabilities"].as_object().unwrap();

    let values: Vec<f64> = probabilities.values().map(|v| v.as_f64().unwrap()).collect();
    assert!(values.iter().all(|&p| p >= 0.0));
    assert!((values.iter().sum::<f64>() - 1.0).abs() < 1e-9);

    let max = values.iter().copied().fold(0.0, f64::max);
    assert!((body["confidence"].as_f64().unwrap() - max).abs() < 1e-12);

    let category = body["premium_category"].as_str().unwrap();
    assert!((probabilities[category].as_f64().unwrap() - max).abs() < 1e-12);
}

#[tokio::test]
async fn test_input_processed_uses_internal_names_in_order() {
    let (status, typed) = predict_typed(&sample()).await;
    assert_eq!(status, StatusCode::OK);
    let keys: Vec<&str> = typed.input_processed.keys().collect();
    let columns: Vec<&str> = FIELDS.iter().map(|f| f.column).collect();
    assert_eq!(keys, columns);

    let processed = &typed.input_processed;
    assert_eq!(processed.get("age"), Some(&FeatureValue::Integer(30)));
    assert_eq!(processed.get("current_medications"), Some(&FeatureValue::Integer(0)));
    assert_eq!(processed.get("occupation"), Some(&FeatureValue::Text("Private Job".into())));
}

#[tokio::test]
async fn test_predict_is_deterministic() {
    let (_, first) = predict(&sample()).await;
    let (_, second) = predict(&sample()).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_medication_text_and_number_are_equivalent() {
    for (text, number) in [("Yes", 1), ("No", 0)] {
        let mut as_text = sample();
        as_text["Current_Medications"] = json!(text);
        let mut as_number = sample();
        as_number["Current_Medications"] = json!(number);

        let (status_a, a) = predict(&as_text).await;
        let (status_b, b) = predict(&as_number).await;
        assert_eq!(status_a, StatusCode::OK);
        assert_eq!(status_b, StatusCode::OK);
        assert_eq!(a, b);
        assert_eq!(a["input_processed"]["current_medications"], number);
    }
}

#[tokio::test]
async fn test_extra_fields_are_ignored() {
    let mut body = sample();
    body["Favorite_Color"] = json!("Blue");
    let (status, with_extra) = predict(&body).await;
    let (_, plain) = predict(&sample()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(with_extra, plain);
}

#[tokio::test]
async fn test_integral_float_is_accepted_for_integer_field() {
    let mut body = sample();
    body["Age"] = json!(30.0);
    let (status, response) = predict(&body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["input_processed"]["age"], 30);
}

// ============================================================================
// Validation
// ============================================================================

#[tokio::test]
async fn test_age_zero_is_rejected() {
    let mut body = sample();
    body["Age"] = json!(0);
    let (status, response) = predict(&body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&response), vec!["Age"]);
    assert!(response["detail"].as_str().unwrap().starts_with("Input validation error"));
}

#[tokio::test]
async fn test_boundaries() {
    let cases = [
        ("Age", json!(119), StatusCode::OK),
        ("Age", json!(120), StatusCode::BAD_REQUEST),
        ("Policy_Tenure", json!(10), StatusCode::OK),
        ("Policy_Tenure", json!(11), StatusCode::BAD_REQUEST),
        ("Loyalty_Score", json!(1.0), StatusCode::OK),
        ("Loyalty_Score", json!(0.0), StatusCode::BAD_REQUEST),
        ("Claim_History", json!(0), StatusCode::OK),
        ("Claim_History", json!(-1), StatusCode::BAD_REQUEST),
        ("BMI", json!(0.0), StatusCode::BAD_REQUEST),
        ("Age", json!(30.5), StatusCode::BAD_REQUEST),
    ];
    for (field, value, expected) in cases {
        let mut body = sample();
        body[field] = value.clone();
        let (status, response) = predict(&body).await;
        assert_eq!(status, expected, "{} = {}: {}", field, value, response);
    }
}

#[tokio::test]
async fn test_unknown_literal_is_rejected() {
    let mut body = sample();
    body["Occupation"] = json!("Astronaut");
    let (status, response) = predict(&body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&response), vec!["Occupation"]);

    // literals are case sensitive
    let mut body = sample();
    body["Gender"] = json!("male");
    let (status, _) = predict(&body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_all_violations_are_reported_together() {
    let mut body = sample();
    body["Age"] = json!(0);
    body["Smoking_Status"] = json!("Sometimes");
    body.as_object_mut().unwrap().remove("BMI");
    let (status, response) = predict(&body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let mut fields = error_fields(&response);
    fields.sort();
    assert_eq!(fields, vec!["Age", "BMI", "Smoking_Status"]);
}

#[tokio::test]
async fn test_bad_medication_flag_is_rejected() {
    let mut body = sample();
    body["Current_Medications"] = json!(2);
    let (status, response) = predict(&body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_fields(&response), vec!["Current_Medications"]);
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let (status, body) = send(app(), post_json("{\"Age\": ".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());

    let (status, _) = send(app(), post_json("[1, 2, 3]".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Routing
// ============================================================================

#[tokio::test]
async fn test_root_serves_form() {
    let response = app().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("<form"));
    assert!(html.contains("/predict"));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (status, body) = send(app(), get("/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_wrong_method_is_405() {
    let (status, body) = send(app(), get("/predict")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert!(body["detail"].is_string());
}
