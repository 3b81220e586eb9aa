//! HTTP calls to the prediction service

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::inference::Prediction;
use crate::schema::PremiumRequest;

pub const API_URL: &str = "http://localhost:8000/predict";
pub const HEALTH_URL: &str = "http://localhost:8000/health";

pub const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);
pub const PREDICT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Could not connect to the prediction service at {url}")]
    Connection { url: String },

    #[error("Request to {url} timed out after {secs}s")]
    Timeout { url: String, secs: u64 },

    #[error("API error ({status}): {detail}")]
    Api { status: u16, detail: String },

    #[error("Could not decode the service response: {0}")]
    Decode(String),
}

/// What the health endpoint reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceStatus {
    /// Service up, model loaded
    Ready,
    /// Service up, no model
    ModelNotReady(String),
    Unreachable(String),
}

#[derive(Debug, Deserialize)]
struct HealthResponse {
    model_status: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Clone)]
pub struct PredictionClient {
    http: Client,
    predict_url: String,
    health_url: String,
    health_timeout: Duration,
    predict_timeout: Duration,
}

impl Default for PredictionClient {
    fn default() -> Self {
        Self {
            http: Client::new(),
            predict_url: API_URL.to_string(),
            health_url: HEALTH_URL.to_string(),
            health_timeout: HEALTH_TIMEOUT,
            predict_timeout: PREDICT_TIMEOUT,
        }
    }
}

impl PredictionClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Point both endpoints at another deployment, e.g. `http://10.0.0.5:9000`
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        self.predict_url = format!("{}/predict", base);
        self.health_url = format!("{}/health", base);
        self
    }

    pub fn with_timeouts(mut self, health: Duration, predict: Duration) -> Self {
        self.health_timeout = health;
        self.predict_timeout = predict;
        self
    }

    pub fn predict_url(&self) -> &str {
        &self.predict_url
    }

    pub fn health_url(&self) -> &str {
        &self.health_url
    }

    pub async fn check_health(&self) -> ServiceStatus {
        let response = match self
            .http
            .get(&self.health_url)
            .timeout(self.health_timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let err = classify(e, &self.health_url, self.health_timeout);
                return ServiceStatus::Unreachable(err.to_string());
            }
        };

        match response.json::<HealthResponse>().await {
            Ok(health) if health.model_status == "healthy" => ServiceStatus::Ready,
            Ok(health) => ServiceStatus::ModelNotReady(health.message),
            Err(e) => ServiceStatus::Unreachable(ClientError::Decode(e.to_string()).to_string()),
        }
    }

    pub async fn predict(&self, request: &PremiumRequest) -> Result<Prediction, ClientError> {
        debug!(url = %self.predict_url, "posting prediction request");
        let response = self
            .http
            .post(&self.predict_url)
            .json(request)
            .timeout(self.predict_timeout)
            .send()
            .await
            .map_err(|e| classify(e, &self.predict_url, self.predict_timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                detail: error_detail(status, &body),
            });
        }

        response
            .json::<Prediction>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}

fn classify(err: reqwest::Error, url: &str, timeout: Duration) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout {
            url: url.to_string(),
            secs: timeout.as_secs(),
        }
    } else if err.is_decode() {
        ClientError::Decode(err.to_string())
    } else {
        ClientError::Connection { url: url.to_string() }
    }
}

/// The `detail` field of an error body, or the raw body if there is none
fn error_detail(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").cloned());
    match detail {
        Some(serde_json::Value::String(s)) => s,
        Some(other) => other.to_string(),
        None if body.trim().is_empty() => status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string(),
        None => body.trim().to_string(),
    }
}
