//! Application state

use std::sync::Arc;
use tracing::{info, warn};

use crate::inference::{ModelArtifact, PremiumPipeline};

use super::ServerConfig;

/// Shared, read-only state handed to every handler
pub struct AppState {
    pub config: ServerConfig,
    model: Option<Arc<PremiumPipeline>>,
}

impl AppState {
    /// Load the artifact named by the config. Failure is logged and the
    /// state is built without a model.
    pub fn load(config: ServerConfig) -> Self {
        let model = match ModelArtifact::load(&config.model_path) {
            Ok(artifact) => {
                info!(
                    path = %config.model_path.display(),
                    classes = ?artifact.pipeline.classes(),
                    trained_at = %artifact.created_at.to_rfc3339(),
                    accuracy = artifact.evaluation.accuracy,
                    "Model loaded"
                );
                Some(Arc::new(artifact.pipeline))
            }
            Err(e) => {
                warn!(
                    path = %config.model_path.display(),
                    error = %e,
                    "Model could not be loaded, serving in degraded mode"
                );
                None
            }
        };
        Self { config, model }
    }

    pub fn with_pipeline(config: ServerConfig, pipeline: Arc<PremiumPipeline>) -> Self {
        Self {
            config,
            model: Some(pipeline),
        }
    }

    pub fn without_model(config: ServerConfig) -> Self {
        Self { config, model: None }
    }

    pub fn model(&self) -> Option<&Arc<PremiumPipeline>> {
        self.model.as_ref()
    }

    pub fn is_model_loaded(&self) -> bool {
        self.model.is_some()
    }
}
