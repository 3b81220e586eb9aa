//! Inference
//!
//! - [`PremiumPipeline`]: the fitted transformer, SMOTE settings and forest
//! - [`ModelArtifact`]: versioned on-disk form of a pipeline
//! - [`predict_record`]: one validated request in, one [`Prediction`] out

mod artifact;
mod pipeline;
mod predictor;

pub use artifact::{ModelArtifact, FORMAT_VERSION, MAGIC};
pub use pipeline::PremiumPipeline;
pub use predictor::{predict_record, record_frame, Prediction};
