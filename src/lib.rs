//! Insurance Premium Predictor
//!
//! Predicts an insurance premium category (`Low` / `Medium` / `High`) from
//! 25 demographic, health and policy attributes.
//!
//! # Modules
//!
//! ## Core ML Modules
//! - [`preprocessing`] - Column kinds, standard scaling, one-hot encoding
//! - [`synthetic`] - SMOTE oversampling
//! - [`training`] - Random forest, stratified split, metrics, training engine
//! - [`inference`] - Fitted pipeline, model artifact, single-record prediction
//!
//! ## Boundary
//! - [`schema`] - The 25 attributes, their domains and request validation
//!
//! ## Services
//! - [`server`] - HTTP prediction service
//! - [`client`] - Interactive terminal client
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

// Core ML modules
pub mod preprocessing;
pub mod synthetic;
pub mod training;
pub mod inference;

// Request schema
pub mod schema;

// Services
pub mod server;
pub mod client;
pub mod cli;

pub use error::{PremiumError, Result};
pub use inference::{ModelArtifact, Prediction, PremiumPipeline};
pub use schema::{FeatureRecord, PremiumRequest};
pub use training::{TrainEngine, TrainingConfig, TrainingReport};
