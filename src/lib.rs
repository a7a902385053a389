//! MedPredict - clinical disease prediction service
//!
//! Turns loosely typed JSON measurements into fixed-order feature vectors and
//! scores them with pretrained XGBoost binary classifiers.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{BinaryClassifier, PredictError, extract_features, predict};
pub use models::{Disease, Prediction, PredictionPayload, PredictionResponse};
pub use services::ModelRegistry;
