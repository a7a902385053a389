use serde::{Deserialize, Serialize};
use crate::models::domain::{Disease, Prediction};

/// Response for the prediction endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: u8,
    pub probability: f64,
}

impl From<Prediction> for PredictionResponse {
    fn from(value: Prediction) -> Self {
        Self {
            prediction: value.label,
            probability: value.probability,
        }
    }
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub models: Vec<ModelSummary>,
}

/// Loaded model as reported by the health check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSummary {
    pub disease: Disease,
    pub features: usize,
    pub trees: usize,
}
