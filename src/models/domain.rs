use serde::{Deserialize, Serialize};
use std::fmt;

/// Diseases served by the prediction endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Disease {
    Diabetes,
    HeartDisease,
    KidneyDisease,
    Cancer,
    Parkinson,
}

impl Disease {
    pub const ALL: [Disease; 5] = [
        Disease::Diabetes,
        Disease::HeartDisease,
        Disease::KidneyDisease,
        Disease::Cancer,
        Disease::Parkinson,
    ];

    /// URL path segment for the endpoint
    pub fn slug(&self) -> &'static str {
        match self {
            Disease::Diabetes => "diabetes",
            Disease::HeartDisease => "heart-disease",
            Disease::KidneyDisease => "kidney-disease",
            Disease::Cancer => "cancer",
            Disease::Parkinson => "parkinson",
        }
    }

    /// Human readable name used in logs
    pub fn label(&self) -> &'static str {
        match self {
            Disease::Diabetes => "diabetes",
            Disease::HeartDisease => "heart disease",
            Disease::KidneyDisease => "kidney disease",
            Disease::Cancer => "breast cancer",
            Disease::Parkinson => "parkinson",
        }
    }

    /// Model file name used when the configuration does not override it
    pub fn default_model_file(&self) -> &'static str {
        match self {
            Disease::Diabetes => "diabetes_xgboost_recall_optimized.json",
            Disease::HeartDisease => "heart_xgboost.json",
            Disease::KidneyDisease => "kidney_xgboost.json",
            Disease::Cancer => "breast_cancer_model.json",
            Disease::Parkinson => "parkinson_model.json",
        }
    }
}

impl fmt::Display for Disease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Outcome of a single inference call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub label: u8,
    pub probability: f64,
}
