// Shared fixtures for the integration tests
#![allow(dead_code)]

use medpredict::config::ModelSettings;
use medpredict::models::{Disease, PredictionPayload};
use medpredict::ModelRegistry;
use serde_json::{json, Value};
use std::path::PathBuf;

pub const BASE_PATH: &str = "/api/predict";

pub fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/models")
}

pub fn fixture_settings() -> ModelSettings {
    ModelSettings::in_dir(fixture_dir().to_string_lossy().into_owned())
}

pub async fn fixture_registry() -> ModelRegistry {
    ModelRegistry::load(&fixture_settings())
        .await
        .expect("fixture models should load")
}

pub fn as_payload(value: Value) -> PredictionPayload {
    match value {
        Value::Object(map) => PredictionPayload::from(map),
        other => panic!("payload fixture must be an object, got {}", other),
    }
}

/// A well-formed request body for each endpoint
pub fn sample_payload(disease: Disease) -> Value {
    match disease {
        Disease::Diabetes => json!({
            "gender": "Male",
            "age": 54,
            "hypertension": 1,
            "heart_disease": 0,
            "smoking_history": "former",
            "bmi": 27.32,
            "hba1c_level": 6.6,
            "blood_glucose_level": 140
        }),
        Disease::HeartDisease => json!({
            "age": 63, "sex": 1, "cp": 3, "trestbps": 145, "chol": 233, "fbs": 1,
            "restecg": 0, "thalach": 150, "exang": 0, "oldpeak": 2.3, "slope": 0,
            "ca": 0, "thal": 1
        }),
        Disease::KidneyDisease => json!({
            "age": 48, "bp": 80, "sg": 1.02, "al": 1, "su": 0,
            "rbc": "normal", "pc": "abnormal", "pcc": "notpresent", "ba": "present",
            "bgr": 121, "bu": 36, "sc": 1.2, "sod": 137, "pot": 4.4, "hemo": 15.4,
            "pcv": 44, "wc": 7800, "rc": 5.2,
            "htn": "yes", "dm": "no", "cad": "no", "appet": "poor", "pe": "no", "ane": "yes"
        }),
        Disease::Cancer => json!({
            "mean_radius": 20.5,
            "mean_texture": 21.0,
            "mean_perimeter": 130.0,
            "mean_area": 1200.0,
            "mean_smoothness": 0.11
        }),
        Disease::Parkinson => json!({
            "mdvp_fo": 119.992, "mdvp_fhi": 157.302, "mdvp_flo": 74.997,
            "mdvp_jitter_percent": 0.00784, "mdvp_jitter_abs": 0.00007,
            "mdvp_rap": 0.0037, "mdvp_ppq": 0.00554, "jitter_ddp": 0.01109,
            "mdvp_shimmer": 0.04374, "mdvp_shimmer_db": 0.426,
            "shimmer_apq3": 0.02182, "shimmer_apq5": 0.0313, "mdvp_apq": 0.02971,
            "shimmer_dda": 0.06545, "nhr": 0.02211, "hnr": 21.033,
            "rpde": 0.414783, "dfa": 0.815285, "spread1": -4.813031,
            "spread2": 0.266482, "d2": 2.301442, "ppe": 0.284654
        }),
    }
}

/// Expected (prediction, probability) of the fixture models for `sample_payload`
pub fn expected_sample_prediction(disease: Disease) -> (u8, f64) {
    match disease {
        Disease::Diabetes => (1, 0.880_797_09),
        Disease::HeartDisease => (1, 0.802_183_87),
        Disease::KidneyDisease => (0, 0.452_846_91),
        Disease::Cancer => (1, 0.880_797_09),
        Disease::Parkinson => (1, 0.824_913_74),
    }
}
