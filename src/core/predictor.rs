use crate::core::features::FeatureError;
use crate::core::forest::{BinaryClassifier, ModelError};
use crate::core::schema::extract_features;
use crate::models::{Disease, PayloadError, Prediction, PredictionPayload};
use thiserror::Error;

/// Everything that can go wrong between a request body and a prediction
#[derive(Debug, Error)]
pub enum PredictError {
    #[error(transparent)]
    Payload(#[from] PayloadError),

    #[error(transparent)]
    Feature(#[from] FeatureError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("no model loaded for {0}")]
    ModelUnavailable(Disease),
}

impl PredictError {
    /// Only an absent field is the caller's fault; every other failure is
    /// reported as a server error.
    pub fn is_missing_field(&self) -> bool {
        matches!(self, PredictError::Feature(FeatureError::MissingField(_)))
    }
}

/// Run one inference: payload -> ordered features -> classifier
pub fn predict(
    disease: Disease,
    classifier: &BinaryClassifier,
    payload: &PredictionPayload,
) -> Result<Prediction, PredictError> {
    let features = extract_features(disease, payload)?;
    tracing::debug!(disease = %disease, ?features, "Built feature vector");

    Ok(classifier.classify(&features)?)
}

/// Decode a raw request body and run one inference
pub fn predict_from_body(
    disease: Disease,
    classifier: &BinaryClassifier,
    body: &[u8],
) -> Result<Prediction, PredictError> {
    let payload = PredictionPayload::from_slice(body)?;
    tracing::debug!(disease = %disease, fields = payload.len(), "Received payload");

    predict(disease, classifier, &payload)
}
