// Inference core exports
pub mod features;
pub mod forest;
pub mod format;
pub mod predictor;
pub mod schema;

pub use features::FeatureError;
pub use forest::{BinaryClassifier, ModelError};
pub use predictor::{predict, predict_from_body, PredictError};
pub use schema::{extract_features, fields, FieldKind, FieldSpec};
