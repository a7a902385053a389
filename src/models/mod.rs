// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Disease, Prediction};
pub use requests::{PredictionPayload, PayloadError};
pub use responses::{PredictionResponse, ErrorResponse, HealthResponse, ModelSummary};
