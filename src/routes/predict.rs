use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use crate::core::{predict_from_body, PredictError};
use crate::models::{Disease, ErrorResponse, PayloadError, PredictionResponse};
use crate::services::ModelRegistry;
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ModelRegistry>,
}

impl AppState {
    pub fn new(registry: ModelRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }
}

impl ResponseError for PredictError {
    fn status_code(&self) -> StatusCode {
        if self.is_missing_field() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse::new(self.to_string()))
    }
}

/// Configure the prediction routes
///
/// Every endpoint accepts POST only; any other method gets a 400.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .service(
            web::resource("/diabetes")
                .route(web::post().to(predict_diabetes))
                .default_service(web::to(only_post_allowed)),
        )
        .service(
            web::resource("/heart-disease")
                .route(web::post().to(predict_heart_disease))
                .default_service(web::to(only_post_allowed)),
        )
        .service(
            web::resource("/kidney-disease")
                .route(web::post().to(predict_kidney_disease))
                .default_service(web::to(only_post_allowed)),
        )
        .service(
            web::resource("/cancer")
                .route(web::post().to(predict_cancer))
                .default_service(web::to(only_post_allowed)),
        )
        .service(
            web::resource("/parkinson")
                .route(web::post().to(predict_parkinson))
                .default_service(web::to(only_post_allowed)),
        );
}

async fn only_post_allowed() -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse::new("Only POST allowed"))
}

/// Diabetes prediction endpoint
///
/// POST /diabetes/
///
/// Request body:
/// ```json
/// {
///   "gender": "Male",
///   "age": 54,
///   "hypertension": 0,
///   "heart_disease": 0,
///   "smoking_history": "never|former|current|No Info",
///   "bmi": 27.3,
///   "hba1c_level": 6.6,
///   "blood_glucose_level": 140
/// }
/// ```
async fn predict_diabetes(
    state: web::Data<AppState>,
    body: Result<web::Bytes, actix_web::Error>,
) -> Result<HttpResponse, PredictError> {
    run_prediction(Disease::Diabetes, &state, body)
}

/// Heart disease prediction endpoint
///
/// POST /heart-disease/
///
/// Fields: age, sex, cp, trestbps, chol, fbs, restecg, thalach, exang,
/// oldpeak, slope, ca, thal
async fn predict_heart_disease(
    state: web::Data<AppState>,
    body: Result<web::Bytes, actix_web::Error>,
) -> Result<HttpResponse, PredictError> {
    run_prediction(Disease::HeartDisease, &state, body)
}

/// Chronic kidney disease prediction endpoint
///
/// POST /kidney-disease/
///
/// Categorical fields (rbc, pc, pcc, ba, htn, dm, cad, appet, pe, ane)
/// accept either the dataset words ("normal", "present", "yes", "good", ...)
/// or 0/1.
async fn predict_kidney_disease(
    state: web::Data<AppState>,
    body: Result<web::Bytes, actix_web::Error>,
) -> Result<HttpResponse, PredictError> {
    run_prediction(Disease::KidneyDisease, &state, body)
}

/// Breast cancer prediction endpoint
///
/// POST /cancer/
async fn predict_cancer(
    state: web::Data<AppState>,
    body: Result<web::Bytes, actix_web::Error>,
) -> Result<HttpResponse, PredictError> {
    run_prediction(Disease::Cancer, &state, body)
}

/// Parkinson's disease prediction endpoint
///
/// POST /parkinson/
async fn predict_parkinson(
    state: web::Data<AppState>,
    body: Result<web::Bytes, actix_web::Error>,
) -> Result<HttpResponse, PredictError> {
    run_prediction(Disease::Parkinson, &state, body)
}

fn run_prediction(
    disease: Disease,
    state: &AppState,
    body: Result<web::Bytes, actix_web::Error>,
) -> Result<HttpResponse, PredictError> {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("predict", disease = %disease, %request_id);
    let _enter = span.enter();

    let classifier = state
        .registry
        .get(disease)
        .ok_or(PredictError::ModelUnavailable(disease))?;

    // Oversized or broken bodies are reported like any other bad payload
    let result = body
        .map_err(|e| PredictError::from(PayloadError::Unreadable(e.to_string())))
        .and_then(|body| predict_from_body(disease, &classifier, &body));

    match result {
        Ok(prediction) => {
            tracing::info!(
                "Prediction: {}, Probability: {}",
                prediction.label,
                prediction.probability
            );
            Ok(HttpResponse::Ok().json(PredictionResponse::from(prediction)))
        }
        Err(e) => {
            if e.is_missing_field() {
                tracing::warn!("Rejected {} request: {}", disease.label(), e);
            } else {
                tracing::error!("{} prediction failed: {:?}", disease.label(), e);
            }
            Err(e)
        }
    }
}
