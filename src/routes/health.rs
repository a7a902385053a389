use actix_web::{web, HttpResponse, Responder};
use crate::models::{Disease, HealthResponse};
use crate::routes::predict::AppState;

/// Health check endpoint
///
/// Reports "degraded" when any disease model is missing from the registry.
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let models = state.registry.summaries();
    let status = if models.len() == Disease::ALL.len() { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        models,
    })
}
