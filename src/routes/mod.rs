// Route exports
pub mod health;
pub mod predict;

pub use predict::AppState;

use actix_web::web;

/// Mount the health check at the root and the prediction endpoints under
/// `base_path` (already normalized, may be empty)
pub fn configure_routes(cfg: &mut web::ServiceConfig, base_path: &str) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(web::scope(base_path).configure(predict::configure));
}
