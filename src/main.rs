use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use medpredict::config::Settings;
use medpredict::routes::{self, AppState};
use medpredict::services::ModelRegistry;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn init_logging(default_level: &str, default_format: &str) {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| default_level.to_string());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| default_format.to_string());

    // RUST_LOG wins over LOG_LEVEL when set
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    match log_format.as_str() {
        "pretty" => subscriber.pretty().init(),
        "json" => subscriber.json().init(),
        _ => subscriber.init(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match std::env::var("MEDPREDICT_CONFIG") {
        Ok(path) => Settings::load_from(path),
        Err(_) => Settings::load(),
    };
    match &settings {
        Ok(s) => init_logging(&s.logging.level, &s.logging.format),
        Err(_) => init_logging("info", "json"),
    }

    info!("Starting MedPredict service...");

    let settings = settings.map_err(|e| {
        error!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("Configuration error: {}", e))
    })?;

    info!("Configuration loaded successfully");

    let registry = ModelRegistry::load(&settings.models).await.map_err(|e| {
        error!("Failed to load models: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, format!("Model loading error: {}", e))
    })?;

    info!("{} models loaded from {}", registry.len(), settings.models.dir);

    let app_state = AppState::new(registry);

    // Configure HTTP server
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let base_path = settings.server.normalized_base_path();
    let max_payload_bytes = settings.server.max_payload_bytes;

    info!("Starting HTTP server on {}:{} (endpoints under '{}/')", host, port, base_path);

    let mut server = HttpServer::new(move || {
        let cors = Cors::permissive();
        let base_path = base_path.clone();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::PayloadConfig::new(max_payload_bytes))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(move |cfg| routes::configure_routes(cfg, &base_path))
    });

    if let Some(workers) = settings.server.workers {
        server = server.workers(workers);
    }

    server.bind((host, port))?.run().await
}
