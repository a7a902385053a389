use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use validator::Validate;

use crate::models::Disease;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub models: ModelSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    #[validate(length(min = 1))]
    pub host: String,
    #[serde(default = "default_port")]
    #[validate(range(min = 1))]
    pub port: u16,
    #[validate(range(min = 1, max = 512))]
    pub workers: Option<usize>,
    /// Prefix for the prediction endpoints
    #[serde(default = "default_base_path")]
    pub base_path: String,
    #[serde(default = "default_max_payload_bytes")]
    #[validate(range(min = 1024))]
    pub max_payload_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
            base_path: default_base_path(),
            max_payload_bytes: default_max_payload_bytes(),
        }
    }
}

impl ServerSettings {
    /// Base path with a leading slash and no trailing slash ("" for root)
    pub fn normalized_base_path(&self) -> String {
        let trimmed = self.base_path.trim().trim_matches('/');
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("/{}", trimmed)
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8000 }
fn default_base_path() -> String { "/api/predict".to_string() }
fn default_max_payload_bytes() -> usize { 64 * 1024 }

/// Where the pretrained model files live
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ModelSettings {
    #[serde(default = "default_model_dir")]
    #[validate(length(min = 1))]
    pub dir: String,
    #[serde(default = "default_diabetes_model")]
    #[validate(length(min = 1))]
    pub diabetes: String,
    #[serde(default = "default_heart_disease_model")]
    #[validate(length(min = 1))]
    pub heart_disease: String,
    #[serde(default = "default_kidney_disease_model")]
    #[validate(length(min = 1))]
    pub kidney_disease: String,
    #[serde(default = "default_cancer_model")]
    #[validate(length(min = 1))]
    pub cancer: String,
    #[serde(default = "default_parkinson_model")]
    #[validate(length(min = 1))]
    pub parkinson: String,
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            dir: default_model_dir(),
            diabetes: default_diabetes_model(),
            heart_disease: default_heart_disease_model(),
            kidney_disease: default_kidney_disease_model(),
            cancer: default_cancer_model(),
            parkinson: default_parkinson_model(),
        }
    }
}

impl ModelSettings {
    /// Settings pointing every model at `dir` with the default file names
    pub fn in_dir(dir: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    /// Full path of the model file for a disease
    pub fn path_for(&self, disease: Disease) -> PathBuf {
        let file = match disease {
            Disease::Diabetes => &self.diabetes,
            Disease::HeartDisease => &self.heart_disease,
            Disease::KidneyDisease => &self.kidney_disease,
            Disease::Cancer => &self.cancer,
            Disease::Parkinson => &self.parkinson,
        };
        Path::new(&self.dir).join(file)
    }
}

fn default_model_dir() -> String { "models".to_string() }
fn default_diabetes_model() -> String { Disease::Diabetes.default_model_file().to_string() }
fn default_heart_disease_model() -> String { Disease::HeartDisease.default_model_file().to_string() }
fn default_kidney_disease_model() -> String { Disease::KidneyDisease.default_model_file().to_string() }
fn default_cancer_model() -> String { Disease::Cancer.default_model_file().to_string() }
fn default_parkinson_model() -> String { Disease::Parkinson.default_model_file().to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with MEDPREDICT)
    /// 5. `PORT` and `MODEL_DIR` shortcuts
    pub fn load() -> Result<Self, ConfigError> {
        Self::layered(
            Config::builder()
                .add_source(File::with_name("config/default").required(false))
                .add_source(File::with_name("config/local").required(false)),
        )
    }

    /// Load configuration from a custom file instead of `config/`
    ///
    /// Environment variables and shortcuts still apply on top.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Self::layered(Config::builder().add_source(File::from(path.as_ref())))
    }

    fn layered(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config = builder
            // e.g., MEDPREDICT__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("MEDPREDICT")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config = apply_env_shortcuts(
            config,
            env::var("PORT").ok().as_deref(),
            env::var("MODEL_DIR").ok().as_deref(),
        )?;

        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Check the validated sections
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server
            .validate()
            .map_err(|e| ConfigError::Message(format!("invalid server settings: {}", e)))?;
        self.models
            .validate()
            .map_err(|e| ConfigError::Message(format!("invalid model settings: {}", e)))?;
        Ok(())
    }
}

/// Apply the conventional `PORT` and `MODEL_DIR` values on top of the
/// layered configuration
fn apply_env_shortcuts(
    config: Config,
    port: Option<&str>,
    model_dir: Option<&str>,
) -> Result<Config, ConfigError> {
    let mut builder = Config::builder().add_source(config);

    if let Some(port) = port {
        let port: u16 = port
            .trim()
            .parse()
            .map_err(|_| ConfigError::Message(format!("PORT is not a valid port: {}", port)))?;
        builder = builder.set_override("server.port", port as i64)?;
    }
    if let Some(dir) = model_dir {
        builder = builder.set_override("models.dir", dir)?;
    }

    builder.build()
}
