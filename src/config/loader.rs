//! Configuration loader

use config::{Config, Environment, File};
use std::path::Path;

use super::types::AppConfig;
use crate::common::errors::{ExecutionError, Result};

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with GATEIO_)
/// 2. Configuration file (TOML format)
/// 3. Default values
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::with_name(path).required(false));
        }
    }

    // GATEIO_API_KEY maps onto gateio.api_key, GATEIO_SETTINGS__LOG_LEVEL
    // onto settings.log_level
    builder = builder.add_source(
        Environment::with_prefix("GATEIO")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| ExecutionError::Configuration(e.to_string()))?;

    config
        .try_deserialize()
        .map_err(|e| ExecutionError::Configuration(e.to_string()))
}

/// Load configuration from environment variables only
pub fn load_from_env() -> Result<AppConfig> {
    // Try to load from .env file
    dotenvy::dotenv().ok();

    let gateio = super::types::GateIoConfig {
        api_key: std::env::var("GATEIO_API_KEY").ok(),
        api_secret: std::env::var("GATEIO_API_SECRET").ok(),
        rest_url: std::env::var("GATEIO_REST_URL")
            .unwrap_or_else(|_| "https://api.gateio.ws".to_string()),
        leverage_cache_dir: std::env::var("GATEIO_LEVERAGE_CACHE_DIR")
            .unwrap_or_else(|_| ".".to_string()),
    };

    Ok(AppConfig {
        gateio,
        settings: super::types::AppSettings::default(),
    })
}
