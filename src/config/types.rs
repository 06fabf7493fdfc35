//! Configuration types

use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Gate.io-specific configuration
    #[serde(default)]
    pub gateio: GateIoConfig,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

/// Gate.io platform configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateIoConfig {
    /// API key for authenticated requests
    #[serde(default)]
    pub api_key: Option<String>,
    /// API secret for signing requests
    #[serde(default)]
    pub api_secret: Option<String>,
    /// Base URL for the v4 REST API
    #[serde(default = "default_gateio_rest_url")]
    pub rest_url: String,
    /// Directory holding the cross-margin leverage cache files
    #[serde(default = "default_leverage_cache_dir")]
    pub leverage_cache_dir: String,
}

impl Default for GateIoConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            rest_url: default_gateio_rest_url(),
            leverage_cache_dir: default_leverage_cache_dir(),
        }
    }
}

fn default_gateio_rest_url() -> String {
    "https://api.gateio.ws".to_string()
}

fn default_leverage_cache_dir() -> String {
    ".".to_string()
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    /// How many consecutive stale trade-history reads to tolerate before
    /// giving up
    #[serde(default = "default_stale_retry_limit")]
    pub stale_retry_limit: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            request_timeout_seconds: default_request_timeout(),
            stale_retry_limit: default_stale_retry_limit(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_stale_retry_limit() -> u32 {
    10
}

/// API credentials for authenticated requests
#[derive(Debug, Clone)]
pub struct ApiCredentials {
    pub api_key: String,
    pub api_secret: String,
}

impl ApiCredentials {
    pub fn new(api_key: String, api_secret: String) -> Self {
        Self {
            api_key,
            api_secret,
        }
    }
}

impl GateIoConfig {
    /// Credentials from this config, if both halves are present
    pub fn credentials(&self) -> Option<ApiCredentials> {
        match (&self.api_key, &self.api_secret) {
            (Some(key), Some(secret)) => Some(ApiCredentials::new(key.clone(), secret.clone())),
            _ => None,
        }
    }
}
