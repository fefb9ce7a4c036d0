//! # Application Configuration
//!
//! This module defines the configuration structure for the
//! `shelfscan-server` and the logic for loading it from an optional
//! `config.yml` file plus environment variables. Serving never starts
//! without a usable model credential.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use serde::Deserialize;
use std::env;
use std::fs;

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// The model API credential is absent. Startup must abort.
    MissingCredential,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::MissingCredential => write!(
                f,
                "GOOGLE_API_KEY is not defined in the environment variables"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// The model API credential. Loaded from `API_KEY` or `GOOGLE_API_KEY`.
    #[serde(default)]
    pub api_key: Option<String>,
    /// The provider type ("gemini" or "local").
    #[serde(default = "default_provider")]
    pub provider: String,
    /// The provider base URL. Derived for Gemini when unset; required for
    /// local providers.
    #[serde(default)]
    pub api_url: Option<String>,
    /// The primary model tier.
    #[serde(default = "default_model")]
    pub model: String,
    /// The secondary model tier tried once when the primary invocation
    /// fails. Set to null to disable the fallback.
    #[serde(default = "default_fallback_model")]
    pub fallback_model: Option<String>,
    /// The maximum number of files accepted by the batch endpoint.
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
    /// Upper bound on a single model invocation.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_port() -> u16 {
    5000
}

fn default_provider() -> String {
    "gemini".to_string()
}

fn default_model() -> String {
    "gemini-1.5-flash".to_string()
}

fn default_fallback_model() -> Option<String> {
    Some("gemini-1.5-pro".to_string())
}

fn default_max_batch_size() -> usize {
    10
}

fn default_request_timeout_secs() -> u64 {
    120
}

/// Loads the application configuration.
///
/// Sources are layered: an optional YAML file (path override, or
/// `config.yml` next to the manifest), then environment variables for
/// top-level keys like `PORT` and `MODEL`. After all layers, the
/// `GOOGLE_API_KEY` environment variable is checked explicitly so the
/// original deployment variable keeps working. A gemini configuration
/// without a credential refuses to load.
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = ConfigBuilder::builder();

    let config_path = config_path_override
        .map(ToString::to_string)
        .unwrap_or_else(|| format!("{}/config.yml", env!("CARGO_MANIFEST_DIR")));
    if std::path::Path::new(&config_path).exists() {
        let content = fs::read_to_string(&config_path).map_err(|e| {
            ConfigError::General(format!("Failed to read config file '{config_path}': {e}"))
        })?;
        builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
    }

    let settings = builder.add_source(Environment::default()).build()?;

    let mut config: AppConfig = settings.try_deserialize()?;

    // The original deployment supplied the credential as GOOGLE_API_KEY, so
    // check for it explicitly when no other layer has set a key.
    if config.api_key.is_none() {
        if let Ok(key) = env::var("GOOGLE_API_KEY") {
            if !key.is_empty() {
                config.api_key = Some(key);
            }
        }
    }

    if config.provider == "gemini" && config.api_key.as_deref().unwrap_or("").is_empty() {
        return Err(ConfigError::MissingCredential);
    }

    Ok(config)
}
